//! PGS publish library — compares fresh export bundles with the previously
//! published tree and builds the next release's distribution tree.
//!
//! Public API surface:
//! - [`store`] — [`DestinationStore`] plus local and HTTP backends
//! - [`layout`] — logical paths inside the distribution tree
//! - [`engine`] — [`PublishEngine`] and [`PublishOutcome`]
//! - [`check`] — post-publish directory check for released entries
//! - [`release`] — the full release pipeline
//! - [`error`] — [`PublishError`]

pub mod check;
pub mod engine;
pub mod error;
pub mod layout;
pub mod release;
pub mod store;

pub use engine::{PublishEngine, PublishOutcome, PublishReport};
pub use error::PublishError;
pub use release::{ReleasePipeline, ReleaseSummary};
pub use store::{open_store, DestinationStore, HttpStore, LocalStore};
