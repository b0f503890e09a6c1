//! # pgs-export
//!
//! Denormalizes the record graph into the fixed catalog of metadata tables
//! and persists them as export bundles (one workbook, one CSV per table, a
//! tar.gz of the bundle directory).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pgs_core::snapshot;
//! use pgs_export::{build_table, Scope, TableKind};
//!
//! fn print_scores(dir: &std::path::Path) {
//!     if let Ok(snapshot) = snapshot::load_at(dir) {
//!         if let Ok(table) = build_table(TableKind::Scores, &snapshot.graph, &Scope::All) {
//!             println!("{} score rows", table.row_count());
//!         }
//!     }
//! }
//! ```

pub mod builder;
pub mod bundle;
pub mod error;
pub mod generator;
pub mod labels;
pub mod layout;
pub mod metrics;
pub mod table;
pub mod writer;

pub use builder::{build_table, PublicationMode, TableBuilder};
pub use bundle::{ExportBundle, Readme};
pub use error::ExportError;
pub use generator::{ExportGenerator, ExportSummary, GroupExports};
pub use layout::{BundleScope, ExportLayout};
pub use metrics::{MetricKind, PivotedMetrics};
pub use table::{Cell, Column, Scope, Table, TableKind, TableSet};
