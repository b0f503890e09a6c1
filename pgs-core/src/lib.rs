//! PGS core library — record graph types, snapshot loading, configuration,
//! checksums and errors.
//!
//! Public API surface:
//! - [`types`] — identifier newtypes and the immutable entity values
//! - [`graph`] — [`RecordGraph`] and its lookup helpers
//! - [`snapshot`] — load a release snapshot from disk
//! - [`config`] — YAML export configuration
//! - [`digest`] — MD5 content digests
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod digest;
pub mod error;
pub mod graph;
pub mod snapshot;
pub mod types;

pub use config::{ExportConfig, PriorSource};
pub use digest::Md5Digest;
pub use error::CoreError;
pub use graph::RecordGraph;
pub use snapshot::{Release, Snapshot};
pub use types::{
    AncestryDistribution, AncestryStage, AssociatedScores, Cohort, Demographic, Interval,
    MetricEntry, Performance, PerformanceId, PerformanceMetrics, Publication, PublicationId,
    PublicationRef, Sample, SampleSet, SampleSetId, Score, ScoreId, StageDistribution, Trait,
    TraitId,
};
