//! Error types for pgs-publish.

use std::path::PathBuf;

use thiserror::Error;

use pgs_core::{CoreError, ScoreId};
use pgs_export::ExportError;

/// All errors that can arise while publishing a release.
#[derive(Debug, Error)]
pub enum PublishError {
    /// An error from snapshot loading or digest computation.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// An error while generating export bundles.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A request to the remote prior tree failed (404 is not an error).
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// A retrieved archive could not be unpacked.
    #[error("cannot extract archive {archive}: {source}")]
    Extract {
        archive: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Attempted to write through a store that only supports reads.
    #[error("store is read-only, cannot write {path}")]
    ReadOnlyStore { path: String },

    /// Released entries without a score directory in the new tree.
    #[error(
        "missing score directories: released scores [{}], scores of released performances [{}]",
        join_ids(.scores),
        join_ids(.performance_scores)
    )]
    MissingDirectories {
        scores: Vec<ScoreId>,
        performance_scores: Vec<ScoreId>,
    },
}

fn join_ids(ids: &[ScoreId]) -> String {
    ids.iter()
        .map(ScoreId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience constructor for [`PublishError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.into(),
        source,
    }
}
