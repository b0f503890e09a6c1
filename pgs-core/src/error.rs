//! Error types for pgs-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading a snapshot, a configuration file
/// or computing a file digest.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the offending path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot JSON document could not be parsed.
    #[error("failed to parse snapshot file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The YAML configuration could not be parsed.
    #[error("failed to parse config at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required snapshot file or directory was not found.
    #[error("snapshot not found at {path}")]
    SnapshotNotFound { path: PathBuf },

    /// The release descriptor is unusable (e.g. previous date after current).
    #[error("invalid release descriptor: {0}")]
    InvalidRelease(String),
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
