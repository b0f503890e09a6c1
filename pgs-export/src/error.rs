//! Error types for pgs-export.

use std::path::PathBuf;

use thiserror::Error;

use pgs_core::{CoreError, ScoreId};

use crate::table::TableKind;

/// All errors that can arise while building or persisting export bundles.
#[derive(Debug, Error)]
pub enum ExportError {
    /// An error from snapshot loading or digest computation.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("CSV error at {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Workbook serialization failed.
    #[error("workbook error at {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// A score's ancestry distribution uses a code with no display label.
    #[error("score {score} uses unknown ancestry category '{code}'")]
    UnknownAncestryCategory { score: ScoreId, code: String },

    /// A row did not supply one cell per column.
    #[error("table '{table}' expects {expected} cells per row, got {found}")]
    RaggedTable {
        table: TableKind,
        expected: usize,
        found: usize,
    },

    /// A table failed to build; the whole bundle is abandoned.
    #[error("failed to build table '{table}': {source}")]
    Table {
        table: TableKind,
        #[source]
        source: Box<ExportError>,
    },

    /// A table-kind name that is not part of the catalog.
    #[error("unknown table kind '{0}'")]
    UnknownTableKind(String),
}

/// Convenience constructor for [`ExportError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.into(),
        source,
    }
}
