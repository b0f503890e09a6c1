//! Export Bundle: one workbook plus one CSV per table for a single scope.
//!
//! ```text
//! <bundle dir>/
//!   <prefix>_metadata.xlsx
//!   <prefix>_metadata_<table>.csv   (one per table kind)
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use pgs_core::digest::{md5_file, Md5Digest};
use pgs_core::RecordGraph;

use crate::builder::TableBuilder;
use crate::error::{io_err, ExportError};
use crate::layout::{BundleScope, ExportLayout};
use crate::table::{Scope, TableKind, TableSet};
use crate::writer;

/// Release summary written as the first sheet of catalog-wide workbooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readme {
    pub release: String,
    pub scores: usize,
    pub traits: usize,
    pub publications: usize,
}

impl Readme {
    /// Whole-catalog counts of `graph`.
    pub fn for_graph(graph: &RecordGraph, release: impl Into<String>) -> Self {
        Self {
            release: release.into(),
            scores: graph.scores().len(),
            traits: graph.traits().len(),
            publications: graph.publications().len(),
        }
    }

    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("PGS Catalog version", self.release.clone()),
            ("Number of Polygenic Scores", self.scores.to_string()),
            ("Number of Traits", self.traits.to_string()),
            ("Number of Publications", self.publications.to_string()),
        ]
    }
}

/// Artifacts of one scope inside an export directory.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    scope: BundleScope,
    dir: PathBuf,
    release_date: NaiveDate,
    readme: Option<Readme>,
}

impl ExportBundle {
    pub fn new(layout: &ExportLayout, scope: BundleScope, release_date: NaiveDate) -> Self {
        Self {
            dir: layout.bundle_dir(&scope),
            scope,
            release_date,
            readme: None,
        }
    }

    /// Prepend a summary sheet to the workbook.
    pub fn with_readme(mut self, readme: Readme) -> Self {
        self.readme = Some(readme);
        self
    }

    pub fn scope(&self) -> &BundleScope {
        &self.scope
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.dir.join(self.scope.workbook_name())
    }

    pub fn csv_path(&self, kind: TableKind) -> PathBuf {
        self.dir.join(self.scope.csv_name(kind))
    }

    /// Build every table for `scope` and persist it as a workbook sheet and a
    /// CSV file. Any table failure abandons the bundle before anything is
    /// written.
    pub fn generate(&self, graph: &RecordGraph, scope: &Scope) -> Result<TableSet, ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;

        let tables = TableBuilder::new(graph, scope)
            .with_publication_mode(self.scope.publication_mode())
            .build_all()?;

        let readme_rows = self.readme.as_ref().map(Readme::rows);
        let workbook = self.workbook_path();
        writer::write_workbook(
            &workbook,
            &tables.tables,
            readme_rows.as_deref(),
            self.release_date,
        )?;
        debug!(path = %workbook.display(), "workbook written");

        for table in &tables.tables {
            let path = self.csv_path(table.kind());
            writer::write_csv(&path, table)?;
            debug!(path = %path.display(), rows = table.row_count(), "csv written");
        }

        info!(bundle = %self.scope, tables = tables.tables.len(), "bundle generated");
        Ok(tables)
    }

    /// MD5 of the workbook; an opaque equality token for change detection.
    pub fn checksum(&self) -> Result<Md5Digest, ExportError> {
        Ok(md5_file(&self.workbook_path())?)
    }

    /// Archive the bundle directory to `output_path`.
    pub fn archive(&self, output_path: &Path) -> Result<(), ExportError> {
        writer::write_archive(output_path, &self.dir)?;
        debug!(path = %output_path.display(), "archive written");
        Ok(())
    }
}
