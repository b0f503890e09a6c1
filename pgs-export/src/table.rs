//! Table model: kinds, cells, columnar tables and the per-bundle table set.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Number;

use pgs_core::{PublicationId, ScoreId};

use crate::error::ExportError;
use crate::labels;

// ---------------------------------------------------------------------------
// TableKind
// ---------------------------------------------------------------------------

/// The fixed catalog of metadata tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKind {
    Scores,
    PerformanceMetrics,
    EvaluationSampleSets,
    ScoreDevelopmentSamples,
    Publications,
    EfoTraits,
    Cohorts,
}

impl TableKind {
    /// Every kind, in workbook sheet order.
    pub fn all() -> &'static [TableKind] {
        &[
            TableKind::Publications,
            TableKind::EfoTraits,
            TableKind::Scores,
            TableKind::ScoreDevelopmentSamples,
            TableKind::PerformanceMetrics,
            TableKind::EvaluationSampleSets,
            TableKind::Cohorts,
        ]
    }

    /// Workbook sheet name.
    pub fn sheet_label(self) -> &'static str {
        match self {
            TableKind::Scores => "Scores",
            TableKind::PerformanceMetrics => "Performance Metrics",
            TableKind::EvaluationSampleSets => "Evaluation Sample Sets",
            TableKind::ScoreDevelopmentSamples => "Score Development Samples",
            TableKind::Publications => "Publications",
            TableKind::EfoTraits => "EFO Traits",
            TableKind::Cohorts => "Cohorts",
        }
    }

    /// Suffix used in CSV file names (`<prefix>_metadata_<suffix>.csv`).
    pub fn file_suffix(self) -> &'static str {
        match self {
            TableKind::Scores => "scores",
            TableKind::PerformanceMetrics => "performance_metrics",
            TableKind::EvaluationSampleSets => "evaluation_sample_sets",
            TableKind::ScoreDevelopmentSamples => "score_development_samples",
            TableKind::Publications => "publications",
            TableKind::EfoTraits => "efo_traits",
            TableKind::Cohorts => "cohorts",
        }
    }

    /// Column labels, in order.
    pub fn columns(self) -> &'static [&'static str] {
        labels::columns(self)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

impl FromStr for TableKind {
    type Err = ExportError;

    /// Accepts the file suffix (`efo_traits`) or the sheet name (`EFO Traits`),
    /// case-insensitively; `-` is read as `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        TableKind::all()
            .iter()
            .copied()
            .find(|kind| kind.file_suffix() == wanted)
            .ok_or_else(|| ExportError::UnknownTableKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One table cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing value: a blank workbook cell, an empty CSV field.
    #[default]
    Empty,
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Cell {
    /// Free text, cleaned for single-line output.
    pub fn text(value: &str) -> Cell {
        Cell::Text(clean_text(value))
    }

    pub fn opt_text(value: Option<&str>) -> Cell {
        value.map(Cell::text).unwrap_or(Cell::Empty)
    }

    pub fn int(value: i64) -> Cell {
        Cell::Number(Number::from(value))
    }

    pub fn opt_int(value: Option<i64>) -> Cell {
        value.map(Cell::int).unwrap_or(Cell::Empty)
    }

    pub fn opt_count(value: Option<u64>) -> Cell {
        value.map(|n| Cell::Number(Number::from(n))).unwrap_or(Cell::Empty)
    }

    pub fn opt_number(value: Option<&Number>) -> Cell {
        value.cloned().map(Cell::Number).unwrap_or(Cell::Empty)
    }

    pub fn opt_bool(value: Option<bool>) -> Cell {
        value.map(Cell::Bool).unwrap_or(Cell::Empty)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => n.fmt(f),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

/// Trim surrounding whitespace and turn embedded line breaks and tabs into
/// single spaces.
pub fn clean_text(value: &str) -> String {
    value
        .trim()
        .replace("\r\n", " ")
        .replace(['\n', '\r', '\t'], " ")
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A labelled column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: &'static str,
    pub cells: Vec<Cell>,
}

/// Columnar table; every column always holds the same number of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    kind: TableKind,
    columns: Vec<Column>,
}

impl Table {
    /// An empty table with the kind's column labels.
    pub fn new(kind: TableKind) -> Self {
        let columns = kind
            .columns()
            .iter()
            .map(|&label| Column {
                label,
                cells: Vec::new(),
            })
            .collect();
        Self { kind, columns }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Append one row; `row` must hold exactly one cell per column.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), ExportError> {
        if row.len() != self.columns.len() {
            return Err(ExportError::RaggedTable {
                table: self.kind,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        for (column, cell) in self.columns.iter_mut().zip(row) {
            column.cells.push(cell);
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.label)
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Row `index` as one cell per column.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.cells[i]).collect())
    }
}

// ---------------------------------------------------------------------------
// Scope and TableSet
// ---------------------------------------------------------------------------

/// Which scores a bundle covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// The whole catalog.
    #[default]
    All,
    /// Only these scores and the entities reachable from them.
    Subset(BTreeSet<ScoreId>),
}

impl Scope {
    /// A subset scope; an empty id list means the whole catalog.
    pub fn subset<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ScoreId>,
    {
        let ids: BTreeSet<ScoreId> = ids.into_iter().collect();
        if ids.is_empty() {
            Scope::All
        } else {
            Scope::Subset(ids)
        }
    }

    pub fn single(id: ScoreId) -> Self {
        Scope::subset([id])
    }

    pub fn is_all(&self) -> bool {
        match self {
            Scope::All => true,
            Scope::Subset(ids) => ids.is_empty(),
        }
    }

    pub fn includes(&self, id: &ScoreId) -> bool {
        match self {
            Scope::All => true,
            Scope::Subset(ids) => ids.is_empty() || ids.contains(id),
        }
    }
}

/// All tables of one bundle, in sheet order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSet {
    pub tables: Vec<Table>,
    /// Publications of the in-scope scores, recorded by a score-only build.
    pub publication_ids: BTreeSet<PublicationId>,
}

impl TableSet {
    pub fn get(&self, kind: TableKind) -> Option<&Table> {
        self.tables.iter().find(|t| t.kind() == kind)
    }
}
