//! `pgs-exports table` — print one metadata table as CSV.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pgs_core::{snapshot, ScoreId};
use pgs_export::{build_table, writer, Scope, TableKind};

/// Arguments for `pgs-exports table`.
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Table kind: file suffix (`performance_metrics`) or sheet name.
    pub kind: String,

    /// Directory holding the release snapshot JSON files.
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Restrict the table to these scores; repeatable. Omit for the whole catalog.
    #[arg(long = "score")]
    pub scores: Vec<String>,
}

impl TableArgs {
    pub fn run(self) -> Result<()> {
        let kind: TableKind = self.kind.parse()?;
        let snapshot = snapshot::load_at(&self.snapshot)
            .with_context(|| format!("failed to load snapshot {}", self.snapshot.display()))?;
        let scope = Scope::subset(self.scores.iter().map(|s| ScoreId::from(s.as_str())));

        let table = build_table(kind, &snapshot.graph, &scope)
            .with_context(|| format!("failed to build table '{kind}'"))?;
        let bytes = writer::table_to_csv(&table).context("failed to encode CSV")?;
        std::io::stdout()
            .write_all(&bytes)
            .context("failed to write to stdout")?;
        Ok(())
    }
}
