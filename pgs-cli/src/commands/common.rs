//! Arguments and output shared by several subcommands.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use pgs_core::{snapshot, ExportConfig, PriorSource, PublicationId, Snapshot};
use pgs_publish::{PublishOutcome, PublishReport};

/// Where the release snapshot and export settings come from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Directory holding the release snapshot JSON files.
    #[arg(long)]
    pub snapshot: PathBuf,

    /// YAML export configuration (defaults apply when absent).
    #[arg(long, default_value = "pgs-exports.yaml")]
    pub config: PathBuf,

    /// Only bundle the first N scores (overrides the config).
    #[arg(long)]
    pub score_limit: Option<usize>,

    /// Publication group to bundle separately; repeatable (overrides the config).
    #[arg(long = "group")]
    pub groups: Vec<String>,
}

impl SourceArgs {
    pub fn load(&self) -> Result<(Snapshot, ExportConfig)> {
        let snapshot = snapshot::load_at(&self.snapshot)
            .with_context(|| format!("failed to load snapshot {}", self.snapshot.display()))?;
        let mut config = ExportConfig::load_at(&self.config)
            .with_context(|| format!("failed to load config {}", self.config.display()))?;
        if self.score_limit.is_some() {
            config.score_limit = self.score_limit;
        }
        if !self.groups.is_empty() {
            config.publication_groups = self
                .groups
                .iter()
                .map(|g| PublicationId::from(g.as_str()))
                .collect();
        }
        Ok((snapshot, config))
    }
}

/// The previously published tree.
#[derive(Args, Debug)]
pub struct PriorArgs {
    /// Previous tree on the local filesystem.
    #[arg(long, conflicts_with = "prior_url")]
    pub prior_dir: Option<PathBuf>,

    /// Previous tree served over HTTP(S).
    #[arg(long)]
    pub prior_url: Option<String>,
}

impl PriorArgs {
    /// Flags first, then the config's `prior` entry.
    pub fn resolve(&self, config: &ExportConfig) -> Result<PriorSource> {
        if let Some(dir) = &self.prior_dir {
            return Ok(PriorSource::Local(dir.clone()));
        }
        if let Some(url) = &self.prior_url {
            return Ok(PriorSource::Http(url.clone()));
        }
        match &config.prior {
            Some(prior) => Ok(prior.clone()),
            None => bail!("no previous tree configured: pass --prior-dir or --prior-url"),
        }
    }
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "bundle")]
    bundle: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "archived")]
    archived: String,
}

fn outcome_label(outcome: &PublishOutcome) -> String {
    match outcome {
        PublishOutcome::New => outcome.label().green().to_string(),
        PublishOutcome::Updated { .. } => outcome.label().yellow().to_string(),
        PublishOutcome::Unchanged => outcome.label().bright_black().to_string(),
    }
}

pub fn print_reports(reports: &[PublishReport]) {
    let count = |f: fn(&PublishOutcome) -> bool| reports.iter().filter(|r| f(&r.outcome)).count();
    println!(
        "✓ published {} bundles ({} new, {} updated, {} unchanged)",
        reports.len(),
        count(|o| matches!(o, PublishOutcome::New)),
        count(|o| matches!(o, PublishOutcome::Updated { .. })),
        count(|o| matches!(o, PublishOutcome::Unchanged)),
    );
    if reports.is_empty() {
        return;
    }

    let rows: Vec<ReportRow> = reports
        .iter()
        .map(|r| ReportRow {
            bundle: r.scope.to_string(),
            state: outcome_label(&r.outcome),
            archived: match r.outcome {
                PublishOutcome::Updated { archived: true } => "yes".to_string(),
                _ => String::new(),
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
