//! `pgs-exports release` — export, publish and package a full release.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pgs_publish::{open_store, ReleasePipeline};

use super::common::{print_reports, PriorArgs, SourceArgs};

/// Arguments for `pgs-exports release`.
#[derive(Args, Debug)]
pub struct ReleaseArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub prior: PriorArgs,

    /// Working directory; its `export/` and `new_ftp_content/` are recreated.
    #[arg(long)]
    pub work_dir: PathBuf,
}

impl ReleaseArgs {
    pub fn run(self) -> Result<()> {
        let (snapshot, config) = self.source.load()?;
        let prior = open_store(&self.prior.resolve(&config)?);

        let summary = ReleasePipeline::new(&snapshot, &config, prior.as_ref(), &self.work_dir)
            .run()
            .with_context(|| format!("release {} failed", snapshot.release.date_label()))?;

        print_reports(&summary.reports);
        println!("✓ tree: {}", summary.content_root.display());
        println!("✓ archive: {}", summary.tree_archive.display());
        Ok(())
    }
}
