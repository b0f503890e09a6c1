//! `pgs-exports export` — write every export bundle of a release.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pgs_export::ExportGenerator;

use super::common::SourceArgs;

/// Arguments for `pgs-exports export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Export directory (created if missing).
    #[arg(long)]
    pub out: PathBuf,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let (snapshot, config) = self.source.load()?;
        let generator = ExportGenerator::new(&self.out, &snapshot.graph, &snapshot.release, &config);
        let summary = generator.run().context("export failed")?;

        println!(
            "✓ exported release {} to {}",
            snapshot.release.date_label(),
            self.out.display()
        );
        println!("  catalog-wide checksum: {}", summary.all_checksum);
        println!("  score bundles: {}", summary.scores.len());
        println!(
            "  publication groups: {} ({} skipped)",
            summary.publication_groups.len(),
            summary.skipped_groups.len()
        );
        for (group, publications) in &summary.group_publications {
            let ids: Vec<&str> = publications.iter().map(|p| p.as_str()).collect();
            println!("    {group}: {}", ids.join(", "));
        }
        Ok(())
    }
}
