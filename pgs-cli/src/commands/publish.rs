//! `pgs-exports publish` — publish existing export bundles against the
//! previous tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pgs_export::{BundleScope, ExportGenerator};
use pgs_publish::check::check_released_directories;
use pgs_publish::{open_store, PublishEngine};

use super::common::{print_reports, PriorArgs, SourceArgs};

/// Arguments for `pgs-exports publish`.
#[derive(Args, Debug)]
pub struct PublishArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub prior: PriorArgs,

    /// Directory written by `pgs-exports export`.
    #[arg(long)]
    pub export_dir: PathBuf,

    /// New distribution tree (created if missing).
    #[arg(long)]
    pub content_dir: PathBuf,
}

impl PublishArgs {
    pub fn run(self) -> Result<()> {
        let (snapshot, config) = self.source.load()?;
        let prior = open_store(&self.prior.resolve(&config)?);
        let release = &snapshot.release;

        // Same selection the export step used.
        let generator = ExportGenerator::new(&self.export_dir, &snapshot.graph, release, &config);
        let scores = generator.bundled_score_ids();
        let groups: Vec<_> = config
            .publication_groups
            .iter()
            .filter(|id| {
                let scope = BundleScope::PublicationGroup((*id).clone());
                generator.layout().workbook_path(&scope).is_file()
            })
            .cloned()
            .collect();

        let engine = PublishEngine::new(prior.as_ref(), &self.export_dir, &self.content_dir, release);
        let mut reports = engine
            .publish_scores(&scores)
            .context("publishing score bundles failed")?;
        check_released_directories(&self.content_dir, &snapshot.graph, release, &scores)?;
        reports.push(
            engine
                .publish_all()
                .context("publishing the catalog-wide bundle failed")?,
        );
        reports.extend(
            engine
                .publish_publication_groups(&groups)
                .context("publishing publication groups failed")?,
        );

        print_reports(&reports);
        Ok(())
    }
}
