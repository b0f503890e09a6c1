//! Release pipeline: export every bundle, publish it against the prior tree
//! and package the new tree.
//!
//! ```text
//! <work>/
//!   export/               fresh bundles (see pgs_export::layout)
//!   new_ftp_content/      the new distribution tree
//!   pgs_ftp_<date>.tar.gz
//! ```
//!
//! Stages run in order and any failure stops the run:
//! 1. export bundles
//! 2. copy `pgs_scores_list.txt` to the tree root
//! 3. publish per-score bundles
//! 4. check released score directories
//! 5. publish the catalog-wide bundle
//! 6. publish publication groups
//! 7. archive the tree
//! 8. write `release_date.txt`

use std::path::{Path, PathBuf};

use tracing::info;

use pgs_core::{ExportConfig, Snapshot};
use pgs_export::layout::SCORES_LIST_FILE;
use pgs_export::{ExportGenerator, ExportSummary};

use crate::check::check_released_directories;
use crate::engine::{PublishEngine, PublishReport};
use crate::error::{io_err, PublishError};
use crate::layout;
use crate::store::DestinationStore;

pub const EXPORT_DIR: &str = "export";
pub const CONTENT_DIR: &str = "new_ftp_content";

/// Result of a full release run.
#[derive(Debug, Clone)]
pub struct ReleaseSummary {
    pub export: ExportSummary,
    /// Per-score reports first, then the catalog-wide bundle, then
    /// publication groups.
    pub reports: Vec<PublishReport>,
    pub content_root: PathBuf,
    pub tree_archive: PathBuf,
}

pub struct ReleasePipeline<'a> {
    snapshot: &'a Snapshot,
    config: &'a ExportConfig,
    prior: &'a dyn DestinationStore,
    work_dir: PathBuf,
}

impl<'a> ReleasePipeline<'a> {
    pub fn new(
        snapshot: &'a Snapshot,
        config: &'a ExportConfig,
        prior: &'a dyn DestinationStore,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            snapshot,
            config,
            prior,
            work_dir: work_dir.into(),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.work_dir.join(EXPORT_DIR)
    }

    pub fn content_root(&self) -> PathBuf {
        self.work_dir.join(CONTENT_DIR)
    }

    pub fn run(&self) -> Result<ReleaseSummary, PublishError> {
        let release = &self.snapshot.release;
        let export_dir = self.export_dir();
        let content_root = self.content_root();
        recreate_dir(&export_dir)?;
        recreate_dir(&content_root)?;
        info!(
            "release {} (previous {}), prior tree: {}",
            release.date_label(),
            release.previous_label(),
            self.prior.describe()
        );

        let generator =
            ExportGenerator::new(&export_dir, &self.snapshot.graph, release, self.config);
        let export = generator.run()?;

        let scores_list = content_root.join(SCORES_LIST_FILE);
        std::fs::copy(generator.layout().scores_list_path(), &scores_list)
            .map_err(|e| io_err(&scores_list, e))?;

        let engine = PublishEngine::new(self.prior, &export_dir, &content_root, release);
        let mut reports = engine.publish_scores(&export.scores)?;

        check_released_directories(
            &content_root,
            &self.snapshot.graph,
            release,
            &export.scores,
        )?;

        reports.push(engine.publish_all()?);
        reports.extend(engine.publish_publication_groups(&export.publication_groups)?);

        let tree_archive = self.work_dir.join(layout::tree_archive_name(release));
        pgs_export::writer::write_archive(&tree_archive, &content_root)?;
        info!("wrote: {}", tree_archive.display());

        let marker = content_root.join(layout::RELEASE_DATE_FILE);
        std::fs::write(&marker, release.date_label()).map_err(|e| io_err(&marker, e))?;

        Ok(ReleaseSummary {
            export,
            reports,
            content_root,
            tree_archive,
        })
    }
}

/// Empty `dir`, creating it if needed.
fn recreate_dir(dir: &Path) -> Result<(), PublishError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))
}
