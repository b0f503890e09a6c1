//! Export generator: every bundle of a release, in order.
//!
//! 1. `pgs_scores_list.txt`
//! 2. the catalog-wide bundle (with Readme sheet and MD5 digest file)
//! 3. one bundle per configured publication group
//! 4. one bundle per score

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::{info, warn};

use pgs_core::digest::{write_digest_file, Md5Digest};
use pgs_core::{ExportConfig, PublicationId, RecordGraph, Release, ScoreId};

use crate::bundle::{ExportBundle, Readme};
use crate::error::{io_err, ExportError};
use crate::layout::{BundleScope, ExportLayout};
use crate::table::Scope;
use crate::writer;

/// What one export run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub all_checksum: Md5Digest,
    pub scores: Vec<ScoreId>,
    pub publication_groups: Vec<PublicationId>,
    /// Configured groups that were not exported (unknown id or no scores).
    pub skipped_groups: Vec<PublicationId>,
    /// Publications of each exported group's scores.
    pub group_publications: BTreeMap<PublicationId, BTreeSet<PublicationId>>,
}

/// Outcome of [`ExportGenerator::export_publication_groups`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupExports {
    pub exported: Vec<PublicationId>,
    pub skipped: Vec<PublicationId>,
    pub publications: BTreeMap<PublicationId, BTreeSet<PublicationId>>,
}

/// Drives [`ExportBundle`] over every scope of one release.
#[derive(Debug, Clone)]
pub struct ExportGenerator<'a> {
    graph: &'a RecordGraph,
    release: &'a Release,
    config: &'a ExportConfig,
    layout: ExportLayout,
}

impl<'a> ExportGenerator<'a> {
    pub fn new(
        export_dir: impl Into<PathBuf>,
        graph: &'a RecordGraph,
        release: &'a Release,
        config: &'a ExportConfig,
    ) -> Self {
        Self {
            graph,
            release,
            config,
            layout: ExportLayout::new(export_dir),
        }
    }

    pub fn layout(&self) -> &ExportLayout {
        &self.layout
    }

    /// Scores that get a bundle: every score, or the first `score_limit`.
    pub fn bundled_score_ids(&self) -> Vec<ScoreId> {
        let ids = self.graph.score_ids().cloned();
        match self.config.score_limit {
            Some(limit) => ids.take(limit).collect(),
            None => ids.collect(),
        }
    }

    pub fn run(&self) -> Result<ExportSummary, ExportError> {
        std::fs::create_dir_all(self.layout.root()).map_err(|e| io_err(self.layout.root(), e))?;

        self.write_scores_list()?;
        let all_checksum = self.export_all()?;
        let groups = self.export_publication_groups()?;
        let scores = self.export_scores()?;

        Ok(ExportSummary {
            all_checksum,
            scores,
            publication_groups: groups.exported,
            skipped_groups: groups.skipped,
            group_publications: groups.publications,
        })
    }

    /// One released score id per line.
    pub fn write_scores_list(&self) -> Result<PathBuf, ExportError> {
        let path = self.layout.scores_list_path();
        let mut contents = String::new();
        for id in self.graph.score_ids() {
            contents.push_str(id.as_str());
            contents.push('\n');
        }
        writer::write_atomic(&path, contents.as_bytes())?;
        info!(scores = self.graph.scores().len(), "scores list written");
        Ok(path)
    }

    /// Catalog-wide bundle, its digest file and its archive.
    pub fn export_all(&self) -> Result<Md5Digest, ExportError> {
        let scope = match self.config.score_limit {
            Some(_) => Scope::subset(self.bundled_score_ids()),
            None => Scope::All,
        };
        let bundle = ExportBundle::new(&self.layout, BundleScope::All, self.release.date)
            .with_readme(Readme::for_graph(self.graph, self.release.date_label()));

        bundle.generate(self.graph, &scope)?;
        let checksum = bundle.checksum()?;
        write_digest_file(&self.layout.checksum_path(), &checksum)?;
        bundle.archive(&self.layout.archive_path(&BundleScope::All))?;

        info!(checksum = %checksum, "catalog-wide bundle exported");
        Ok(checksum)
    }

    /// Bundles for the configured publication groups, scoped to each
    /// publication's evaluated scores.
    pub fn export_publication_groups(&self) -> Result<GroupExports, ExportError> {
        let mut groups = GroupExports::default();

        for id in &self.config.publication_groups {
            let Some(publication) = self.graph.publication(id) else {
                warn!(publication = %id, "publication group not found, skipping");
                groups.skipped.push(id.clone());
                continue;
            };
            let evaluated = &publication.associated_pgs_ids.evaluation;
            if evaluated.is_empty() {
                warn!(publication = %id, "publication group has no evaluated scores, skipping");
                groups.skipped.push(id.clone());
                continue;
            }

            let bundle_scope = BundleScope::PublicationGroup(id.clone());
            let bundle = ExportBundle::new(&self.layout, bundle_scope.clone(), self.release.date);
            let tables = bundle.generate(self.graph, &Scope::subset(evaluated.iter().cloned()))?;
            bundle.archive(&self.layout.archive_path(&bundle_scope))?;

            info!(
                publication = %id,
                scores = evaluated.len(),
                publications = tables.publication_ids.len(),
                "publication group exported"
            );
            groups.exported.push(id.clone());
            groups.publications.insert(id.clone(), tables.publication_ids);
        }
        Ok(groups)
    }

    /// One bundle and archive per score.
    pub fn export_scores(&self) -> Result<Vec<ScoreId>, ExportError> {
        let ids = self.bundled_score_ids();
        for id in &ids {
            self.export_score(id)?;
        }
        info!(scores = ids.len(), "per-score bundles exported");
        Ok(ids)
    }

    pub fn export_score(&self, id: &ScoreId) -> Result<ExportBundle, ExportError> {
        let bundle_scope = BundleScope::Score(id.clone());
        let bundle = ExportBundle::new(&self.layout, bundle_scope.clone(), self.release.date);
        bundle.generate(self.graph, &Scope::single(id.clone()))?;
        bundle.archive(&self.layout.archive_path(&bundle_scope))?;
        Ok(bundle)
    }
}
