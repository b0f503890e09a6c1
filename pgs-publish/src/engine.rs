//! Publish Engine: classify each fresh bundle against the prior tree and
//! copy it into the new one.
//!
//! | prior workbook            | outcome     | action                                  |
//! |---------------------------|-------------|-----------------------------------------|
//! | absent                    | `New`       | copy workbook, archive and CSVs         |
//! | present, checksum differs | `Updated`   | copy all; archive the prior bundle only |
//! |                           |             | when at least one CSV changed           |
//! | present, checksum equal   | `Unchanged` | nothing                                 |
//!
//! The new tree is always a local directory. Only the prior tree goes through
//! a [`DestinationStore`], so a remote mirror and a local copy behave alike.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use flate2::read::GzDecoder;
use tracing::{debug, info, warn};

use pgs_core::digest::{md5_file, Md5Digest};
use pgs_core::{PublicationId, Release, ScoreId};
use pgs_export::{BundleScope, ExportLayout};

use crate::error::{io_err, PublishError};
use crate::layout;
use crate::store::DestinationStore;

// ---------------------------------------------------------------------------
// PublishOutcome
// ---------------------------------------------------------------------------

/// What happened to one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Nothing was published for this scope before.
    New,
    /// The workbook changed. `archived` is true when the prior archive was
    /// kept because at least one CSV differed.
    Updated { archived: bool },
    /// Workbook checksums match; nothing was copied.
    Unchanged,
}

impl PublishOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PublishOutcome::New => "NEW",
            PublishOutcome::Updated { .. } => "UPDATED",
            PublishOutcome::Unchanged => "UNCHANGED",
        }
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub scope: BundleScope,
    pub outcome: PublishOutcome,
}

// ---------------------------------------------------------------------------
// PublishEngine
// ---------------------------------------------------------------------------

pub struct PublishEngine<'a> {
    prior: &'a dyn DestinationStore,
    export: ExportLayout,
    content_root: PathBuf,
    release: &'a Release,
}

impl<'a> PublishEngine<'a> {
    /// `export_dir` holds the fresh bundles, `content_root` is the new tree.
    pub fn new(
        prior: &'a dyn DestinationStore,
        export_dir: impl Into<PathBuf>,
        content_root: impl Into<PathBuf>,
        release: &'a Release,
    ) -> Self {
        Self {
            prior,
            export: ExportLayout::new(export_dir),
            content_root: content_root.into(),
            release,
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn publish_scores(&self, ids: &[ScoreId]) -> Result<Vec<PublishReport>, PublishError> {
        ids.iter()
            .map(|id| self.report(BundleScope::Score(id.clone())))
            .collect()
    }

    pub fn publish_all(&self) -> Result<PublishReport, PublishError> {
        self.report(BundleScope::All)
    }

    pub fn publish_publication_groups(
        &self,
        ids: &[PublicationId],
    ) -> Result<Vec<PublishReport>, PublishError> {
        ids.iter()
            .map(|id| self.report(BundleScope::PublicationGroup(id.clone())))
            .collect()
    }

    fn report(&self, scope: BundleScope) -> Result<PublishReport, PublishError> {
        let outcome = self.publish(&scope)?;
        Ok(PublishReport { scope, outcome })
    }

    /// Publish one scope into the new tree.
    ///
    /// The scope directory is created first, so an `Unchanged` scope still
    /// leaves an empty directory behind.
    pub fn publish(&self, scope: &BundleScope) -> Result<PublishOutcome, PublishError> {
        let logical_dir = layout::scope_dir(scope);
        let dest = layout::to_path(&self.content_root, &logical_dir);
        std::fs::create_dir_all(&dest).map_err(|e| io_err(&dest, e))?;

        let fresh = checksum_or_warn(&self.export.workbook_path(scope));
        let prior_workbook = layout::join(&logical_dir, &scope.workbook_name());
        let prior = match self.prior.checksum_of(&prior_workbook) {
            Ok(None) => None,
            Ok(Some(digest)) => Some(Some(digest)),
            Err(e) => {
                warn!("checksum of {prior_workbook} failed, treating as changed: {e}");
                Some(None)
            }
        };

        // An unreadable checksum on either side counts as a mismatch.
        let outcome = match prior {
            None => {
                self.copy_bundle(scope, &dest)?;
                PublishOutcome::New
            }
            Some(Some(prior)) if fresh.as_ref() == Some(&prior) => PublishOutcome::Unchanged,
            Some(_) => {
                let archived = self.update(scope, &logical_dir, &dest)?;
                PublishOutcome::Updated { archived }
            }
        };

        info!("{}: {}", scope, outcome);
        Ok(outcome)
    }

    /// Copy the fresh workbook, archive and CSVs of `scope` into `dest`.
    fn copy_bundle(&self, scope: &BundleScope, dest: &Path) -> Result<(), PublishError> {
        for csv in self.fresh_csvs(scope)? {
            copy_preserving_times(&csv, &dest.join(file_name(&csv)))?;
        }
        self.copy_workbook_and_archive(scope, dest)
    }

    fn copy_workbook_and_archive(
        &self,
        scope: &BundleScope,
        dest: &Path,
    ) -> Result<(), PublishError> {
        copy_preserving_times(
            &self.export.workbook_path(scope),
            &dest.join(scope.workbook_name()),
        )?;
        copy_preserving_times(
            &self.export.archive_path(scope),
            &dest.join(scope.archive_name()),
        )
    }

    /// Copy an updated bundle and keep the prior archive when any CSV
    /// changed. Returns whether the prior archive was kept.
    fn update(
        &self,
        scope: &BundleScope,
        logical_dir: &str,
        dest: &Path,
    ) -> Result<bool, PublishError> {
        let archive_name = scope.archive_name();
        let prior_archive = self
            .prior
            .fetch_bytes(&layout::join(logical_dir, &archive_name))?;

        let staging = tempfile::TempDir::new().map_err(|e| io_err(std::env::temp_dir(), e))?;
        let prior_csv_dir = match &prior_archive {
            Some(bytes) => Some(extract_archive(bytes, &archive_name, staging.path())?),
            None => {
                warn!(
                    "{}: no previous archive at {}, nothing to compare against",
                    scope,
                    self.prior.describe()
                );
                None
            }
        };

        let mut has_difference = false;
        for csv in self.fresh_csvs(scope)? {
            let name = file_name(&csv);
            copy_preserving_times(&csv, &dest.join(&name))?;

            let Some(prior_dir) = &prior_csv_dir else {
                has_difference = true;
                continue;
            };
            let previous = prior_dir.join(&name);
            if !previous.is_file() {
                debug!("new csv: {name}");
                has_difference = true;
                continue;
            }
            match (checksum_or_warn(&previous), checksum_or_warn(&csv)) {
                (Some(old), Some(new)) if old == new => {}
                _ => {
                    debug!("csv changed: {name}");
                    has_difference = true;
                }
            }
        }

        self.copy_workbook_and_archive(scope, dest)?;

        match prior_archive {
            Some(bytes) if has_difference => {
                let dir = layout::to_path(
                    &self.content_root,
                    &layout::archive_dir(scope, self.release),
                );
                std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
                let target = dir.join(layout::archived_name(scope, self.release));
                std::fs::write(&target, bytes).map_err(|e| io_err(&target, e))?;
                info!("archived: {}", target.display());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// `*.csv` files of the fresh bundle, sorted by name.
    fn fresh_csvs(&self, scope: &BundleScope) -> Result<Vec<PathBuf>, PublishError> {
        let dir = self.export.bundle_dir(scope);
        let entries = std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))?;
        let mut csvs = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_err(&dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                csvs.push(path);
            }
        }
        csvs.sort();
        Ok(csvs)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// MD5 of a local file; a failure is logged and yields `None`.
fn checksum_or_warn(path: &Path) -> Option<Md5Digest> {
    match md5_file(path) {
        Ok(digest) => Some(digest),
        Err(e) => {
            warn!("cannot checksum {}: {e}", path.display());
            None
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Copy `from` to `to`, carrying over access and modification times.
fn copy_preserving_times(from: &Path, to: &Path) -> Result<(), PublishError> {
    std::fs::copy(from, to).map_err(|e| io_err(from, e))?;
    let meta = std::fs::metadata(from).map_err(|e| io_err(from, e))?;
    filetime::set_file_times(
        to,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .map_err(|e| io_err(to, e))
}

/// Unpack a prior bundle archive into `staging` and return the directory
/// holding its CSVs.
///
/// Bundle archives carry their directory name as the single top-level entry
/// (`Metadata/`, `all_metadata/`, `PGP000001/`); archives without one are
/// read from the staging root.
fn extract_archive(bytes: &[u8], name: &str, staging: &Path) -> Result<PathBuf, PublishError> {
    let archive_path = staging.join(name);
    std::fs::write(&archive_path, bytes).map_err(|e| io_err(&archive_path, e))?;

    let unpack_dir = staging.join("previous");
    let file = File::open(&archive_path).map_err(|e| io_err(&archive_path, e))?;
    tar::Archive::new(GzDecoder::new(file))
        .unpack(&unpack_dir)
        .map_err(|source| PublishError::Extract {
            archive: archive_path.clone(),
            source,
        })?;

    let entries: Vec<PathBuf> = std::fs::read_dir(&unpack_dir)
        .map_err(|e| io_err(&unpack_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    match entries.as_slice() {
        [single] if single.is_dir() => Ok(single.clone()),
        _ => Ok(unpack_dir),
    }
}
