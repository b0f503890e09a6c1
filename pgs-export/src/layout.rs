//! Export directory layout and artifact naming.
//!
//! ```text
//! <export>/
//!   pgs_scores_list.txt
//!   all_metadata/                     pgs_all_metadata.xlsx, CSVs,
//!                                     md5_checksum.txt
//!   pgs_all_metadata.tar.gz
//!   <PGS>/Metadata/                   <PGS>_metadata.xlsx, CSVs
//!   <PGS>_metadata.tar.gz
//!   publications_metadata/<PGP>/      <PGP>_metadata.xlsx, CSVs
//!   publications_metadata/<PGP>_metadata.tar.gz
//! ```

use std::path::{Path, PathBuf};

use pgs_core::{PublicationId, ScoreId};

use crate::builder::PublicationMode;
use crate::table::TableKind;

pub const ALL_PREFIX: &str = "pgs_all";
pub const ALL_DIR: &str = "all_metadata";
pub const SCORE_METADATA_DIR: &str = "Metadata";
pub const PUBLICATIONS_DIR: &str = "publications_metadata";
pub const SCORES_LIST_FILE: &str = "pgs_scores_list.txt";
pub const CHECKSUM_FILE: &str = "md5_checksum.txt";

/// The unit a bundle is produced for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BundleScope {
    /// Catalog-wide bundle.
    All,
    Score(ScoreId),
    PublicationGroup(PublicationId),
}

impl BundleScope {
    /// File-name prefix: `pgs_all`, `PGS000001` or `PGP000244`.
    pub fn prefix(&self) -> &str {
        match self {
            BundleScope::All => ALL_PREFIX,
            BundleScope::Score(id) => id.as_str(),
            BundleScope::PublicationGroup(id) => id.as_str(),
        }
    }

    pub fn workbook_name(&self) -> String {
        format!("{}_metadata.xlsx", self.prefix())
    }

    pub fn csv_name(&self, kind: TableKind) -> String {
        format!("{}_metadata_{}.csv", self.prefix(), kind.file_suffix())
    }

    pub fn archive_name(&self) -> String {
        format!("{}_metadata.tar.gz", self.prefix())
    }

    /// Publication-group bundles only surface their scores' own publications.
    pub fn publication_mode(&self) -> PublicationMode {
        match self {
            BundleScope::PublicationGroup(_) => PublicationMode::ScoreOnly,
            _ => PublicationMode::Full,
        }
    }
}

impl std::fmt::Display for BundleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleScope::All => f.write_str("all"),
            BundleScope::Score(id) => write!(f, "score {id}"),
            BundleScope::PublicationGroup(id) => write!(f, "publication {id}"),
        }
    }
}

/// Paths inside one export directory.
#[derive(Debug, Clone)]
pub struct ExportLayout {
    root: PathBuf,
}

impl ExportLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the workbook and CSVs of `scope`.
    pub fn bundle_dir(&self, scope: &BundleScope) -> PathBuf {
        match scope {
            BundleScope::All => self.root.join(ALL_DIR),
            BundleScope::Score(id) => self.root.join(id.as_str()).join(SCORE_METADATA_DIR),
            BundleScope::PublicationGroup(id) => {
                self.root.join(PUBLICATIONS_DIR).join(id.as_str())
            }
        }
    }

    /// The tar.gz written next to the bundle directory.
    pub fn archive_path(&self, scope: &BundleScope) -> PathBuf {
        match scope {
            BundleScope::PublicationGroup(_) => {
                self.root.join(PUBLICATIONS_DIR).join(scope.archive_name())
            }
            _ => self.root.join(scope.archive_name()),
        }
    }

    pub fn workbook_path(&self, scope: &BundleScope) -> PathBuf {
        self.bundle_dir(scope).join(scope.workbook_name())
    }

    pub fn csv_path(&self, scope: &BundleScope, kind: TableKind) -> PathBuf {
        self.bundle_dir(scope).join(scope.csv_name(kind))
    }

    pub fn scores_list_path(&self) -> PathBuf {
        self.root.join(SCORES_LIST_FILE)
    }

    pub fn checksum_path(&self) -> PathBuf {
        self.bundle_dir(&BundleScope::All).join(CHECKSUM_FILE)
    }
}
