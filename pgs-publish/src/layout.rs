//! Distribution tree layout.
//!
//! ```text
//! <tree>/
//!   pgs_scores_list.txt
//!   release_date.txt
//!   scores/<PGS>/Metadata/
//!     <PGS>_metadata.xlsx, <PGS>_metadata.tar.gz, <PGS>_metadata_*.csv
//!     archived_versions/<PGS>_metadata_<previous>.tar.gz
//!   metadata/
//!     pgs_all_metadata.xlsx, pgs_all_metadata.tar.gz, pgs_all_metadata_*.csv
//!     previous_releases/<year>/pgs_all_metadata_<previous>.tar.gz
//!     publications/<PGP>/
//!       <PGP>_metadata.xlsx, <PGP>_metadata.tar.gz, <PGP>_metadata_*.csv
//!       archived_versions/<PGP>_metadata_<previous>.tar.gz
//! ```
//!
//! Paths here are logical (`/`-separated, relative to the tree root) so the
//! same layout addresses the local new tree and any prior store.

use std::path::{Path, PathBuf};

use pgs_core::Release;
use pgs_export::BundleScope;

pub const SCORES_DIR: &str = "scores";
pub const METADATA_DIR: &str = "metadata";
pub const SCORE_METADATA_DIR: &str = "Metadata";
pub const PUBLICATIONS_DIR: &str = "publications";
pub const ARCHIVED_VERSIONS_DIR: &str = "archived_versions";
pub const PREVIOUS_RELEASES_DIR: &str = "previous_releases";
pub const RELEASE_DATE_FILE: &str = "release_date.txt";

/// Directory of a bundle scope inside the tree.
pub fn scope_dir(scope: &BundleScope) -> String {
    match scope {
        BundleScope::All => METADATA_DIR.to_string(),
        BundleScope::Score(id) => format!("{SCORES_DIR}/{id}/{SCORE_METADATA_DIR}"),
        BundleScope::PublicationGroup(id) => format!("{METADATA_DIR}/{PUBLICATIONS_DIR}/{id}"),
    }
}

/// Directory of the score itself (the post-publish check looks for it).
pub fn score_dir(id: &pgs_core::ScoreId) -> String {
    format!("{SCORES_DIR}/{id}")
}

/// Where superseded archives of `scope` are kept.
pub fn archive_dir(scope: &BundleScope, release: &Release) -> String {
    match scope {
        BundleScope::All => format!(
            "{METADATA_DIR}/{PREVIOUS_RELEASES_DIR}/{}",
            release.previous_year()
        ),
        _ => format!("{}/{ARCHIVED_VERSIONS_DIR}", scope_dir(scope)),
    }
}

/// `<prefix>_metadata_<previous release>.tar.gz`
pub fn archived_name(scope: &BundleScope, release: &Release) -> String {
    format!("{}_metadata_{}.tar.gz", scope.prefix(), release.previous_label())
}

/// `pgs_ftp_<release>.tar.gz`
pub fn tree_archive_name(release: &Release) -> String {
    format!("pgs_ftp_{}.tar.gz", release.date_label())
}

pub fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// Resolve a logical path under a local root.
pub fn to_path(root: &Path, logical: &str) -> PathBuf {
    logical
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pgs_core::{PublicationId, ScoreId};

    fn release() -> Release {
        Release {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            previous_date: NaiveDate::from_ymd_opt(2023, 12, 20).unwrap(),
            released_score_ids: vec![],
            released_performance_ids: vec![],
        }
    }

    #[test]
    fn scope_dirs() {
        assert_eq!(
            scope_dir(&BundleScope::Score(ScoreId::from("PGS000001"))),
            "scores/PGS000001/Metadata"
        );
        assert_eq!(scope_dir(&BundleScope::All), "metadata");
        assert_eq!(
            scope_dir(&BundleScope::PublicationGroup(PublicationId::from("PGP000244"))),
            "metadata/publications/PGP000244"
        );
    }

    #[test]
    fn archive_locations_use_previous_release() {
        let release = release();
        let score = BundleScope::Score(ScoreId::from("PGS000001"));
        assert_eq!(
            archive_dir(&score, &release),
            "scores/PGS000001/Metadata/archived_versions"
        );
        assert_eq!(
            archived_name(&score, &release),
            "PGS000001_metadata_2023-12-20.tar.gz"
        );
        assert_eq!(
            archive_dir(&BundleScope::All, &release),
            "metadata/previous_releases/2023"
        );
        assert_eq!(
            archived_name(&BundleScope::All, &release),
            "pgs_all_metadata_2023-12-20.tar.gz"
        );
        assert_eq!(tree_archive_name(&release), "pgs_ftp_2024-03-05.tar.gz");
    }

    #[test]
    fn logical_paths_resolve_under_root() {
        assert_eq!(
            to_path(Path::new("/tree"), &join("metadata/", "x.csv")),
            PathBuf::from("/tree/metadata/x.csv")
        );
    }
}
