//! Snapshot loading.
//!
//! # Storage layout
//!
//! ```text
//! <snapshot>/
//!   score.json                 (required)
//!   publication.json           (required)
//!   trait.json                 (required)
//!   performance.json           (required)
//!   cohort.json                (optional, empty when absent)
//!   ancestry_categories.json   (required)
//!   release.json               (required)
//! ```
//!
//! Entity files hold either a bare JSON array or a paginated REST envelope
//! (`{"count": …, "results": […]}`); both shapes load the same way.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::graph::RecordGraph;
use crate::types::{PerformanceId, ScoreId};

pub const SCORE_FILE: &str = "score.json";
pub const PUBLICATION_FILE: &str = "publication.json";
pub const TRAIT_FILE: &str = "trait.json";
pub const PERFORMANCE_FILE: &str = "performance.json";
pub const COHORT_FILE: &str = "cohort.json";
pub const ANCESTRY_FILE: &str = "ancestry_categories.json";
pub const RELEASE_FILE: &str = "release.json";

/// Release descriptor: the release being published and the one it supersedes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub date: NaiveDate,
    pub previous_date: NaiveDate,
    #[serde(default)]
    pub released_score_ids: Vec<ScoreId>,
    #[serde(default)]
    pub released_performance_ids: Vec<PerformanceId>,
}

impl Release {
    /// `YYYY-MM-DD` label of the current release.
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DD` label of the previous release, used to name archives.
    pub fn previous_label(&self) -> String {
        self.previous_date.format("%Y-%m-%d").to_string()
    }

    /// Year of the previous release, used to bucket catalog-wide archives.
    pub fn previous_year(&self) -> String {
        self.previous_date.format("%Y").to_string()
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.previous_date >= self.date {
            return Err(CoreError::InvalidRelease(format!(
                "previous release {} is not before current release {}",
                self.previous_label(),
                self.date_label()
            )));
        }
        Ok(())
    }
}

/// A loaded snapshot: the record graph plus its release descriptor.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub graph: RecordGraph,
    pub release: Release,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntityFileCompat<T> {
    Paginated { results: Vec<T> },
    List(Vec<T>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AncestryCategoryCompat {
    Label(String),
    Detailed { display_category: String },
}

/// Load the snapshot stored in `dir`.
///
/// Returns `CoreError::SnapshotNotFound` if the directory or a required file
/// is absent and `CoreError::Json` (with the file path) if a file is malformed.
pub fn load_at(dir: &Path) -> Result<Snapshot, CoreError> {
    if !dir.is_dir() {
        return Err(CoreError::SnapshotNotFound {
            path: dir.to_path_buf(),
        });
    }

    let scores = load_entities(&dir.join(SCORE_FILE))?;
    let publications = load_entities(&dir.join(PUBLICATION_FILE))?;
    let traits = load_entities(&dir.join(TRAIT_FILE))?;
    let performances = load_entities(&dir.join(PERFORMANCE_FILE))?;

    let cohort_path = dir.join(COHORT_FILE);
    let cohorts = if cohort_path.exists() {
        load_entities(&cohort_path)?
    } else {
        Vec::new()
    };

    let raw_categories: BTreeMap<String, AncestryCategoryCompat> =
        read_json(&dir.join(ANCESTRY_FILE))?;
    let ancestry_categories = raw_categories
        .into_iter()
        .map(|(code, category)| {
            let label = match category {
                AncestryCategoryCompat::Label(label) => label,
                AncestryCategoryCompat::Detailed { display_category } => display_category,
            };
            (code, label)
        })
        .collect();

    let release: Release = read_json(&dir.join(RELEASE_FILE))?;
    release.validate()?;

    Ok(Snapshot {
        graph: RecordGraph::new(
            scores,
            publications,
            traits,
            performances,
            cohorts,
            ancestry_categories,
        ),
        release,
    })
}

fn load_entities<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CoreError> {
    match read_json::<EntityFileCompat<T>>(path)? {
        EntityFileCompat::Paginated { results } => Ok(results),
        EntityFileCompat::List(items) => Ok(items),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    if !path.exists() {
        return Err(CoreError::SnapshotNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|e| CoreError::Json {
        path: PathBuf::from(path),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
