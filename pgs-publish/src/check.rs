//! Post-publish check: every newly released entry has a score directory in
//! the new tree.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info};

use pgs_core::{RecordGraph, Release, ScoreId};

use crate::error::PublishError;
use crate::layout;

/// Fails with [`PublishError::MissingDirectories`] listing every released
/// score, and every score of a released performance, that has no
/// `scores/<PGS>` directory under `content_root`.
///
/// Scores of the snapshot left out of `exported` (a score limit) are not
/// expected in the tree. Released ids unknown to the snapshot always are.
pub fn check_released_directories(
    content_root: &Path,
    graph: &RecordGraph,
    release: &Release,
    exported: &[ScoreId],
) -> Result<(), PublishError> {
    let exported: BTreeSet<&ScoreId> = exported.iter().collect();
    let known: BTreeSet<&ScoreId> = graph.score_ids().collect();
    let missing = |id: &ScoreId| {
        if known.contains(id) && !exported.contains(id) {
            debug!("{id} not exported, skipping directory check");
            return false;
        }
        !layout::to_path(content_root, &layout::score_dir(id)).is_dir()
    };

    let scores: BTreeSet<ScoreId> = release
        .released_score_ids
        .iter()
        .filter(|id| missing(id))
        .cloned()
        .collect();

    let performance_scores: BTreeSet<ScoreId> = graph
        .performances()
        .iter()
        .filter(|p| release.released_performance_ids.contains(&p.id))
        .map(|p| &p.associated_pgs_id)
        .filter(|id| missing(id))
        .cloned()
        .collect();

    if scores.is_empty() && performance_scores.is_empty() {
        info!(
            "released directories present: {} scores, {} performances",
            release.released_score_ids.len(),
            release.released_performance_ids.len()
        );
        return Ok(());
    }

    Err(PublishError::MissingDirectories {
        scores: scores.into_iter().collect(),
        performance_scores: performance_scores.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pgs_core::{
        Performance, PerformanceId, PerformanceMetrics, PublicationId, PublicationRef, SampleSet,
        SampleSetId,
    };
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn perf(id: &str, score: &str) -> Performance {
        Performance {
            id: PerformanceId::from(id),
            associated_pgs_id: ScoreId::from(score),
            sampleset: SampleSet {
                id: SampleSetId::from("PSS000001"),
                samples: vec![],
            },
            publication: PublicationRef {
                id: PublicationId::from("PGP000001"),
                pmid: None,
                doi: None,
            },
            phenotyping_reported: None,
            covariates: None,
            performance_comments: None,
            performance_metrics: PerformanceMetrics::default(),
        }
    }

    fn release(scores: &[&str], performances: &[&str]) -> Release {
        Release {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            previous_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            released_score_ids: scores.iter().map(|s| ScoreId::from(*s)).collect(),
            released_performance_ids: performances
                .iter()
                .map(|p| PerformanceId::from(*p))
                .collect(),
        }
    }

    fn graph() -> RecordGraph {
        let scores = ["PGS000001", "PGS000002", "PGS000003"]
            .into_iter()
            .map(|id| {
                serde_json::from_value(serde_json::json!({
                    "id": id,
                    "name": id,
                    "publication": {"id": "PGP000001"}
                }))
                .unwrap()
            })
            .collect();
        RecordGraph::new(
            scores,
            vec![],
            vec![],
            vec![perf("PPM000001", "PGS000002"), perf("PPM000002", "PGS000003")],
            vec![],
            BTreeMap::new(),
        )
    }

    fn exported() -> Vec<ScoreId> {
        graph().score_ids().cloned().collect()
    }

    #[test]
    fn passes_when_every_directory_exists() {
        let tmp = TempDir::new().unwrap();
        for id in ["PGS000001", "PGS000002"] {
            std::fs::create_dir_all(tmp.path().join("scores").join(id).join("Metadata")).unwrap();
        }
        let release = release(&["PGS000001"], &["PPM000001"]);
        check_released_directories(tmp.path(), &graph(), &release, &exported()).unwrap();
    }

    #[test]
    fn reports_sorted_missing_ids() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("scores/PGS000002")).unwrap();
        let release = release(
            &["PGS000009", "PGS000004", "PGS000002"],
            &["PPM000001", "PPM000002"],
        );

        let err =
            check_released_directories(tmp.path(), &graph(), &release, &exported()).unwrap_err();
        match err {
            PublishError::MissingDirectories {
                scores,
                performance_scores,
            } => {
                assert_eq!(scores, vec![ScoreId::from("PGS000004"), ScoreId::from("PGS000009")]);
                assert_eq!(performance_scores, vec![ScoreId::from("PGS000003")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scores_left_out_of_the_export_are_not_expected() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("scores/PGS000001")).unwrap();
        let release = release(&["PGS000001", "PGS000003"], &["PPM000002"]);
        let exported = vec![ScoreId::from("PGS000001")];
        check_released_directories(tmp.path(), &graph(), &release, &exported).unwrap();
    }
}
