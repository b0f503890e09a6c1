//! Export generator end to end: every bundle of the fixture release.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use pgs_core::digest::md5_file;
use pgs_core::{snapshot, ExportConfig, PublicationId, ScoreId, Snapshot};
use pgs_export::{BundleScope, ExportGenerator, TableKind};
use tempfile::TempDir;

fn fixture() -> Snapshot {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("testdata")
        .join("snapshot");
    snapshot::load_at(&dir).expect("load fixture")
}

fn archive_entries(path: &Path) -> Vec<String> {
    let mut archive = tar::Archive::new(GzDecoder::new(File::open(path).unwrap()));
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn run_produces_every_bundle() {
    let tmp = TempDir::new().unwrap();
    let snapshot = fixture();
    let config = ExportConfig {
        publication_groups: vec![PublicationId::from("PGP000001"), PublicationId::from("PGP999999")],
        ..ExportConfig::default()
    };
    let generator = ExportGenerator::new(tmp.path(), &snapshot.graph, &snapshot.release, &config);

    let summary = generator.run().unwrap();
    let layout = generator.layout();

    // Scores list
    assert_eq!(
        std::fs::read_to_string(layout.scores_list_path()).unwrap(),
        "PGS000001\nPGS000002\nPGS000003\n"
    );

    // Catalog-wide bundle
    let all = BundleScope::All;
    for kind in TableKind::all() {
        assert!(layout.csv_path(&all, *kind).exists(), "missing {kind}");
    }
    let digest = std::fs::read_to_string(layout.checksum_path()).unwrap();
    assert_eq!(digest, md5_file(&layout.workbook_path(&all)).unwrap().0);
    assert_eq!(digest, summary.all_checksum.0);
    let entries = archive_entries(&layout.archive_path(&all));
    assert!(entries.iter().any(|e| e == "all_metadata/pgs_all_metadata.xlsx"));

    // Publication groups
    assert_eq!(summary.publication_groups, vec![PublicationId::from("PGP000001")]);
    assert_eq!(summary.skipped_groups, vec![PublicationId::from("PGP999999")]);
    assert_eq!(
        summary.group_publications[&PublicationId::from("PGP000001")]
            .iter()
            .collect::<Vec<_>>(),
        vec![&PublicationId::from("PGP000001")]
    );
    let group = BundleScope::PublicationGroup(PublicationId::from("PGP000001"));
    assert!(layout.workbook_path(&group).exists());
    assert!(tmp
        .path()
        .join("publications_metadata/PGP000001_metadata.tar.gz")
        .exists());
    let publications =
        std::fs::read_to_string(layout.csv_path(&group, TableKind::Publications)).unwrap();
    assert_eq!(publications.lines().count(), 2, "header plus the score publication");

    // Per-score bundles
    assert_eq!(summary.scores.len(), 3);
    let entries = archive_entries(&tmp.path().join("PGS000002_metadata.tar.gz"));
    assert!(entries
        .iter()
        .any(|e| e == "Metadata/PGS000002_metadata_performance_metrics.csv"));
    let scores_csv = std::fs::read_to_string(
        tmp.path()
            .join("PGS000002/Metadata/PGS000002_metadata_scores.csv"),
    )
    .unwrap();
    assert_eq!(scores_csv.lines().count(), 2);
}

#[test]
fn score_limit_restricts_bundled_scores() {
    let tmp = TempDir::new().unwrap();
    let snapshot = fixture();
    let config = ExportConfig {
        publication_groups: vec![],
        score_limit: Some(1),
        prior: None,
    };
    let generator = ExportGenerator::new(tmp.path(), &snapshot.graph, &snapshot.release, &config);

    let summary = generator.run().unwrap();

    assert_eq!(summary.scores, vec![ScoreId::from("PGS000001")]);
    assert!(tmp.path().join("PGS000001/Metadata").is_dir());
    assert!(!tmp.path().join("PGS000002").exists());

    let all_scores = std::fs::read_to_string(
        tmp.path()
            .join("all_metadata/pgs_all_metadata_scores.csv"),
    )
    .unwrap();
    assert_eq!(all_scores.lines().count(), 2, "header plus the first score");
    assert!(!tmp.path().join("publications_metadata").exists());
}
