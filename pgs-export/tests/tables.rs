//! Table Builder behaviour against the shared snapshot fixture.

use std::path::PathBuf;

use pgs_core::{snapshot, PublicationId, RecordGraph, ScoreId};
use pgs_export::labels;
use pgs_export::writer::table_to_csv;
use pgs_export::{build_table, PublicationMode, Scope, Table, TableBuilder, TableKind};
use rstest::rstest;

fn graph() -> RecordGraph {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("testdata")
        .join("snapshot");
    snapshot::load_at(&dir).expect("load fixture").graph
}

fn scope(ids: &[&str]) -> Scope {
    Scope::subset(ids.iter().map(|id| ScoreId::from(*id)))
}

/// Display strings of one column.
fn column(table: &Table, label: &str) -> Vec<String> {
    table
        .column(label)
        .unwrap_or_else(|| panic!("no column '{label}'"))
        .cells
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Display string of the cell in `label` on the row whose first cell is `key`.
fn cell(table: &Table, key: &str, label: &str) -> String {
    let keys = column(table, table.columns()[0].label);
    let row = keys
        .iter()
        .position(|k| k == key)
        .unwrap_or_else(|| panic!("no row '{key}'"));
    column(table, label)[row].clone()
}

// ---------------------------------------------------------------------------
// Scope and shape
// ---------------------------------------------------------------------------

#[rstest]
#[case(TableKind::Scores)]
#[case(TableKind::PerformanceMetrics)]
#[case(TableKind::EvaluationSampleSets)]
#[case(TableKind::ScoreDevelopmentSamples)]
#[case(TableKind::Publications)]
#[case(TableKind::EfoTraits)]
#[case(TableKind::Cohorts)]
fn subset_has_same_columns_as_all(#[case] kind: TableKind) {
    let graph = graph();
    let all = build_table(kind, &graph, &Scope::All).unwrap();
    let subset = build_table(kind, &graph, &scope(&["PGS000003"])).unwrap();
    let none = build_table(kind, &graph, &scope(&["PGS999999"])).unwrap();

    let labels: Vec<_> = all.labels().collect();
    assert_eq!(subset.labels().collect::<Vec<_>>(), labels);
    assert_eq!(none.labels().collect::<Vec<_>>(), labels);
    assert_eq!(labels, kind.columns());
}

#[rstest]
#[case(TableKind::Scores)]
#[case(TableKind::PerformanceMetrics)]
#[case(TableKind::EvaluationSampleSets)]
#[case(TableKind::ScoreDevelopmentSamples)]
#[case(TableKind::Publications)]
#[case(TableKind::EfoTraits)]
#[case(TableKind::Cohorts)]
fn empty_subset_is_all_and_builds_are_idempotent(#[case] kind: TableKind) {
    let graph = graph();
    let all = table_to_csv(&build_table(kind, &graph, &Scope::All).unwrap()).unwrap();
    let again = table_to_csv(&build_table(kind, &graph, &Scope::All).unwrap()).unwrap();
    let empty = table_to_csv(&build_table(kind, &graph, &scope(&[])).unwrap()).unwrap();
    assert_eq!(all, again);
    assert_eq!(all, empty);
}

#[test]
fn subset_keeps_only_member_rows() {
    let graph = graph();
    let table = build_table(TableKind::Scores, &graph, &scope(&["PGS000002"])).unwrap();
    assert_eq!(column(&table, labels::SCORE_ID), vec!["PGS000002"]);

    let perf = build_table(TableKind::PerformanceMetrics, &graph, &scope(&["PGS000002"])).unwrap();
    assert_eq!(column(&perf, "PGS Performance Metric (PPM) ID"), vec!["PPM000003"]);
    assert_eq!(column(&perf, "Evaluated Score"), vec!["PGS000002"]);
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

#[test]
fn scores_inline_publication_traits_and_ancestry() {
    let table = build_table(TableKind::Scores, &graph(), &Scope::All).unwrap();

    assert_eq!(
        column(&table, labels::SCORE_ID),
        vec!["PGS000001", "PGS000002", "PGS000003"]
    );
    assert_eq!(cell(&table, "PGS000003", "PGS Name"), "BMI_score  v2");
    assert_eq!(
        cell(&table, "PGS000002", "Mapped Trait(s) (EFO ID)"),
        "EFO_0000305|EFO_0001645"
    );
    assert_eq!(
        cell(&table, "PGS000002", "Mapped Trait(s) (EFO label)"),
        "breast carcinoma|coronary artery disease"
    );
    assert_eq!(cell(&table, "PGS000001", "Publication (PMID)"), "111111");
    assert_eq!(cell(&table, "PGS000003", "Publication (PMID)"), "");
    assert_eq!(cell(&table, "PGS000001", "Number of Variants"), "6630150");
    assert_eq!(
        column(&table, "Score and results match the original publication"),
        vec!["True", "False", ""]
    );
    assert_eq!(
        cell(
            &table,
            "PGS000001",
            "Ancestry Distribution (%) - Source of Variant Associations (GWAS)"
        ),
        "European:95.5|East Asian:4.5"
    );
    assert_eq!(
        cell(&table, "PGS000001", "Ancestry Distribution (%) - PGS Evaluation"),
        "European:100"
    );
    assert_eq!(
        cell(&table, "PGS000001", "Ancestry Distribution (%) - Score Development/Training"),
        ""
    );
    assert_eq!(
        cell(&table, "PGS000002", "Ancestry Distribution (%) - Score Development/Training"),
        "European:90|East Asian:10"
    );
}

// ---------------------------------------------------------------------------
// Performance metrics
// ---------------------------------------------------------------------------

#[test]
fn performance_rows_follow_source_order_for_all_and_id_order_for_subsets() {
    let graph = graph();
    let all = build_table(TableKind::PerformanceMetrics, &graph, &Scope::All).unwrap();
    assert_eq!(
        column(&all, "PGS Performance Metric (PPM) ID"),
        vec!["PPM000002", "PPM000001", "PPM000003", "PPM000004"]
    );

    let subset = build_table(
        TableKind::PerformanceMetrics,
        &graph,
        &scope(&["PGS000002", "PGS000001"]),
    )
    .unwrap();
    assert_eq!(
        column(&subset, "PGS Performance Metric (PPM) ID"),
        vec!["PPM000001", "PPM000002", "PPM000003"]
    );
}

#[test]
fn hazard_ratio_with_interval_and_other_metrics() {
    let table = build_table(TableKind::PerformanceMetrics, &graph(), &Scope::All).unwrap();

    assert_eq!(cell(&table, "PPM000002", "Hazard Ratio (HR)"), "1.5 [1.1,2.0]");
    for label in [
        "Odds Ratio (OR)",
        "Beta",
        "Area Under the Receiver-Operating Characteristic Curve (AUROC)",
        "Concordance Statistic (C-index)",
    ] {
        assert_eq!(cell(&table, "PPM000002", label), "", "{label} should be empty");
    }
    assert_eq!(
        cell(&table, "PPM000002", labels::OTHER_METRICS),
        "R2 = 0.3, NRI = 0.1"
    );
    assert_eq!(cell(&table, "PPM000002", labels::SAMPLE_SET_ID), "PSS000002");
    assert_eq!(cell(&table, "PPM000002", "Publication (PMID)"), "222222");
}

#[test]
fn classification_metrics_and_repeated_types() {
    let table = build_table(TableKind::PerformanceMetrics, &graph(), &Scope::All).unwrap();

    assert_eq!(
        cell(
            &table,
            "PPM000001",
            "Area Under the Receiver-Operating Characteristic Curve (AUROC)"
        ),
        "0.71 (0.01)"
    );
    assert_eq!(
        cell(&table, "PPM000001", "Concordance Statistic (C-index)"),
        "0.65"
    );
    assert_eq!(
        cell(&table, "PPM000001", "PGS Performance: Other Relevant Information"),
        "Evaluated in hold-out set"
    );

    assert_eq!(cell(&table, "PPM000003", "Odds Ratio (OR)"), "1.4 (0.05)");
    assert_eq!(cell(&table, "PPM000003", "Beta"), "0.5 (0.1)");
    assert_eq!(cell(&table, "PPM000003", labels::OTHER_METRICS), "RR = 1.8");

    assert_eq!(cell(&table, "PPM000004", labels::OTHER_METRICS), "");
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

#[test]
fn shared_sample_set_lists_every_associated_score() {
    let table = build_table(TableKind::EvaluationSampleSets, &graph(), &Scope::All).unwrap();

    assert_eq!(
        column(&table, labels::SAMPLE_SET_ID),
        vec!["PSS000001", "PSS000001", "PSS000002", "PSS000003"]
    );
    let associated = column(&table, labels::SCORE_ID);
    assert_eq!(associated[0], "PGS000001, PGS000002");
    assert_eq!(associated[1], "PGS000001, PGS000002");
    assert_eq!(associated[2], "PGS000001");

    assert_eq!(column(&table, labels::COHORTS)[1], "BBJ|UKB");
    assert_eq!(column(&table, "Sample Age")[0], "median:60;iqr:[52,67]");
    assert_eq!(column(&table, "Sample Age")[1], "");
}

#[test]
fn sample_set_association_is_limited_to_scope() {
    let table = build_table(
        TableKind::EvaluationSampleSets,
        &graph(),
        &scope(&["PGS000001"]),
    )
    .unwrap();
    assert_eq!(
        column(&table, labels::SAMPLE_SET_ID),
        vec!["PSS000001", "PSS000001", "PSS000002"]
    );
    assert!(column(&table, labels::SCORE_ID)
        .iter()
        .all(|s| s == "PGS000001"));
}

#[test]
fn development_samples_are_tagged_by_stage() {
    let table = build_table(
        TableKind::ScoreDevelopmentSamples,
        &graph(),
        &scope(&["PGS000001"]),
    )
    .unwrap();

    assert_eq!(
        column(&table, labels::DEVELOPMENT_STAGE),
        vec![labels::STAGE_GWAS, labels::STAGE_TRAINING]
    );
    assert_eq!(column(&table, "Source PubMed ID (PMID)")[0], "26343387");
    assert_eq!(
        column(&table, "Sample Age")[1],
        "mean:55.2;sd:8.1;unit:years"
    );
    assert_eq!(
        column(&table, "Followup Time")[1],
        "median:10;range:[1,20.5];unit:years"
    );
    assert_eq!(
        column(&table, "Phenotype Definitions and Methods")[1],
        "Incident CAD from registry"
    );
    assert_eq!(
        column(&table, "Additional Sample/Cohort Information")[1],
        "Subset of participants"
    );
    assert_eq!(column(&table, "Percent of Participants Who are Male")[1], "48.5");
}

// ---------------------------------------------------------------------------
// Publications, traits, cohorts
// ---------------------------------------------------------------------------

#[test]
fn publications_include_performance_publications_by_default() {
    let table = build_table(TableKind::Publications, &graph(), &scope(&["PGS000001"])).unwrap();
    assert_eq!(
        column(&table, "PGS Publication/Study (PGP) ID"),
        vec!["PGP000001", "PGP000002"]
    );
    assert_eq!(
        cell(&table, "PGP000002", "Title"),
        "External validation of coronary scores"
    );
    assert_eq!(cell(&table, "PGP000002", "PubMed ID (PMID)"), "222222");
}

#[test]
fn score_only_mode_records_score_publications() {
    let graph = graph();
    let scope = scope(&["PGS000001"]);
    let tables = TableBuilder::new(&graph, &scope)
        .with_publication_mode(PublicationMode::ScoreOnly)
        .build_all()
        .unwrap();

    let publications = tables.get(TableKind::Publications).unwrap();
    assert_eq!(
        column(publications, "PGS Publication/Study (PGP) ID"),
        vec!["PGP000001"]
    );
    assert_eq!(
        tables.publication_ids.iter().cloned().collect::<Vec<_>>(),
        vec![PublicationId::from("PGP000001")]
    );
    let full = TableBuilder::new(&graph, &scope).build_all().unwrap();
    assert!(full.publication_ids.is_empty());
    let kinds: Vec<_> = tables.tables.iter().map(|t| t.kind()).collect();
    assert_eq!(kinds, TableKind::all());
}

#[test]
fn traits_deduplicated_in_catalog_order() {
    let graph = graph();
    let subset = build_table(
        TableKind::EfoTraits,
        &graph,
        &scope(&["PGS000001", "PGS000002"]),
    )
    .unwrap();
    assert_eq!(
        column(&subset, "Ontology Trait ID"),
        vec!["EFO_0001645", "EFO_0000305"]
    );

    let all = build_table(TableKind::EfoTraits, &graph, &Scope::All).unwrap();
    assert_eq!(all.row_count(), 3);
    assert_eq!(
        column(&all, "Ontology Trait ID"),
        vec!["EFO_0001645", "EFO_0000305", "EFO_0004340"]
    );
    assert_eq!(
        cell(&all, "EFO_0004340", "Ontology Trait Description"),
        "An indicator of body density  as determined by the relationship of body weight to body height."
    );
}

#[test]
fn subset_traits_follow_catalog_not_score_order() {
    // PGS000002 lists breast carcinoma before coronary artery disease.
    let table = build_table(TableKind::EfoTraits, &graph(), &scope(&["PGS000002"])).unwrap();
    assert_eq!(
        column(&table, "Ontology Trait ID"),
        vec!["EFO_0001645", "EFO_0000305"]
    );
}

#[test]
fn cohorts_cover_development_and_evaluation_samples() {
    let table = build_table(TableKind::Cohorts, &graph(), &scope(&["PGS000001"])).unwrap();
    assert_eq!(
        column(&table, "Cohort ID"),
        vec!["UKB", "FINRISK", "BBJ", "EPIC"]
    );
    assert_eq!(
        cell(&table, "FINRISK", "Previous/other/additional names"),
        "National FINRISK"
    );

    let bmi = build_table(TableKind::Cohorts, &graph(), &scope(&["PGS000003"])).unwrap();
    assert_eq!(column(&bmi, "Cohort ID"), vec!["FINRISK"]);
}
