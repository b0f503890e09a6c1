//! Column labels per table kind.
//!
//! These strings are the public header of every workbook sheet and CSV file;
//! downstream consumers key on them, so they never change between releases.

use crate::table::TableKind;

pub const SCORE_ID: &str = "Polygenic Score (PGS) ID";
pub const SAMPLE_SET_ID: &str = "PGS Sample Set (PSS)";
pub const PUBLICATION_ID: &str = "PGS Publication (PGP) ID";
pub const DEVELOPMENT_STAGE: &str = "Stage of PGS Development";
pub const COHORTS: &str = "Cohort(s)";
pub const OTHER_METRICS: &str = "Other Metric(s)";

/// Stage labels of the development samples table.
pub const STAGE_GWAS: &str = "Source of Variant Associations (GWAS)";
pub const STAGE_TRAINING: &str = "Score Development/Training";

pub const SCORES: &[&str] = &[
    SCORE_ID,
    "PGS Name",
    "Reported Trait",
    "Mapped Trait(s) (EFO label)",
    "Mapped Trait(s) (EFO ID)",
    "PGS Development Method",
    "PGS Development Details/Relevant Parameters",
    "Original Genome Build",
    "Number of Variants",
    "Number of Interaction Terms",
    "Type of Variant Weight",
    PUBLICATION_ID,
    "Publication (PMID)",
    "Publication (doi)",
    "Score and results match the original publication",
    "Ancestry Distribution (%) - Source of Variant Associations (GWAS)",
    "Ancestry Distribution (%) - Score Development/Training",
    "Ancestry Distribution (%) - PGS Evaluation",
    "FTP link",
    "Release Date",
    "License/Terms of Use",
];

pub const PERFORMANCE_METRICS: &[&str] = &[
    "PGS Performance Metric (PPM) ID",
    "Evaluated Score",
    SAMPLE_SET_ID,
    PUBLICATION_ID,
    "Reported Trait",
    "Covariates Included in the Model",
    "PGS Performance: Other Relevant Information",
    "Publication (PMID)",
    "Publication (doi)",
    "Hazard Ratio (HR)",
    "Odds Ratio (OR)",
    "Beta",
    "Area Under the Receiver-Operating Characteristic Curve (AUROC)",
    "Concordance Statistic (C-index)",
    OTHER_METRICS,
];

pub const EVALUATION_SAMPLE_SETS: &[&str] = &[
    SAMPLE_SET_ID,
    SCORE_ID,
    "Number of Individuals",
    "Number of Cases",
    "Number of Controls",
    "Percent of Participants Who are Male",
    "Sample Age",
    "Broad Ancestry Category",
    "Ancestry (e.g. French, Chinese)",
    "Country of Recruitment",
    "Additional Ancestry Description",
    "Phenotype Definitions and Methods",
    "Followup Time",
    "GWAS Catalog Study ID (GCST...)",
    "Source PubMed ID (PMID)",
    "Source DOI",
    COHORTS,
    "Additional Sample/Cohort Information",
];

pub const SCORE_DEVELOPMENT_SAMPLES: &[&str] = &[
    SCORE_ID,
    DEVELOPMENT_STAGE,
    "Number of Individuals",
    "Number of Cases",
    "Number of Controls",
    "Percent of Participants Who are Male",
    "Sample Age",
    "Broad Ancestry Category",
    "Ancestry (e.g. French, Chinese)",
    "Country of Recruitment",
    "Additional Ancestry Description",
    "Phenotype Definitions and Methods",
    "Followup Time",
    "GWAS Catalog Study ID (GCST...)",
    "Source PubMed ID (PMID)",
    "Source DOI",
    COHORTS,
    "Additional Sample/Cohort Information",
];

pub const PUBLICATIONS: &[&str] = &[
    "PGS Publication/Study (PGP) ID",
    "First Author",
    "Title",
    "Journal Name",
    "Publication Date",
    "Release Date",
    "Authors",
    "digital object identifier (doi)",
    "PubMed ID (PMID)",
];

pub const EFO_TRAITS: &[&str] = &[
    "Ontology Trait ID",
    "Ontology Trait Label",
    "Ontology Trait Description",
    "Ontology URL",
];

pub const COHORT_COLUMNS: &[&str] = &[
    "Cohort ID",
    "Cohort Name",
    "Previous/other/additional names",
];

pub fn columns(kind: TableKind) -> &'static [&'static str] {
    match kind {
        TableKind::Scores => SCORES,
        TableKind::PerformanceMetrics => PERFORMANCE_METRICS,
        TableKind::EvaluationSampleSets => EVALUATION_SAMPLE_SETS,
        TableKind::ScoreDevelopmentSamples => SCORE_DEVELOPMENT_SAMPLES,
        TableKind::Publications => PUBLICATIONS,
        TableKind::EfoTraits => EFO_TRAITS,
        TableKind::Cohorts => COHORT_COLUMNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn labels_are_unique_within_each_table() {
        for kind in TableKind::all() {
            let labels = columns(*kind);
            let unique: HashSet<_> = labels.iter().collect();
            assert_eq!(unique.len(), labels.len(), "duplicate label in {kind}");
        }
    }

    #[test]
    fn sample_tables_share_their_detail_columns() {
        assert_eq!(
            &SCORE_DEVELOPMENT_SAMPLES[2..],
            &EVALUATION_SAMPLE_SETS[2..],
            "only the leading identifier columns differ"
        );
        assert!(!EVALUATION_SAMPLE_SETS.contains(&DEVELOPMENT_STAGE));
    }
}
