//! Domain types for the PGS record graph.
//!
//! Field names follow the catalog REST payloads so a snapshot deserializes
//! straight into these values. Every entity is immutable once loaded; the
//! export layer only filters and re-projects them.
//!
//! Numeric values that end up rendered as text (estimates, bounds,
//! percentages) are kept as [`serde_json::Number`] so an integer stays `100`
//! and a float stays `2.0` when written to a cell.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

id_newtype!(
    /// Polygenic score identifier (`PGS000001`).
    ScoreId
);
id_newtype!(
    /// Publication identifier (`PGP000001`).
    PublicationId
);
id_newtype!(
    /// Ontology trait identifier (`EFO_0001645`).
    TraitId
);
id_newtype!(
    /// Evaluation sample set identifier (`PSS000001`).
    SampleSetId
);
id_newtype!(
    /// Performance metric identifier (`PPM000001`).
    PerformanceId
);

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Stage of score development an ancestry distribution describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AncestryStage {
    Gwas,
    Dev,
    Eval,
}

impl AncestryStage {
    /// All stages in column order.
    pub fn all() -> &'static [AncestryStage] {
        &[AncestryStage::Gwas, AncestryStage::Dev, AncestryStage::Eval]
    }
}

impl fmt::Display for AncestryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AncestryStage::Gwas => write!(f, "gwas"),
            AncestryStage::Dev => write!(f, "dev"),
            AncestryStage::Eval => write!(f, "eval"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Publication summary embedded in scores and performances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRef {
    pub id: PublicationId,
    #[serde(rename = "PMID", default, deserialize_with = "de_pmid")]
    pub pmid: Option<i64>,
    #[serde(default)]
    pub doi: Option<String>,
}

/// Score ids linked to a publication, grouped by role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssociatedScores {
    #[serde(default)]
    pub development: Vec<ScoreId>,
    #[serde(default)]
    pub evaluation: Vec<ScoreId>,
}

/// Full bibliographic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    #[serde(default)]
    pub firstauthor: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub date_publication: Option<String>,
    #[serde(default)]
    pub date_release: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(rename = "PMID", default, deserialize_with = "de_pmid")]
    pub pmid: Option<i64>,
    #[serde(default)]
    pub associated_pgs_ids: AssociatedScores,
}

/// Ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub id: TraitId,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Named sample-collection source, keyed by short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub name_short: String,
    #[serde(default)]
    pub name_full: Option<String>,
    #[serde(default)]
    pub name_others: Option<String>,
}

/// Interval part of a demographic descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(rename = "type")]
    pub kind: String,
    pub lower: Number,
    pub upper: Number,
}

/// Age or follow-up time descriptor; every part is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Demographic {
    #[serde(default)]
    pub estimate_type: Option<String>,
    #[serde(default)]
    pub estimate: Option<Number>,
    #[serde(default)]
    pub interval: Option<Interval>,
    #[serde(default)]
    pub variability_type: Option<String>,
    #[serde(default)]
    pub variability: Option<Number>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A cohort-derived group of individuals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub sample_number: Option<u64>,
    #[serde(default)]
    pub sample_cases: Option<u64>,
    #[serde(default)]
    pub sample_controls: Option<u64>,
    #[serde(default)]
    pub sample_percent_male: Option<Number>,
    #[serde(default)]
    pub sample_age: Option<Demographic>,
    #[serde(default)]
    pub ancestry_broad: Option<String>,
    #[serde(default)]
    pub ancestry_free: Option<String>,
    #[serde(default)]
    pub ancestry_country: Option<String>,
    #[serde(default)]
    pub ancestry_additional: Option<String>,
    #[serde(default)]
    pub phenotyping_free: Option<String>,
    #[serde(default)]
    pub followup_time: Option<Demographic>,
    #[serde(rename = "source_GWAS_catalog", default)]
    pub source_gwas_catalog: Option<String>,
    #[serde(rename = "source_PMID", default, deserialize_with = "de_pmid")]
    pub source_pmid: Option<i64>,
    #[serde(rename = "source_DOI", default)]
    pub source_doi: Option<String>,
    #[serde(default)]
    pub cohorts: Vec<Cohort>,
    #[serde(default)]
    pub cohorts_additional: Option<String>,
}

/// Group of samples used for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub id: SampleSetId,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

/// Percentage per ancestry code for one development stage, in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StageDistribution {
    #[serde(default)]
    pub dist: IndexMap<String, Number>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Ancestry distribution of a score, per stage. Absent stages are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AncestryDistribution {
    #[serde(default)]
    pub gwas: Option<StageDistribution>,
    #[serde(default)]
    pub dev: Option<StageDistribution>,
    #[serde(default)]
    pub eval: Option<StageDistribution>,
}

impl AncestryDistribution {
    pub fn stage(&self, stage: AncestryStage) -> Option<&StageDistribution> {
        match stage {
            AncestryStage::Gwas => self.gwas.as_ref(),
            AncestryStage::Dev => self.dev.as_ref(),
            AncestryStage::Eval => self.eval.as_ref(),
        }
    }
}

/// A polygenic scoring method record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: ScoreId,
    pub name: String,
    #[serde(default)]
    pub trait_reported: Option<String>,
    #[serde(default)]
    pub method_name: Option<String>,
    #[serde(default)]
    pub method_params: Option<String>,
    #[serde(default)]
    pub variants_genomebuild: Option<String>,
    #[serde(default)]
    pub variants_number: Option<u64>,
    #[serde(default)]
    pub variants_interactions: Option<u64>,
    #[serde(default)]
    pub weight_type: Option<String>,
    pub publication: PublicationRef,
    #[serde(default)]
    pub matches_publication: Option<bool>,
    #[serde(default)]
    pub trait_efo: Vec<Trait>,
    #[serde(default)]
    pub ancestry_distribution: AncestryDistribution,
    #[serde(default)]
    pub samples_variants: Vec<Sample>,
    #[serde(default)]
    pub samples_training: Vec<Sample>,
    #[serde(default)]
    pub ftp_scoring_file: Option<String>,
    #[serde(default)]
    pub date_release: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// One reported metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub name_short: String,
    #[serde(default)]
    pub name_long: Option<String>,
    pub estimate: Number,
    #[serde(default)]
    pub ci_lower: Option<Number>,
    #[serde(default)]
    pub ci_upper: Option<Number>,
    #[serde(default)]
    pub se: Option<Number>,
}

impl MetricEntry {
    /// Confidence interval, only when both bounds are present.
    pub fn ci(&self) -> Option<(&Number, &Number)> {
        match (&self.ci_lower, &self.ci_upper) {
            (Some(lower), Some(upper)) => Some((lower, upper)),
            _ => None,
        }
    }
}

/// Metric entries of a performance, as grouped by the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(default, deserialize_with = "de_null_vec")]
    pub effect_sizes: Vec<MetricEntry>,
    #[serde(default, deserialize_with = "de_null_vec")]
    pub class_acc: Vec<MetricEntry>,
    #[serde(default, deserialize_with = "de_null_vec")]
    pub othermetrics: Vec<MetricEntry>,
}

/// One evaluation result of a score against a sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub id: PerformanceId,
    pub associated_pgs_id: ScoreId,
    pub sampleset: SampleSet,
    pub publication: PublicationRef,
    #[serde(default)]
    pub phenotyping_reported: Option<String>,
    #[serde(default)]
    pub covariates: Option<String>,
    #[serde(default)]
    pub performance_comments: Option<String>,
    #[serde(default)]
    pub performance_metrics: PerformanceMetrics,
}

// ---------------------------------------------------------------------------
// Deserialization helpers
// ---------------------------------------------------------------------------

/// PMIDs arrive as integers, numeric strings, empty strings or null.
fn de_pmid<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PmidCompat {
        Int(i64),
        Text(String),
    }

    match Option::<PmidCompat>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PmidCompat::Int(n)) => Ok(Some(n)),
        Some(PmidCompat::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid PMID '{s}'")))
        }
    }
}

fn de_null_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
