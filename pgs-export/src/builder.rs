//! Table Builder: projects the record graph into one table per kind.
//!
//! Every builder filters by [`Scope`] first and then emits rows in a fixed,
//! data-independent order:
//!
//! | Table                     | Row order                                        |
//! |---------------------------|--------------------------------------------------|
//! | scores                    | source order                                     |
//! | performance_metrics       | source order (all) / ascending id (subset)       |
//! | evaluation_sample_sets    | ascending sample set id, then source sample order |
//! | score_development_samples | score source order, GWAS role then training role |
//! | publications              | source order (all) / ascending id (subset)       |
//! | efo_traits                | catalog order                                    |
//! | cohorts                   | catalog order                                    |

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use pgs_core::{
    AncestryStage, Cohort, Demographic, Performance, PublicationId, RecordGraph, Sample,
    SampleSet, SampleSetId, Score, ScoreId, Trait, TraitId,
};

use crate::error::ExportError;
use crate::labels::{STAGE_GWAS, STAGE_TRAINING};
use crate::metrics;
use crate::table::{Cell, Scope, Table, TableKind, TableSet};

/// Separator for multi-valued text cells (trait ids, cohorts, ancestry).
pub const LIST_SEPARATOR: &str = "|";

/// Which publications a bundle surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicationMode {
    /// Publications of in-scope scores and of every performance evaluating them.
    #[default]
    Full,
    /// Only the in-scope scores' own publications.
    ScoreOnly,
}

/// Builds tables for one scope of one record graph.
#[derive(Debug, Clone)]
pub struct TableBuilder<'a> {
    graph: &'a RecordGraph,
    scope: &'a Scope,
    publication_mode: PublicationMode,
}

/// Build a single table with the default publication mode.
pub fn build_table(
    kind: TableKind,
    graph: &RecordGraph,
    scope: &Scope,
) -> Result<Table, ExportError> {
    TableBuilder::new(graph, scope).build(kind)
}

impl<'a> TableBuilder<'a> {
    pub fn new(graph: &'a RecordGraph, scope: &'a Scope) -> Self {
        Self {
            graph,
            scope,
            publication_mode: PublicationMode::Full,
        }
    }

    pub fn with_publication_mode(mut self, mode: PublicationMode) -> Self {
        self.publication_mode = mode;
        self
    }

    pub fn build(&self, kind: TableKind) -> Result<Table, ExportError> {
        let table = match kind {
            TableKind::Scores => self.scores_table()?,
            TableKind::PerformanceMetrics => self.performance_table()?,
            TableKind::EvaluationSampleSets => self.sample_set_table()?,
            TableKind::ScoreDevelopmentSamples => self.development_sample_table()?,
            TableKind::Publications => self.publication_table()?,
            TableKind::EfoTraits => self.trait_table()?,
            TableKind::Cohorts => self.cohort_table()?,
        };
        debug!(table = %kind, rows = table.row_count(), "built table");
        Ok(table)
    }

    /// Every table kind in sheet order. The first failure aborts the set.
    pub fn build_all(&self) -> Result<TableSet, ExportError> {
        let mut tables = Vec::with_capacity(TableKind::all().len());
        for &kind in TableKind::all() {
            let table = self.build(kind).map_err(|e| ExportError::Table {
                table: kind,
                source: Box::new(e),
            })?;
            tables.push(table);
        }
        let publication_ids = match self.publication_mode {
            PublicationMode::Full => BTreeSet::new(),
            PublicationMode::ScoreOnly => self.referenced_publication_ids(false),
        };
        Ok(TableSet {
            tables,
            publication_ids,
        })
    }

    // -----------------------------------------------------------------------
    // Scope helpers
    // -----------------------------------------------------------------------

    fn scores_in_scope(&self) -> impl Iterator<Item = &'a Score> + '_ {
        self.graph
            .scores()
            .iter()
            .filter(move |s| self.scope.includes(&s.id))
    }

    fn performances_in_scope(&self) -> Vec<&'a Performance> {
        if self.scope.is_all() {
            return self.graph.performances().iter().collect();
        }
        let mut performances: Vec<&Performance> = self
            .scores_in_scope()
            .flat_map(|s| self.graph.performances_for(&s.id))
            .collect();
        performances.sort_by(|a, b| a.id.cmp(&b.id));
        performances.dedup_by(|a, b| a.id == b.id);
        performances
    }

    /// Publication ids of in-scope scores, plus those of their performances
    /// when `include_performances` is set.
    fn referenced_publication_ids(&self, include_performances: bool) -> BTreeSet<PublicationId> {
        let mut ids: BTreeSet<PublicationId> = self
            .scores_in_scope()
            .map(|s| s.publication.id.clone())
            .collect();
        if include_performances {
            ids.extend(
                self.performances_in_scope()
                    .into_iter()
                    .map(|p| p.publication.id.clone()),
            );
        }
        ids
    }

    // -----------------------------------------------------------------------
    // Per-kind builders
    // -----------------------------------------------------------------------

    fn scores_table(&self) -> Result<Table, ExportError> {
        let mut table = Table::new(TableKind::Scores);
        for score in self.scores_in_scope() {
            let trait_labels: Vec<&str> = score.trait_efo.iter().map(|t| t.label.as_str()).collect();
            let trait_ids: Vec<&str> = score.trait_efo.iter().map(|t| t.id.as_str()).collect();

            let mut row = vec![
                Cell::text(score.id.as_str()),
                Cell::text(&score.name),
                Cell::opt_text(score.trait_reported.as_deref()),
                Cell::text(&trait_labels.join(LIST_SEPARATOR)),
                Cell::text(&trait_ids.join(LIST_SEPARATOR)),
                Cell::opt_text(score.method_name.as_deref()),
                Cell::opt_text(score.method_params.as_deref()),
                Cell::opt_text(score.variants_genomebuild.as_deref()),
                Cell::opt_count(score.variants_number),
                Cell::opt_count(score.variants_interactions),
                Cell::opt_text(score.weight_type.as_deref()),
                Cell::text(score.publication.id.as_str()),
                Cell::opt_int(score.publication.pmid),
                Cell::opt_text(score.publication.doi.as_deref()),
                Cell::opt_bool(score.matches_publication),
            ];
            for &stage in AncestryStage::all() {
                row.push(self.ancestry_cell(score, stage)?);
            }
            row.extend([
                Cell::opt_text(score.ftp_scoring_file.as_deref()),
                Cell::opt_text(score.date_release.as_deref()),
                Cell::opt_text(score.license.as_deref()),
            ]);
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// `label:percentage` pairs, highest percentage first. Ties keep source order.
    fn ancestry_cell(&self, score: &Score, stage: AncestryStage) -> Result<Cell, ExportError> {
        let Some(distribution) = score.ancestry_distribution.stage(stage) else {
            return Ok(Cell::Text(String::new()));
        };
        let mut entries: Vec<_> = distribution.dist.iter().collect();
        entries.sort_by(|a, b| {
            let (a, b) = (a.1.as_f64().unwrap_or(0.0), b.1.as_f64().unwrap_or(0.0));
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });

        let mut parts = Vec::with_capacity(entries.len());
        for (code, percentage) in entries {
            let label = self.graph.ancestry_label(code).ok_or_else(|| {
                ExportError::UnknownAncestryCategory {
                    score: score.id.clone(),
                    code: code.clone(),
                }
            })?;
            parts.push(format!("{label}:{percentage}"));
        }
        Ok(Cell::Text(parts.join(LIST_SEPARATOR)))
    }

    fn performance_table(&self) -> Result<Table, ExportError> {
        let mut table = Table::new(TableKind::PerformanceMetrics);
        for perf in self.performances_in_scope() {
            let mut row = vec![
                Cell::text(perf.id.as_str()),
                Cell::text(perf.associated_pgs_id.as_str()),
                Cell::text(perf.sampleset.id.as_str()),
                Cell::text(perf.publication.id.as_str()),
                Cell::opt_text(perf.phenotyping_reported.as_deref()),
                Cell::opt_text(perf.covariates.as_deref()),
                Cell::opt_text(perf.performance_comments.as_deref()),
                Cell::opt_int(perf.publication.pmid),
                Cell::opt_text(perf.publication.doi.as_deref()),
            ];
            row.extend(metrics::pivot(&perf.performance_metrics).into_cells());
            table.push_row(row)?;
        }
        Ok(table)
    }

    fn sample_set_table(&self) -> Result<Table, ExportError> {
        let mut sample_sets: BTreeMap<&SampleSetId, (&SampleSet, BTreeSet<&ScoreId>)> =
            BTreeMap::new();
        for perf in self.performances_in_scope() {
            sample_sets
                .entry(&perf.sampleset.id)
                .or_insert_with(|| (&perf.sampleset, BTreeSet::new()))
                .1
                .insert(&perf.associated_pgs_id);
        }

        let mut table = Table::new(TableKind::EvaluationSampleSets);
        for (id, (sample_set, scores)) in sample_sets {
            let associated: Vec<&str> = scores.iter().map(|s| s.as_str()).collect();
            let associated = associated.join(", ");
            for sample in &sample_set.samples {
                let mut row = vec![Cell::text(id.as_str()), Cell::text(&associated)];
                row.extend(sample_cells(sample));
                table.push_row(row)?;
            }
        }
        Ok(table)
    }

    fn development_sample_table(&self) -> Result<Table, ExportError> {
        let mut table = Table::new(TableKind::ScoreDevelopmentSamples);
        for score in self.scores_in_scope() {
            let roles = [
                (STAGE_GWAS, &score.samples_variants),
                (STAGE_TRAINING, &score.samples_training),
            ];
            for (stage, samples) in roles {
                for sample in samples {
                    let mut row = vec![Cell::text(score.id.as_str()), Cell::text(stage)];
                    row.extend(sample_cells(sample));
                    table.push_row(row)?;
                }
            }
        }
        Ok(table)
    }

    fn publication_table(&self) -> Result<Table, ExportError> {
        let mut table = Table::new(TableKind::Publications);
        let publications: Vec<_> = if self.scope.is_all() {
            self.graph.publications().iter().collect()
        } else {
            let include_performances = self.publication_mode == PublicationMode::Full;
            self.referenced_publication_ids(include_performances)
                .iter()
                .filter_map(|id| self.graph.publication(id))
                .collect()
        };

        for publication in publications {
            table.push_row(vec![
                Cell::text(publication.id.as_str()),
                Cell::opt_text(publication.firstauthor.as_deref()),
                Cell::opt_text(publication.title.as_deref()),
                Cell::opt_text(publication.journal.as_deref()),
                Cell::opt_text(publication.date_publication.as_deref()),
                Cell::opt_text(publication.date_release.as_deref()),
                Cell::opt_text(publication.authors.as_deref()),
                Cell::opt_text(publication.doi.as_deref()),
                Cell::opt_int(publication.pmid),
            ])?;
        }
        Ok(table)
    }

    fn trait_table(&self) -> Result<Table, ExportError> {
        let traits: Vec<&Trait> = if self.scope.is_all() {
            self.graph.traits().iter().collect()
        } else {
            let referenced: HashSet<&TraitId> = self
                .scores_in_scope()
                .flat_map(|s| s.trait_efo.iter().map(|t| &t.id))
                .collect();
            self.graph
                .traits()
                .iter()
                .filter(|t| referenced.contains(&t.id))
                .collect()
        };

        let mut table = Table::new(TableKind::EfoTraits);
        for efo in traits {
            table.push_row(vec![
                Cell::text(efo.id.as_str()),
                Cell::text(&efo.label),
                Cell::opt_text(efo.description.as_deref()),
                Cell::opt_text(efo.url.as_deref()),
            ])?;
        }
        Ok(table)
    }

    fn cohort_table(&self) -> Result<Table, ExportError> {
        let cohorts: Vec<&Cohort> = if self.scope.is_all() {
            self.graph.cohorts().iter().collect()
        } else {
            let development = self
                .scores_in_scope()
                .flat_map(|s| s.samples_variants.iter().chain(&s.samples_training));
            let evaluation = self
                .performances_in_scope()
                .into_iter()
                .flat_map(|p| p.sampleset.samples.iter());

            let referenced: HashSet<&str> = development
                .chain(evaluation)
                .flat_map(|sample| sample.cohorts.iter())
                .map(|c| c.name_short.as_str())
                .collect();
            self.graph
                .cohorts()
                .iter()
                .filter(|c| referenced.contains(c.name_short.as_str()))
                .collect()
        };

        let mut table = Table::new(TableKind::Cohorts);
        for cohort in cohorts {
            table.push_row(vec![
                Cell::text(&cohort.name_short),
                Cell::opt_text(cohort.name_full.as_deref()),
                Cell::opt_text(cohort.name_others.as_deref()),
            ])?;
        }
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Sample rendering
// ---------------------------------------------------------------------------

/// The detail cells shared by both sample tables, in column order.
fn sample_cells(sample: &Sample) -> Vec<Cell> {
    let cohorts: Vec<&str> = sample.cohorts.iter().map(|c| c.name_short.as_str()).collect();
    vec![
        Cell::opt_count(sample.sample_number),
        Cell::opt_count(sample.sample_cases),
        Cell::opt_count(sample.sample_controls),
        Cell::opt_number(sample.sample_percent_male.as_ref()),
        demographic_cell(sample.sample_age.as_ref()),
        Cell::opt_text(sample.ancestry_broad.as_deref()),
        Cell::opt_text(sample.ancestry_free.as_deref()),
        Cell::opt_text(sample.ancestry_country.as_deref()),
        Cell::opt_text(sample.ancestry_additional.as_deref()),
        Cell::opt_text(sample.phenotyping_free.as_deref()),
        demographic_cell(sample.followup_time.as_ref()),
        Cell::opt_text(sample.source_gwas_catalog.as_deref()),
        Cell::opt_int(sample.source_pmid),
        Cell::opt_text(sample.source_doi.as_deref()),
        Cell::text(&cohorts.join(LIST_SEPARATOR)),
        Cell::opt_text(sample.cohorts_additional.as_deref()),
    ]
}

fn demographic_cell(demographic: Option<&Demographic>) -> Cell {
    demographic
        .map(|d| Cell::text(&format_demographic(d)))
        .unwrap_or(Cell::Empty)
}

/// `type:estimate;type:[lower,upper];type:variability;unit:unit`, omitting
/// absent parts.
pub fn format_demographic(d: &Demographic) -> String {
    let mut parts = Vec::new();
    if let Some(estimate) = &d.estimate {
        let kind = d.estimate_type.as_deref().unwrap_or("estimate");
        parts.push(format!("{kind}:{estimate}"));
    }
    if let Some(interval) = &d.interval {
        parts.push(format!(
            "{}:[{},{}]",
            interval.kind, interval.lower, interval.upper
        ));
    }
    if let Some(variability) = &d.variability {
        let kind = d.variability_type.as_deref().unwrap_or("variability");
        parts.push(format!("{kind}:{variability}"));
    }
    if let Some(unit) = &d.unit {
        parts.push(format!("unit:{unit}"));
    }
    parts.join(";")
}
