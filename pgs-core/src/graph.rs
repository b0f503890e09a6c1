//! The in-memory record graph for one release.
//!
//! Built once from a snapshot and then only read. Lookups that the table
//! builders need repeatedly (publication by id, performances of a score) are
//! indexed at construction time; the source order of every collection is kept.

use std::collections::{BTreeMap, HashMap};

use crate::types::{Cohort, Performance, Publication, PublicationId, Score, ScoreId, Trait};

/// Every catalog entity of a release, plus the ancestry code → label table.
#[derive(Debug, Clone, Default)]
pub struct RecordGraph {
    scores: Vec<Score>,
    publications: Vec<Publication>,
    traits: Vec<Trait>,
    performances: Vec<Performance>,
    cohorts: Vec<Cohort>,
    ancestry_categories: BTreeMap<String, String>,
    publication_index: HashMap<PublicationId, usize>,
    performances_by_score: HashMap<ScoreId, Vec<usize>>,
}

impl RecordGraph {
    pub fn new(
        scores: Vec<Score>,
        publications: Vec<Publication>,
        traits: Vec<Trait>,
        performances: Vec<Performance>,
        cohorts: Vec<Cohort>,
        ancestry_categories: BTreeMap<String, String>,
    ) -> Self {
        let publication_index = publications
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        let mut performances_by_score: HashMap<ScoreId, Vec<usize>> = HashMap::new();
        for (i, perf) in performances.iter().enumerate() {
            performances_by_score
                .entry(perf.associated_pgs_id.clone())
                .or_default()
                .push(i);
        }

        Self {
            scores,
            publications,
            traits,
            performances,
            cohorts,
            ancestry_categories,
            publication_index,
            performances_by_score,
        }
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn performances(&self) -> &[Performance] {
        &self.performances
    }

    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    pub fn ancestry_categories(&self) -> &BTreeMap<String, String> {
        &self.ancestry_categories
    }

    /// Display label for an ancestry code.
    pub fn ancestry_label(&self, code: &str) -> Option<&str> {
        self.ancestry_categories.get(code).map(String::as_str)
    }

    pub fn score_ids(&self) -> impl Iterator<Item = &ScoreId> {
        self.scores.iter().map(|s| &s.id)
    }

    pub fn publication(&self, id: &PublicationId) -> Option<&Publication> {
        self.publication_index
            .get(id)
            .map(|&i| &self.publications[i])
    }

    /// Performances evaluating `score`, in source order.
    pub fn performances_for<'a>(
        &'a self,
        score: &ScoreId,
    ) -> impl Iterator<Item = &'a Performance> + 'a {
        self.performances_by_score
            .get(score)
            .into_iter()
            .flatten()
            .map(move |&i| &self.performances[i])
    }
}
