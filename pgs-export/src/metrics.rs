//! Metric pivot: flattens a performance's metric entries into one column per
//! recognized metric plus a free-text "other metrics" column.
//!
//! Entries are visited in `effect_sizes`, `class_acc`, `othermetrics` order.
//! A recognized code fills its own column (a later entry of the same code
//! replaces an earlier one); an unrecognized code in the first two groups and
//! every `othermetrics` entry become `label = value` fragments joined by `, `.

use pgs_core::{MetricEntry, PerformanceMetrics};

use crate::table::Cell;

/// Metrics with a dedicated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    HazardRatio,
    OddsRatio,
    Beta,
    Auroc,
    CIndex,
}

impl MetricKind {
    /// Every kind, in column order.
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::HazardRatio,
            MetricKind::OddsRatio,
            MetricKind::Beta,
            MetricKind::Auroc,
            MetricKind::CIndex,
        ]
    }

    /// Short code as reported by the catalog.
    pub fn code(self) -> &'static str {
        match self {
            MetricKind::HazardRatio => "HR",
            MetricKind::OddsRatio => "OR",
            MetricKind::Beta => "β",
            MetricKind::Auroc => "AUROC",
            MetricKind::CIndex => "C-index",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        MetricKind::all().iter().copied().find(|k| k.code() == code)
    }

    pub fn column_label(self) -> &'static str {
        match self {
            MetricKind::HazardRatio => "Hazard Ratio (HR)",
            MetricKind::OddsRatio => "Odds Ratio (OR)",
            MetricKind::Beta => "Beta",
            MetricKind::Auroc => "Area Under the Receiver-Operating Characteristic Curve (AUROC)",
            MetricKind::CIndex => "Concordance Statistic (C-index)",
        }
    }

    fn index(self) -> usize {
        match self {
            MetricKind::HazardRatio => 0,
            MetricKind::OddsRatio => 1,
            MetricKind::Beta => 2,
            MetricKind::Auroc => 3,
            MetricKind::CIndex => 4,
        }
    }
}

/// Pivoted metric cells of one performance.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotedMetrics {
    recognized: [Cell; 5],
    other: Vec<String>,
}

impl PivotedMetrics {
    pub fn cell(&self, kind: MetricKind) -> &Cell {
        &self.recognized[kind.index()]
    }

    /// The joined "other metrics" text; empty when there are none.
    pub fn other(&self) -> String {
        self.other.join(", ")
    }

    /// Recognized columns in order, then the other-metrics cell.
    pub fn into_cells(self) -> Vec<Cell> {
        let other = if self.other.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(self.other.join(", "))
        };
        let mut cells: Vec<Cell> = self.recognized.into();
        cells.push(other);
        cells
    }
}

/// Pivot every metric entry of one performance.
pub fn pivot(metrics: &PerformanceMetrics) -> PivotedMetrics {
    let mut pivoted = PivotedMetrics {
        recognized: Default::default(),
        other: Vec::new(),
    };

    for entry in metrics.effect_sizes.iter().chain(&metrics.class_acc) {
        match MetricKind::from_code(&entry.name_short) {
            Some(kind) => pivoted.recognized[kind.index()] = value_cell(entry),
            None => pivoted.other.push(other_fragment(entry)),
        }
    }
    for entry in &metrics.othermetrics {
        pivoted.other.push(other_fragment(entry));
    }
    pivoted
}

/// `estimate [lower,upper]`, else `estimate (se)`, else the bare estimate.
pub fn format_value(entry: &MetricEntry) -> String {
    if let Some((lower, upper)) = entry.ci() {
        format!("{} [{},{}]", entry.estimate, lower, upper)
    } else if let Some(se) = &entry.se {
        format!("{} ({})", entry.estimate, se)
    } else {
        entry.estimate.to_string()
    }
}

fn value_cell(entry: &MetricEntry) -> Cell {
    if entry.ci().is_none() && entry.se.is_none() {
        Cell::Number(entry.estimate.clone())
    } else {
        Cell::Text(format_value(entry))
    }
}

fn other_fragment(entry: &MetricEntry) -> String {
    format!("{} = {}", entry.name_short, format_value(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metrics(value: serde_json::Value) -> PerformanceMetrics {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn interval_takes_priority_over_standard_error() {
        let m = metrics(json!({
            "effect_sizes": [{"name_short": "HR", "estimate": 1.5, "ci_lower": 1.1, "ci_upper": 2.0, "se": 0.2}]
        }));
        assert_eq!(pivot(&m).cell(MetricKind::HazardRatio).to_string(), "1.5 [1.1,2.0]");
    }

    #[test]
    fn standard_error_and_bare_estimate() {
        let m = metrics(json!({
            "class_acc": [
                {"name_short": "AUROC", "estimate": 0.71, "se": 0.01},
                {"name_short": "C-index", "estimate": 0.65}
            ]
        }));
        let p = pivot(&m);
        assert_eq!(p.cell(MetricKind::Auroc).to_string(), "0.71 (0.01)");
        assert!(matches!(p.cell(MetricKind::CIndex), Cell::Number(_)));
        assert_eq!(p.cell(MetricKind::CIndex).to_string(), "0.65");
        assert_eq!(p.cell(MetricKind::OddsRatio), &Cell::Empty);
        assert_eq!(p.other(), "");
    }

    #[test]
    fn later_entry_of_same_code_wins() {
        let m = metrics(json!({
            "effect_sizes": [
                {"name_short": "OR", "estimate": 1.2, "ci_lower": 1.1, "ci_upper": 1.3},
                {"name_short": "OR", "estimate": 1.4, "se": 0.05}
            ]
        }));
        assert_eq!(pivot(&m).cell(MetricKind::OddsRatio).to_string(), "1.4 (0.05)");
    }

    #[test]
    fn unrecognized_and_other_metrics_are_joined() {
        let m = metrics(json!({
            "effect_sizes": [{"name_short": "RR", "estimate": 1.8}],
            "othermetrics": [
                {"name_short": "R2", "estimate": 0.3},
                {"name_short": "NRI", "estimate": 0.1, "ci_lower": 0.05, "ci_upper": 0.15}
            ]
        }));
        let p = pivot(&m);
        assert_eq!(p.other(), "RR = 1.8, R2 = 0.3, NRI = 0.1 [0.05,0.15]");
        let cells = p.into_cells();
        assert_eq!(cells.len(), MetricKind::all().len() + 1);
        assert!(cells[..5].iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn beta_uses_greek_code() {
        assert_eq!(MetricKind::from_code("β"), Some(MetricKind::Beta));
        assert_eq!(MetricKind::from_code("Beta"), None);
    }

    #[test]
    fn column_labels_match_performance_table() {
        let labels = crate::labels::PERFORMANCE_METRICS;
        let metric_labels: Vec<_> = MetricKind::all().iter().map(|k| k.column_label()).collect();
        assert_eq!(&labels[9..14], metric_labels.as_slice());
        assert_eq!(labels[14], crate::labels::OTHER_METRICS);
    }
}
