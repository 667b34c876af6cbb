use serde::{Deserialize, Serialize};

use crate::case::EvaluationCase;

/// Running true positive / false positive / false negative counts.
///
/// A case is a true positive when both entities are present and equal.
/// Otherwise a present true entity counts as a false negative and a present
/// prediction as a false positive, so a wrong entity counts as both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricAccumulator {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, case: &EvaluationCase) {
        if case.is_correct() {
            self.true_positives += 1;
            return;
        }
        if case.true_entity.is_some() {
            self.false_negatives += 1;
        }
        if case.predicted_entity.is_some() {
            self.false_positives += 1;
        }
    }

    pub fn extend<'a>(&mut self, cases: impl IntoIterator<Item = &'a EvaluationCase>) {
        for case in cases {
            self.add(case);
        }
    }

    pub fn merge(&mut self, other: &MetricAccumulator) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }

    pub fn metrics(&self) -> EvaluationMetrics {
        let tp = self.true_positives as f64;
        let precision = tp / (tp + self.false_positives as f64);
        let recall = tp / (tp + self.false_negatives as f64);
        let f1 = 2.0 * precision * recall / (precision + recall);

        EvaluationMetrics {
            true_positives: self.true_positives,
            false_positives: self.false_positives,
            false_negatives: self.false_negatives,
            precision,
            recall,
            f1,
        }
    }
}

/// Counts plus derived scores. Scores with a zero denominator are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    #[serde(rename = "tp")]
    pub true_positives: usize,
    #[serde(rename = "fp")]
    pub false_positives: usize,
    #[serde(rename = "fn")]
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

pub fn accumulate<'a>(cases: impl IntoIterator<Item = &'a EvaluationCase>) -> EvaluationMetrics {
    let mut accumulator = MetricAccumulator::new();
    accumulator.extend(cases);
    accumulator.metrics()
}

/// `"87.50 %"`, or `"N/A"` for a non-finite score.
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2} %", value * 100.0)
    } else {
        "N/A".to_string()
    }
}
