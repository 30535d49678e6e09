//! Held-Out Classification Report

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision, recall and F1 for one label
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Rows whose true label is this one
    pub support: usize,
}

/// Per-label metrics and accuracy of a binary classifier
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    /// Metrics for label 0 and label 1
    pub classes: [ClassMetrics; 2],
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ClassificationReport {
    /// Compare true and predicted labels
    pub fn compute(truth: &[u8], predicted: &[u8]) -> Self {
        // confusion[true][predicted]
        let mut confusion = [[0usize; 2]; 2];
        for (&t, &p) in truth.iter().zip(predicted.iter()) {
            confusion[usize::from(t == 1)][usize::from(p == 1)] += 1;
        }

        let total: usize = confusion.iter().flatten().sum();
        let correct = confusion[0][0] + confusion[1][1];

        let metrics = |label: usize| {
            let tp = confusion[label][label];
            let support = confusion[label][0] + confusion[label][1];
            let predicted = confusion[0][label] + confusion[1][label];
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            }
        };

        Self {
            accuracy: ratio(correct, total),
            classes: [metrics(0), metrics(1)],
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "label  precision  recall  f1-score  support")?;
        for (label, m) in self.classes.iter().enumerate() {
            writeln!(
                f,
                "{:>5}  {:>9.2}  {:>6.2}  {:>8.2}  {:>7}",
                label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        write!(f, "accuracy {:.2}", self.accuracy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report() {
        let truth = [0, 0, 0, 1, 1];
        let predicted = [0, 1, 0, 1, 0];
        let report = ClassificationReport::compute(&truth, &predicted);

        assert!((report.accuracy - 0.6).abs() < 1e-12);
        assert_eq!(report.classes[0].support, 3);
        assert_eq!(report.classes[1].support, 2);
        assert!((report.classes[0].precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.classes[1].recall - 0.5).abs() < 1e-12);
        assert!((report.classes[1].f1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_predictions_for_label() {
        let report = ClassificationReport::compute(&[0, 1], &[0, 0]);
        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].f1, 0.0);
        assert!(report.to_string().contains("accuracy 0.50"));
    }
}
