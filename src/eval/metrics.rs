//! Classification metrics with support-weighted averaging.
//!
//! Precision, recall, and F1 are computed per class and combined with
//! weights proportional to each class's support in the true-label sequence.
//! Degenerate denominators (a class never predicted, or never present)
//! contribute zero rather than erroring, so label imbalance cannot crash an
//! evaluation run.

use crate::intent::Intent;

/// Fraction of exact matches between the two aligned sequences.
pub fn accuracy(true_labels: &[Intent], predicted: &[Intent]) -> f64 {
    if true_labels.is_empty() {
        return 0.0;
    }
    let correct = true_labels
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / true_labels.len() as f64
}

/// Support-weighted (precision, recall, F1) over the aligned sequences.
pub fn weighted_precision_recall_f1(
    true_labels: &[Intent],
    predicted: &[Intent],
) -> (f64, f64, f64) {
    let total = true_labels.len();
    if total == 0 {
        return (0.0, 0.0, 0.0);
    }

    let mut weighted_precision = 0.0;
    let mut weighted_recall = 0.0;
    let mut weighted_f1 = 0.0;

    for class in Intent::ALL {
        let support = true_labels.iter().filter(|&&t| t == class).count();
        if support == 0 {
            continue;
        }

        let true_positives = true_labels
            .iter()
            .zip(predicted)
            .filter(|&(&t, &p)| t == class && p == class)
            .count() as f64;
        let predicted_positives = predicted.iter().filter(|&&p| p == class).count() as f64;

        let precision = if predicted_positives == 0.0 {
            0.0
        } else {
            true_positives / predicted_positives
        };
        let recall = true_positives / support as f64;
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        let weight = support as f64 / total as f64;
        weighted_precision += weight * precision;
        weighted_recall += weight * recall;
        weighted_f1 += weight * f1;
    }

    (weighted_precision, weighted_recall, weighted_f1)
}
