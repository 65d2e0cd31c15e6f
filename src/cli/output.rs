//! Human-readable output helpers for the CLI.

use crate::backend::trained::FitReport;
use crate::dataset::{self, LabeledExample};
use crate::eval::{ComparisonReport, EvaluationResult};
use crate::intent::Intent;

/// Print dataset size and per-intent distribution.
pub fn print_dataset_summary(examples: &[LabeledExample]) {
    println!("Dataset: {} examples", examples.len());
    let distribution = dataset::label_distribution(examples);
    for intent in Intent::ALL {
        if let Some(count) = distribution.get(&intent) {
            println!("  {intent}: {count}");
        }
    }
}

/// Print the outcome of fitting the trained backend.
pub fn print_fit_report(report: &FitReport) {
    println!(
        "Training finished: {} examples, vocabulary {}",
        report.training_examples, report.vocabulary_size
    );
    println!(
        "Holdout accuracy: {:.3} ({} examples)",
        report.holdout_accuracy,
        report.holdout.len()
    );
}

/// Print one backend's evaluation metrics.
pub fn print_evaluation(name: &str, result: &EvaluationResult) {
    println!("{name} results:");
    println!("  Accuracy:  {:.3}", result.accuracy);
    println!("  Precision: {:.3}", result.precision);
    println!("  Recall:    {:.3}", result.recall);
    println!("  F1 Score:  {:.3}", result.f1_score);
}

/// Print the ranked comparison table and the winner.
pub fn print_comparison(report: &ComparisonReport) {
    println!();
    println!("{}", report.to_table());
    if let Some((name, best)) = report.best_backend() {
        println!("Best backend: {name} (F1 {:.3})", best.f1_score);
    }
}
