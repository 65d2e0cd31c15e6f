//! Stratified, seeded train/test partitioning.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::dataset::LabeledExample;
use crate::intent::Intent;

/// Split a labeled corpus into (train, test) halves, preserving each
/// intent's proportional representation on both sides.
///
/// Per intent, `round(len * test_fraction)` examples go to the test side
/// after a seeded shuffle, so classes with a single example stay in
/// training. The same seed always yields the same partition.
pub fn stratified_split(
    examples: &[LabeledExample],
    test_fraction: f64,
    seed: u64,
) -> (Vec<LabeledExample>, Vec<LabeledExample>) {
    let mut by_intent: HashMap<Intent, Vec<usize>> = HashMap::new();
    for (index, example) in examples.iter().enumerate() {
        by_intent.entry(example.intent).or_default().push(index);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    // Iterate in canonical intent order; HashMap order would leak hasher
    // state into the partition.
    for intent in Intent::ALL {
        let Some(mut indices) = by_intent.remove(&intent) else {
            continue;
        };
        indices.shuffle(&mut rng);

        let n_test = (indices.len() as f64 * test_fraction).round() as usize;
        for (position, index) in indices.into_iter().enumerate() {
            if position < n_test {
                test.push(examples[index].clone());
            } else {
                train.push(examples[index].clone());
            }
        }
    }

    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(per_class: usize) -> Vec<LabeledExample> {
        let mut examples = Vec::new();
        for intent in [Intent::Greeting, Intent::OrderStatus, Intent::Complaint] {
            for i in 0..per_class {
                examples.push(LabeledExample {
                    text: format!("{intent} example {i}"),
                    intent,
                });
            }
        }
        examples
    }

    #[test]
    fn test_split_preserves_class_proportions() {
        let examples = corpus(10);
        let (train, test) = stratified_split(&examples, 0.2, 42);

        assert_eq!(train.len(), 24);
        assert_eq!(test.len(), 6);
        for intent in [Intent::Greeting, Intent::OrderStatus, Intent::Complaint] {
            assert_eq!(test.iter().filter(|e| e.intent == intent).count(), 2);
            assert_eq!(train.iter().filter(|e| e.intent == intent).count(), 8);
        }
    }

    #[test]
    fn test_split_is_deterministic_under_fixed_seed() {
        let examples = corpus(10);
        let (train_a, test_a) = stratified_split(&examples, 0.2, 42);
        let (train_b, test_b) = stratified_split(&examples, 0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn test_split_keeps_singleton_classes_in_training() {
        let examples = corpus(1);
        let (train, test) = stratified_split(&examples, 0.2, 42);
        assert_eq!(train.len(), 3);
        assert!(test.is_empty());
    }

    #[test]
    fn test_split_partitions_without_loss_or_duplication() {
        let examples = corpus(7);
        let (train, test) = stratified_split(&examples, 0.3, 11);
        assert_eq!(train.len() + test.len(), examples.len());

        let mut seen: Vec<&str> = train
            .iter()
            .chain(test.iter())
            .map(|e| e.text.as_str())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), examples.len());
    }
}
