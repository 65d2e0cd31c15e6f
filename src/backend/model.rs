//! Supervised classification models for the trained backend.
//!
//! Three selectable algorithms sit behind [`ClassifierModel`]: a random
//! forest, multinomial logistic regression, and an RBF-kernel SVM. All are
//! self-contained implementations over dense TF-IDF vectors, deterministic
//! under a fixed seed, and serializable as part of the fitted pipeline
//! artifact.
//!
//! Probability estimates: the forest and the logistic model expose class
//! probabilities; the kernel SVM only produces decision values, so callers
//! fall back to a fixed confidence for it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{DestekError, Result};

/// Training algorithm selector for the trained backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    RandomForest,
    LogisticRegression,
    KernelSvm,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::RandomForest => "random_forest",
            Algorithm::LogisticRegression => "logistic_regression",
            Algorithm::KernelSvm => "kernel_svm",
        }
    }
}

/// A trained classifier of one of the selectable algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifierModel {
    RandomForest(RandomForestModel),
    LogisticRegression(LogisticRegressionModel),
    KernelSvm(KernelSvmModel),
}

impl ClassifierModel {
    /// Train a model of the selected algorithm.
    pub fn train(
        algorithm: Algorithm,
        features: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        seed: u64,
    ) -> Result<Self> {
        if features.is_empty() || features.len() != labels.len() {
            return Err(DestekError::other(
                "training requires equally many feature vectors and labels",
            ));
        }

        let model = match algorithm {
            Algorithm::RandomForest => {
                ClassifierModel::RandomForest(RandomForestModel::train(
                    features, labels, n_classes, seed,
                ))
            }
            Algorithm::LogisticRegression => {
                ClassifierModel::LogisticRegression(LogisticRegressionModel::train(
                    features, labels, n_classes, seed,
                ))
            }
            Algorithm::KernelSvm => {
                ClassifierModel::KernelSvm(KernelSvmModel::train(features, labels, n_classes, seed))
            }
        };
        Ok(model)
    }

    /// Predict the class index, with class probabilities when the algorithm
    /// supports them.
    pub fn predict(&self, features: &[f64]) -> (usize, Option<Vec<f64>>) {
        match self {
            ClassifierModel::RandomForest(model) => {
                let probabilities = model.predict_proba(features);
                (argmax(&probabilities), Some(probabilities))
            }
            ClassifierModel::LogisticRegression(model) => {
                let probabilities = model.predict_proba(features);
                (argmax(&probabilities), Some(probabilities))
            }
            ClassifierModel::KernelSvm(model) => (model.predict(features), None),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            ClassifierModel::RandomForest(_) => Algorithm::RandomForest,
            ClassifierModel::LogisticRegression(_) => Algorithm::LogisticRegression,
            ClassifierModel::KernelSvm(_) => Algorithm::KernelSvm,
        }
    }
}

/// Index of the largest value; first wins on ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = index;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Random forest
// ---------------------------------------------------------------------------

const N_TREES: usize = 100;
const MAX_DEPTH: usize = 16;
const MIN_SAMPLES_SPLIT: usize = 2;

/// Bagged ensemble of gini decision trees with per-node feature subsampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestModel {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForestModel {
    fn train(features: &[Vec<f64>], labels: &[usize], n_classes: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n_samples = features.len();
        let n_features = features[0].len();
        // Per-node candidate pool: sqrt of the feature count, at least one.
        let n_candidates = ((n_features as f64).sqrt().ceil() as usize).max(1);

        let mut trees = Vec::with_capacity(N_TREES);
        for _ in 0..N_TREES {
            let bootstrap: Vec<usize> = (0..n_samples)
                .map(|_| rng.random_range(0..n_samples))
                .collect();
            trees.push(DecisionTree::fit(
                features,
                labels,
                &bootstrap,
                n_classes,
                n_candidates,
                &mut rng,
            ));
        }

        Self { trees, n_classes }
    }

    /// Average of per-tree leaf class distributions.
    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut probabilities = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let distribution = tree.predict(features);
            for (total, value) in probabilities.iter_mut().zip(distribution) {
                *total += value;
            }
        }
        for value in &mut probabilities {
            *value /= self.trees.len() as f64;
        }
        probabilities
    }
}

/// Single gini-impurity decision tree over dense feature vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    root: TreeNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        /// Class probability distribution at this leaf.
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl DecisionTree {
    fn fit(
        features: &[Vec<f64>],
        labels: &[usize],
        indices: &[usize],
        n_classes: usize,
        n_candidates: usize,
        rng: &mut StdRng,
    ) -> Self {
        let root = Self::build_node(features, labels, indices, n_classes, n_candidates, 0, rng);
        Self { root }
    }

    fn class_distribution(labels: &[usize], indices: &[usize], n_classes: usize) -> Vec<f64> {
        let mut distribution = vec![0.0; n_classes];
        for &index in indices {
            distribution[labels[index]] += 1.0;
        }
        if !indices.is_empty() {
            for value in &mut distribution {
                *value /= indices.len() as f64;
            }
        }
        distribution
    }

    fn gini(distribution: &[f64]) -> f64 {
        1.0 - distribution.iter().map(|p| p * p).sum::<f64>()
    }

    fn build_node(
        features: &[Vec<f64>],
        labels: &[usize],
        indices: &[usize],
        n_classes: usize,
        n_candidates: usize,
        depth: usize,
        rng: &mut StdRng,
    ) -> TreeNode {
        let distribution = Self::class_distribution(labels, indices, n_classes);
        let impurity = Self::gini(&distribution);

        if depth >= MAX_DEPTH || indices.len() < MIN_SAMPLES_SPLIT || impurity == 0.0 {
            return TreeNode::Leaf { distribution };
        }

        let n_features = features[0].len();
        let candidates = rand::seq::index::sample(rng, n_features, n_candidates.min(n_features));

        let mut best: Option<(f64, usize, f64)> = None; // (impurity decrease, feature, threshold)
        for feature in candidates {
            let mut values: Vec<f64> = indices.iter().map(|&i| features[i][feature]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();
            if values.len() < 2 {
                continue;
            }

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .copied()
                    .partition(|&i| features[i][feature] <= threshold);
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let left_dist = Self::class_distribution(labels, &left, n_classes);
                let right_dist = Self::class_distribution(labels, &right, n_classes);
                let weighted = (left.len() as f64 * Self::gini(&left_dist)
                    + right.len() as f64 * Self::gini(&right_dist))
                    / indices.len() as f64;
                let decrease = impurity - weighted;

                if decrease > 1e-12
                    && best.is_none_or(|(best_decrease, _, _)| decrease > best_decrease)
                {
                    best = Some((decrease, feature, threshold));
                }
            }
        }

        let Some((_, feature, threshold)) = best else {
            return TreeNode::Leaf { distribution };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| features[i][feature] <= threshold);

        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(Self::build_node(
                features,
                labels,
                &left_indices,
                n_classes,
                n_candidates,
                depth + 1,
                rng,
            )),
            right: Box::new(Self::build_node(
                features,
                labels,
                &right_indices,
                n_classes,
                n_candidates,
                depth + 1,
                rng,
            )),
        }
    }

    fn predict(&self, features: &[f64]) -> Vec<f64> {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { distribution } => return distribution.clone(),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features.get(*feature).copied().unwrap_or(0.0) <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Logistic regression
// ---------------------------------------------------------------------------

const LOGREG_EPOCHS: usize = 300;
const LOGREG_LEARNING_RATE: f64 = 0.5;
const LOGREG_L2: f64 = 1e-4;

/// Multinomial logistic regression trained with per-sample SGD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionModel {
    /// Per-class weight rows; the final column is the bias term.
    weights: Vec<Vec<f64>>,
    n_features: usize,
}

impl LogisticRegressionModel {
    fn train(features: &[Vec<f64>], labels: &[usize], n_classes: usize, seed: u64) -> Self {
        let n_features = features[0].len();
        let mut weights = vec![vec![0.0; n_features + 1]; n_classes];
        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..features.len()).collect();

        for _ in 0..LOGREG_EPOCHS {
            order.shuffle(&mut rng);
            for &sample in &order {
                let x = &features[sample];
                let y = labels[sample];
                let probabilities = Self::softmax_scores(&weights, x);

                for (class, row) in weights.iter_mut().enumerate() {
                    let gradient = probabilities[class] - if class == y { 1.0 } else { 0.0 };
                    for (j, weight) in row.iter_mut().take(n_features).enumerate() {
                        *weight -= LOGREG_LEARNING_RATE * (gradient * x[j] + LOGREG_L2 * *weight);
                    }
                    row[n_features] -= LOGREG_LEARNING_RATE * gradient;
                }
            }
        }

        Self {
            weights,
            n_features,
        }
    }

    fn softmax_scores(weights: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
        let n_features = x.len();
        let scores: Vec<f64> = weights
            .iter()
            .map(|row| {
                let dot: f64 = row
                    .iter()
                    .take(n_features)
                    .zip(x)
                    .map(|(w, v)| w * v)
                    .sum();
                dot + row[n_features]
            })
            .collect();

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }

    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        if features.len() == self.n_features {
            Self::softmax_scores(&self.weights, features)
        } else {
            // Defensive resize; transform output always matches in practice.
            let mut padded = features.to_vec();
            padded.resize(self.n_features, 0.0);
            Self::softmax_scores(&self.weights, &padded)
        }
    }
}

// ---------------------------------------------------------------------------
// Kernel SVM
// ---------------------------------------------------------------------------

const SVM_EPOCHS: usize = 30;
const SVM_LAMBDA: f64 = 0.01;

/// One-vs-rest RBF-kernel SVM trained with the kernelized Pegasos
/// sub-gradient method. Produces decision values only, no calibrated
/// probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSvmModel {
    /// Training vectors kept as support candidates.
    support: Vec<Vec<f64>>,
    /// Support labels, as class indices.
    support_labels: Vec<usize>,
    /// Per-class alpha counts over the support vectors.
    alphas: Vec<Vec<f64>>,
    /// Decision-value scale, 1 / (lambda * iterations).
    scale: f64,
    gamma: f64,
    n_classes: usize,
}

impl KernelSvmModel {
    fn train(features: &[Vec<f64>], labels: &[usize], n_classes: usize, seed: u64) -> Self {
        let n_samples = features.len();
        let gamma = 1.0 / features[0].len().max(1) as f64;

        // Precompute the kernel matrix; training sets are small by design.
        let mut kernel = vec![vec![0.0; n_samples]; n_samples];
        for i in 0..n_samples {
            for j in i..n_samples {
                let value = rbf_kernel(&features[i], &features[j], gamma);
                kernel[i][j] = value;
                kernel[j][i] = value;
            }
        }

        let iterations = SVM_EPOCHS * n_samples;
        let mut alphas = vec![vec![0.0; n_samples]; n_classes];
        let mut rng = StdRng::seed_from_u64(seed);

        for (class, alpha) in alphas.iter_mut().enumerate() {
            let signs: Vec<f64> = labels
                .iter()
                .map(|&label| if label == class { 1.0 } else { -1.0 })
                .collect();

            for t in 1..=iterations {
                let i = rng.random_range(0..n_samples);
                let decision: f64 = (0..n_samples)
                    .map(|j| alpha[j] * signs[j] * kernel[j][i])
                    .sum::<f64>()
                    / (SVM_LAMBDA * t as f64);
                if signs[i] * decision < 1.0 {
                    alpha[i] += 1.0;
                }
            }
        }

        Self {
            support: features.to_vec(),
            support_labels: labels.to_vec(),
            alphas,
            scale: 1.0 / (SVM_LAMBDA * iterations as f64),
            gamma,
            n_classes,
        }
    }

    fn decision_values(&self, features: &[f64]) -> Vec<f64> {
        let kernels: Vec<f64> = self
            .support
            .iter()
            .map(|vector| rbf_kernel(vector, features, self.gamma))
            .collect();

        (0..self.n_classes)
            .map(|class| {
                self.alphas[class]
                    .iter()
                    .zip(&self.support_labels)
                    .zip(&kernels)
                    .map(|((alpha, &label), k)| {
                        let sign = if label == class { 1.0 } else { -1.0 };
                        alpha * sign * k
                    })
                    .sum::<f64>()
                    * self.scale
            })
            .collect()
    }

    fn predict(&self, features: &[f64]) -> usize {
        argmax(&self.decision_values(features))
    }
}

fn rbf_kernel(a: &[f64], b: &[f64], gamma: f64) -> f64 {
    let squared_distance: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    (-gamma * squared_distance).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two linearly separable blobs in 2D.
    fn toy_data() -> (Vec<Vec<f64>>, Vec<usize>) {
        let features = vec![
            vec![1.0, 0.1],
            vec![0.9, 0.0],
            vec![1.1, 0.2],
            vec![0.8, 0.1],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![0.2, 1.1],
            vec![0.0, 0.8],
        ];
        let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (features, labels)
    }

    #[test]
    fn test_logistic_regression_separates_blobs() {
        let (features, labels) = toy_data();
        let model =
            ClassifierModel::train(Algorithm::LogisticRegression, &features, &labels, 2, 42)
                .unwrap();

        let (class, probabilities) = model.predict(&[1.0, 0.0]);
        assert_eq!(class, 0);
        let probabilities = probabilities.unwrap();
        assert!(probabilities[0] > 0.5);
        assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let (class, _) = model.predict(&[0.0, 1.0]);
        assert_eq!(class, 1);
    }

    #[test]
    fn test_random_forest_separates_blobs() {
        let (features, labels) = toy_data();
        let model =
            ClassifierModel::train(Algorithm::RandomForest, &features, &labels, 2, 42).unwrap();

        let (class, probabilities) = model.predict(&[1.0, 0.0]);
        assert_eq!(class, 0);
        assert!(probabilities.is_some());

        let (class, _) = model.predict(&[0.1, 1.0]);
        assert_eq!(class, 1);
    }

    #[test]
    fn test_kernel_svm_separates_blobs_without_probabilities() {
        let (features, labels) = toy_data();
        let model = ClassifierModel::train(Algorithm::KernelSvm, &features, &labels, 2, 42).unwrap();

        let (class, probabilities) = model.predict(&[1.0, 0.1]);
        assert_eq!(class, 0);
        assert!(probabilities.is_none());

        let (class, _) = model.predict(&[0.1, 0.9]);
        assert_eq!(class, 1);
    }

    #[test]
    fn test_training_is_deterministic_under_fixed_seed() {
        let (features, labels) = toy_data();
        let a = ClassifierModel::train(Algorithm::RandomForest, &features, &labels, 2, 7).unwrap();
        let b = ClassifierModel::train(Algorithm::RandomForest, &features, &labels, 2, 7).unwrap();

        let probe = vec![0.5, 0.5];
        assert_eq!(a.predict(&probe).0, b.predict(&probe).0);
    }

    #[test]
    fn test_train_rejects_empty_input() {
        let result = ClassifierModel::train(Algorithm::RandomForest, &[], &[], 2, 42);
        assert!(result.is_err());
    }

    #[test]
    fn test_argmax_first_wins_on_tie() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), 0);
    }
}
