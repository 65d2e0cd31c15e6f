//! Locally trained supervised backend.
//!
//! Pipeline: normalize text → TF-IDF uni/bi-gram features → selectable
//! classifier (random forest, logistic regression, or kernel SVM). Fitting
//! performs a stratified 80/20 split under a fixed seed and reports held-out
//! accuracy; the held-out sample is returned so callers can run the full
//! evaluation harness on it.
//!
//! Using `classify` before `fit` or `load` is a contract violation and fails
//! loudly; it is never folded into the low-confidence fallback that the
//! remote backends use for transient errors.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis;
use crate::backend::model::{Algorithm, ClassifierModel};
use crate::backend::tfidf::TfidfVectorizer;
use crate::backend::{ClassificationResult, ClassifierBackend};
use crate::dataset::LabeledExample;
use crate::error::{DestekError, Result};
use crate::eval::split::stratified_split;
use crate::intent::Intent;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of the corpus held out during fitting.
const HOLDOUT_FRACTION: f64 = 0.2;

/// Minimum corpus size accepted by `fit`.
const MIN_TRAINING_SAMPLES: usize = 10;

/// Confidence reported when the underlying model has no probability
/// estimates.
const NO_PROBABILITY_CONFIDENCE: f64 = 0.8;

/// Metadata recorded with a fitted pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub algorithm: Algorithm,
    pub trained_at: DateTime<Utc>,
    pub training_examples: usize,
    pub vocabulary_size: usize,
    pub holdout_accuracy: f64,
}

/// The entire fitted pipeline, persisted as one opaque artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FittedPipeline {
    vectorizer: TfidfVectorizer,
    model: ClassifierModel,
    metadata: ModelMetadata,
}

/// Outcome of fitting, including the held-out stratified sample.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Stratified held-out examples, untouched by training.
    pub holdout: Vec<LabeledExample>,
    /// Exact-match accuracy on the held-out sample.
    pub holdout_accuracy: f64,
    pub training_examples: usize,
    pub vocabulary_size: usize,
}

/// Trained supervised classification backend.
#[derive(Debug)]
pub struct TrainedBackend {
    algorithm: Algorithm,
    seed: u64,
    pipeline: Option<FittedPipeline>,
}

impl TrainedBackend {
    /// Create an unfitted backend for the given algorithm.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            seed: DEFAULT_SEED,
            pipeline: None,
        }
    }

    /// Override the seed used for splitting and model training.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether a fitted pipeline is present.
    pub fn is_fitted(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Metadata of the fitted pipeline, if any.
    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.pipeline.as_ref().map(|pipeline| &pipeline.metadata)
    }

    /// Fit the pipeline on a labeled corpus.
    ///
    /// A stratified 80/20 split is drawn under the configured seed; the
    /// vectorizer and model only ever see the training side. Refitting
    /// replaces any previous pipeline.
    pub fn fit(&mut self, examples: &[LabeledExample]) -> Result<FitReport> {
        if examples.len() < MIN_TRAINING_SAMPLES {
            return Err(DestekError::InsufficientTrainingData {
                min_samples: MIN_TRAINING_SAMPLES,
                actual: examples.len(),
            });
        }

        let (train, holdout) = stratified_split(examples, HOLDOUT_FRACTION, self.seed);
        log::info!(
            "fitting {} on {} examples ({} held out)",
            self.algorithm.as_str(),
            train.len(),
            holdout.len()
        );

        let documents: Vec<String> = train
            .iter()
            .map(|example| analysis::normalize(&example.text))
            .collect();
        let labels: Vec<usize> = train.iter().map(|example| example.intent.index()).collect();

        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&documents);

        let features: Vec<Vec<f64>> = documents
            .iter()
            .map(|document| vectorizer.transform(document))
            .collect();

        let model = ClassifierModel::train(
            self.algorithm,
            &features,
            &labels,
            Intent::ALL.len(),
            self.seed,
        )?;

        let vocabulary_size = vectorizer.vocabulary_size();
        self.pipeline = Some(FittedPipeline {
            vectorizer,
            model,
            metadata: ModelMetadata {
                algorithm: self.algorithm,
                trained_at: Utc::now(),
                training_examples: train.len(),
                vocabulary_size,
                holdout_accuracy: 0.0,
            },
        });

        let mut correct = 0;
        for example in &holdout {
            if self.classify(&example.text)?.intent == example.intent {
                correct += 1;
            }
        }
        let holdout_accuracy = if holdout.is_empty() {
            0.0
        } else {
            correct as f64 / holdout.len() as f64
        };
        if let Some(pipeline) = &mut self.pipeline {
            pipeline.metadata.holdout_accuracy = holdout_accuracy;
        }

        log::info!(
            "{} fitted: vocabulary {}, holdout accuracy {:.3}",
            self.algorithm.as_str(),
            vocabulary_size,
            holdout_accuracy
        );

        Ok(FitReport {
            holdout,
            holdout_accuracy,
            training_examples: train.len(),
            vocabulary_size,
        })
    }

    /// Save the fitted pipeline to a single artifact file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| DestekError::not_trained("cannot save before fit"))?;

        let json = serde_json::to_string(pipeline).map_err(|_| DestekError::ModelSaveError {
            path: path.display().to_string(),
        })?;
        std::fs::write(path, json).map_err(|_| DestekError::ModelSaveError {
            path: path.display().to_string(),
        })?;

        Ok(())
    }

    /// Load a fitted pipeline from an artifact file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|_| DestekError::ModelLoadError {
            path: path.display().to_string(),
        })?;
        let pipeline: FittedPipeline =
            serde_json::from_str(&content).map_err(|_| DestekError::ModelLoadError {
                path: path.display().to_string(),
            })?;

        Ok(Self {
            algorithm: pipeline.metadata.algorithm,
            seed: DEFAULT_SEED,
            pipeline: Some(pipeline),
        })
    }
}

impl ClassifierBackend for TrainedBackend {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| DestekError::not_trained("classify called before fit or load"))?;

        let normalized = analysis::normalize(text);
        let features = pipeline.vectorizer.transform(&normalized);
        let (class, probabilities) = pipeline.model.predict(&features);

        let confidence = probabilities
            .and_then(|p| p.into_iter().reduce(f64::max))
            .unwrap_or(NO_PROBABILITY_CONFIDENCE);

        Ok(ClassificationResult::new(Intent::ALL[class], confidence))
    }

    fn name(&self) -> &str {
        "trained"
    }
}
