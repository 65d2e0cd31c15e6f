//! TF-IDF vectorizer over uni- and bi-gram features.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis;

/// Vocabulary cap: only the highest-document-frequency features are kept.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// TF-IDF vectorizer for text feature extraction.
///
/// Features are unigrams plus space-joined bigrams of the normalized token
/// sequence. No stopword filtering is applied. The fitted state is fully
/// serializable so a trained pipeline can be persisted as one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Feature -> column index mapping.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    idf: Vec<f64>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    /// Vocabulary size cap.
    max_features: usize,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer with the default feature cap.
    pub fn new() -> Self {
        Self::with_max_features(DEFAULT_MAX_FEATURES)
    }

    /// Create an unfitted vectorizer with an explicit feature cap.
    pub fn with_max_features(max_features: usize) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            max_features,
        }
    }

    fn features(document: &str) -> Vec<String> {
        let tokens = analysis::tokenize(document);
        analysis::ngram_features(&tokens)
    }

    /// Fit the vectorizer on training documents.
    pub fn fit(&mut self, documents: &[String]) {
        self.n_documents = documents.len();

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for document in documents {
            let unique_features: HashSet<String> =
                Self::features(document).into_iter().collect();
            for feature in unique_features {
                *document_frequency.entry(feature).or_insert(0) += 1;
            }
        }

        // Keep the most frequent features; ties break lexicographically so
        // fitting is deterministic across runs.
        let mut ranked: Vec<(String, usize)> = document_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let mut vocabulary = HashMap::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        for (index, (feature, df)) in ranked.into_iter().enumerate() {
            vocabulary.insert(feature, index);
            // IDF = log((N + 1) / (df + 1)) + 1
            idf.push(((self.n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
    }

    /// Transform a document into a TF-IDF feature vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let features = Self::features(document);
        let mut tf = vec![0.0; self.vocabulary.len()];

        for feature in &features {
            if let Some(&index) = self.vocabulary.get(feature) {
                tf[index] += 1.0;
            }
        }

        // Normalize by document length
        let document_length = features.len() as f64;
        if document_length > 0.0 {
            for count in &mut tf {
                *count /= document_length;
            }
        }

        // Apply IDF
        for (index, count) in tf.iter_mut().enumerate() {
            *count *= self.idf[index];
        }

        tf
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `fit` has been called.
    pub fn is_fitted(&self) -> bool {
        self.n_documents > 0
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
