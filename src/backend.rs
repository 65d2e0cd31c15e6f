//! Classifier backends.
//!
//! Three interchangeable strategies implement [`ClassifierBackend`]:
//!
//! - [`gemini::GeminiBackend`]: few-shot prompting of a remote generative
//!   model, free-text reply parsing
//! - [`zero_shot::ZeroShotBackend`]: entailment scoring against
//!   natural-language label descriptions, no task-specific training
//! - [`trained::TrainedBackend`]: TF-IDF features plus a locally trained
//!   supervised model
//!
//! Callers (chat sessions, the evaluation harness) depend only on the trait,
//! never on a concrete variant.

pub mod gemini;
pub mod model;
pub mod tfidf;
pub mod trained;
pub mod zero_shot;

use crate::error::Result;
use crate::intent::Intent;

/// Intent returned when a backend cannot produce a trustworthy label.
pub const FALLBACK_INTENT: Intent = Intent::Greeting;

/// Confidence reported together with [`FALLBACK_INTENT`] after an internal
/// failure.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// One classification outcome: an in-set intent and a confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub confidence: f64,
}

impl ClassificationResult {
    /// Create a result, clamping the confidence into [0, 1].
    pub fn new(intent: Intent, confidence: f64) -> Self {
        Self {
            intent,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// The degraded result used when a backend swallows an internal failure.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_INTENT, FALLBACK_CONFIDENCE)
    }
}

/// Intent classifier backend trait.
///
/// The remote and zero-shot variants never return an error from `classify`
/// for ordinary input; internal failures degrade to
/// [`ClassificationResult::fallback`] and are logged. The trained variant is
/// the exception: calling `classify` before fitting or loading a pipeline is
/// a programming error and fails loudly with
/// [`DestekError::ModelNotTrained`](crate::error::DestekError::ModelNotTrained).
pub trait ClassifierBackend: Send + Sync {
    /// Classify one utterance.
    fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the name of this backend for reports and logging.
    fn name(&self) -> &str;

    /// Confidence below which a chat session prepends a clarification
    /// request to the reply. Zero disables hedging.
    fn hedge_threshold(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        let result = ClassificationResult::new(Intent::Goodbye, 1.7);
        assert_eq!(result.confidence, 1.0);

        let result = ClassificationResult::new(Intent::Goodbye, -0.2);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_fallback_result() {
        let result = ClassificationResult::fallback();
        assert_eq!(result.intent, Intent::Greeting);
        assert_eq!(result.confidence, 0.5);
    }
}
