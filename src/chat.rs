//! Chat session adapter: confidence-gated reply selection over a classifier
//! backend.
//!
//! A session owns its transcript exclusively. Turns are append-only during a
//! conversation and clearable in bulk. Hedging is purely textual: when the
//! backend's confidence falls below the session threshold, a clarification
//! request is prepended to the reply, but the reported intent and confidence
//! are untouched.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::backend::ClassifierBackend;
use crate::catalog::ResponseCatalog;
use crate::error::Result;
use crate::intent::Intent;

/// Prefix prepended to replies when the classification confidence falls
/// below the hedge threshold.
pub const CLARIFICATION_PREFIX: &str =
    "Tam olarak anlayamadım. Lütfen daha açık bir şekilde söyler misiniz? ";

/// Speaker of one transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

/// The assistant's answer to one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub intent: Intent,
    pub response: String,
    pub confidence: f64,
}

/// Interactive session wrapping one backend and one reply catalog.
pub struct ChatSession {
    backend: Box<dyn ClassifierBackend>,
    catalog: ResponseCatalog,
    hedge_threshold: f64,
    rng: StdRng,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    /// Create a session. The hedge threshold defaults to the backend's own
    /// recommendation.
    pub fn new(backend: Box<dyn ClassifierBackend>, catalog: ResponseCatalog) -> Self {
        let hedge_threshold = backend.hedge_threshold();
        Self {
            backend,
            catalog,
            hedge_threshold,
            rng: StdRng::from_os_rng(),
            history: Vec::new(),
        }
    }

    /// Pin the reply-sampling random source for reproducible sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Override the hedge threshold.
    pub fn with_hedge_threshold(mut self, threshold: f64) -> Self {
        self.hedge_threshold = threshold;
        self
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Handle one user message: classify, select a reply, hedge when the
    /// confidence is low, and append both turns to the transcript.
    pub fn chat(&mut self, message: &str) -> Result<ChatReply> {
        let result = self.backend.classify(message)?;

        let mut response = self.catalog.sample(result.intent, &mut self.rng).to_string();
        if result.confidence < self.hedge_threshold {
            response = format!("{CLARIFICATION_PREFIX}{response}");
        }

        self.history.push(ChatTurn {
            role: ChatRole::User,
            content: message.to_string(),
            intent: None,
            confidence: None,
            backend: None,
        });
        self.history.push(ChatTurn {
            role: ChatRole::Assistant,
            content: response.clone(),
            intent: Some(result.intent),
            confidence: Some(result.confidence),
            backend: Some(self.backend.name().to_string()),
        });

        Ok(ChatReply {
            intent: result.intent,
            response,
            confidence: result.confidence,
        })
    }

    /// The session transcript, oldest turn first.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Discard the whole transcript.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ClassificationResult;

    /// Backend that always answers with a fixed result.
    struct FixedBackend {
        intent: Intent,
        confidence: f64,
        threshold: f64,
    }

    impl ClassifierBackend for FixedBackend {
        fn classify(&self, _text: &str) -> Result<ClassificationResult> {
            Ok(ClassificationResult::new(self.intent, self.confidence))
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn hedge_threshold(&self) -> f64 {
            self.threshold
        }
    }

    fn session(confidence: f64, threshold: f64) -> ChatSession {
        let backend = FixedBackend {
            intent: Intent::ProductInquiry,
            confidence,
            threshold,
        };
        ChatSession::new(Box::new(backend), ResponseCatalog::builtin()).with_seed(7)
    }

    #[test]
    fn test_low_confidence_reply_is_hedged() {
        let mut session = session(0.4, 0.6);
        let reply = session.chat("bu ürün ne kadar").unwrap();
        assert!(reply.response.starts_with(CLARIFICATION_PREFIX));
        // Hedging is textual only.
        assert_eq!(reply.intent, Intent::ProductInquiry);
        assert_eq!(reply.confidence, 0.4);
    }

    #[test]
    fn test_confident_reply_is_not_hedged() {
        let mut session = session(0.9, 0.6);
        let reply = session.chat("bu ürün ne kadar").unwrap();
        assert!(!reply.response.starts_with(CLARIFICATION_PREFIX));
    }

    #[test]
    fn test_threshold_boundary_does_not_hedge() {
        let mut session = session(0.6, 0.6);
        let reply = session.chat("bu ürün ne kadar").unwrap();
        assert!(!reply.response.starts_with(CLARIFICATION_PREFIX));
    }

    #[test]
    fn test_session_adopts_backend_threshold() {
        let session = session(0.9, 0.42);
        assert_eq!(session.hedge_threshold, 0.42);
    }

    #[test]
    fn test_transcript_appends_and_clears() {
        let mut session = session(0.9, 0.0);
        session.chat("merhaba").unwrap();
        session.chat("fiyat nedir").unwrap();

        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].backend.as_deref(), Some("fixed"));
        assert_eq!(history[1].intent, Some(Intent::ProductInquiry));

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_seeded_sessions_sample_identical_replies() {
        let mut a = session(0.9, 0.0);
        let mut b = session(0.9, 0.0);
        for _ in 0..5 {
            assert_eq!(
                a.chat("fiyat").unwrap().response,
                b.chat("fiyat").unwrap().response
            );
        }
    }
}
