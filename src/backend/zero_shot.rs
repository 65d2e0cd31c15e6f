//! Zero-shot intent classification against natural-language label
//! descriptions.
//!
//! Instead of training an intent-specific head, the utterance is scored
//! against a fixed list of rich label descriptions (synonyms and example
//! phrasings per intent) with an entailment-style model, and the top-scoring
//! description is mapped back to its intent. The model itself sits behind
//! [`EntailmentModel`] so a real local inference pipeline can be plugged in;
//! the crate ships a deterministic lexical-overlap scorer as the default.

use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::analysis;
use crate::backend::{ClassificationResult, ClassifierBackend};
use crate::error::{DestekError, Result};
use crate::intent::Intent;

/// Compute device a model variant prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Gpu,
}

/// Identifies one entailment model variant for a [`ModelLoader`].
#[derive(Debug, Clone)]
pub struct ModelSpec {
    /// Model identifier understood by the loader.
    pub name: &'static str,
    /// Preferred device. A missing GPU must degrade to CPU, never fail hard.
    pub device: Device,
}

/// Primary model: larger, multilingual, GPU-preferring.
pub const PRIMARY_MODEL: ModelSpec = ModelSpec {
    name: "mdeberta-v3-base-xnli",
    device: Device::Gpu,
};

/// Fallback model: smaller, CPU-only.
pub const FALLBACK_MODEL: ModelSpec = ModelSpec {
    name: "bart-large-mnli",
    device: Device::Cpu,
};

/// Entailment-style scorer: how strongly does `text` support `hypothesis`?
pub trait EntailmentModel: Send + Sync {
    /// Score in [0, 1]; higher means stronger entailment.
    fn score(&self, text: &str, hypothesis: &str) -> f64;

    /// Get the name of this model for debugging and logging.
    fn name(&self) -> &str;
}

/// Loads entailment models from specs. The seam where a real local inference
/// runtime is attached.
pub trait ModelLoader: Send + Sync {
    fn load(&self, spec: &ModelSpec) -> Result<Box<dyn EntailmentModel>>;
}

/// Loader for the built-in lexical scorer. Never fails; GPU preferences
/// degrade to CPU silently because the scorer has no device affinity.
#[derive(Debug, Default)]
pub struct LexicalModelLoader;

impl ModelLoader for LexicalModelLoader {
    fn load(&self, spec: &ModelSpec) -> Result<Box<dyn EntailmentModel>> {
        if spec.device == Device::Gpu {
            log::debug!("lexical scorer has no GPU path, running {} on CPU", spec.name);
        }
        Ok(Box::new(LexicalEntailmentModel::new(spec.name)))
    }
}

/// Deterministic entailment scorer based on normalized token overlap.
///
/// Scores the fraction of utterance tokens that also occur in the label
/// description. Both sides go through the same normalization as the trained
/// pipeline, so accent folding and casing do not affect the overlap.
pub struct LexicalEntailmentModel {
    name: String,
}

impl LexicalEntailmentModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EntailmentModel for LexicalEntailmentModel {
    fn score(&self, text: &str, hypothesis: &str) -> f64 {
        let text_tokens: HashSet<String> = analysis::tokenize(text).into_iter().collect();
        if text_tokens.is_empty() {
            return 0.0;
        }
        let hypothesis_tokens: HashSet<String> =
            analysis::tokenize(hypothesis).into_iter().collect();

        let overlap = text_tokens.intersection(&hypothesis_tokens).count();
        overlap as f64 / text_tokens.len() as f64
    }

    fn name(&self) -> &str {
        &self.name
    }
}

lazy_static! {
    /// Label descriptions scored against the utterance, each mapped back to
    /// its intent. Rich phrasings, not bare label words: the entailment
    /// model sees synonyms and example wordings per intent.
    static ref LABEL_DESCRIPTIONS: Vec<(&'static str, Intent)> = vec![
        (
            "selamlama ve karşılama: merhaba, selam, iyi günler, hoşgeldin, nasılsın, hey",
            Intent::Greeting,
        ),
        (
            "ürün arama ve sorgulama: ürün arıyorum, fiyat nedir, özellik nedir, stok var mı, katalog, ürün göster, hangi ürünler var",
            Intent::ProductInquiry,
        ),
        (
            "sipariş takibi ve durum sorgulama: siparişim nerede, ne zaman gelir, kargo takip, sipariş durumu, teslimat tarihi",
            Intent::OrderStatus,
        ),
        (
            "sepet yönetimi ve işlemleri: sepete ekle, sepetten çıkar, sepetimi göster, sepet toplamı, alışveriş sepeti",
            Intent::CartOperations,
        ),
        (
            "ödeme problemleri ve sorunları: ödeme yapamıyorum, kredi kartı çalışmıyor, ödeme hatası, taksit, ödeme yöntemleri",
            Intent::PaymentIssues,
        ),
        (
            "iade ve geri ödeme işlemleri: iade etmek istiyorum, para iadesi, ürün değişimi, iade süreci, geri ödeme",
            Intent::ReturnRefund,
        ),
        (
            "kargo ve teslimat bilgileri: kargo ücreti, ne kadar sürer, teslimat saatleri, ücretsiz kargo, kargo firması",
            Intent::ShippingInfo,
        ),
        (
            "vedalaşma ve ayrılık: hoşçakal, görüşürüz, teşekkürler, elveda, güle güle, iyi günler",
            Intent::Goodbye,
        ),
        (
            "şikayet ve memnuniyetsizlik: şikayetim var, memnun değilim, sorun yaşıyorum, kötü hizmet, problem",
            Intent::Complaint,
        ),
    ];
}

/// Configuration for [`ZeroShotBackend`]: which model variants to try.
#[derive(Debug, Clone)]
pub struct ZeroShotConfig {
    pub primary: ModelSpec,
    pub fallback: ModelSpec,
}

impl Default for ZeroShotConfig {
    fn default() -> Self {
        Self {
            primary: PRIMARY_MODEL,
            fallback: FALLBACK_MODEL,
        }
    }
}

/// Zero-shot classification backend over an entailment model.
pub struct ZeroShotBackend {
    model: Box<dyn EntailmentModel>,
}

impl std::fmt::Debug for ZeroShotBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroShotBackend").finish_non_exhaustive()
    }
}

impl ZeroShotBackend {
    /// Construct with the built-in lexical scorer.
    pub fn new() -> Result<Self> {
        Self::with_loader(ZeroShotConfig::default(), &LexicalModelLoader)
    }

    /// Construct by loading a model through `loader`.
    ///
    /// The primary spec is tried once; on failure the fallback spec is tried
    /// exactly once more. If both fail, construction errors — degraded
    /// operation without any model would be invisible to the operator.
    pub fn with_loader(config: ZeroShotConfig, loader: &dyn ModelLoader) -> Result<Self> {
        let model = match loader.load(&config.primary) {
            Ok(model) => model,
            Err(err) => {
                log::warn!(
                    "primary model {} failed to load ({err}), trying fallback {}",
                    config.primary.name,
                    config.fallback.name
                );
                loader.load(&config.fallback).map_err(|err| {
                    DestekError::config(format!("no entailment model could be loaded: {err}"))
                })?
            }
        };

        log::info!("zero-shot backend ready with model {}", model.name());
        Ok(Self { model })
    }

    fn classify_impl(&self, text: &str) -> ClassificationResult {
        let mut best: Option<(f64, Intent)> = None;
        for (description, intent) in LABEL_DESCRIPTIONS.iter() {
            let score = self.model.score(text, description);
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, *intent));
            }
        }

        match best {
            Some((score, intent)) => ClassificationResult::new(intent, score),
            None => ClassificationResult::fallback(),
        }
    }
}

impl ClassifierBackend for ZeroShotBackend {
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        Ok(self.classify_impl(text))
    }

    fn name(&self) -> &str {
        "zero_shot"
    }

    fn hedge_threshold(&self) -> f64 {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_score_full_overlap() {
        let model = LexicalEntailmentModel::new("test");
        let score = model.score("sepete ekle", "sepet yönetimi: sepete ekle, sepetten çıkar");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_lexical_score_empty_text() {
        let model = LexicalEntailmentModel::new("test");
        assert_eq!(model.score("", "anything"), 0.0);
    }

    #[test]
    fn test_classify_cart_operation() {
        let backend = ZeroShotBackend::new().unwrap();
        let result = backend.classify("Sepete ekle").unwrap();
        assert_eq!(result.intent, Intent::CartOperations);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_classify_payment_issue() {
        let backend = ZeroShotBackend::new().unwrap();
        let result = backend.classify("Ödeme yapamıyorum").unwrap();
        assert_eq!(result.intent, Intent::PaymentIssues);
    }

    #[test]
    fn test_classify_unmatched_text_stays_in_set() {
        let backend = ZeroShotBackend::new().unwrap();
        let result = backend.classify("xyzzy plugh").unwrap();
        assert!(Intent::ALL.contains(&result.intent));
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_description_table_covers_every_intent() {
        let covered: HashSet<Intent> =
            LABEL_DESCRIPTIONS.iter().map(|(_, intent)| *intent).collect();
        assert_eq!(covered.len(), Intent::ALL.len());
    }
}
