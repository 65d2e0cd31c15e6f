//! Model-loading policy tests for the zero-shot backend: the fallback model
//! is attempted exactly once, and double failure surfaces as a
//! configuration error.

use std::sync::atomic::{AtomicUsize, Ordering};

use destek::backend::ClassifierBackend;
use destek::backend::zero_shot::{
    EntailmentModel, LexicalEntailmentModel, ModelLoader, ModelSpec, ZeroShotBackend,
    ZeroShotConfig,
};
use destek::error::{DestekError, Result};
use destek::intent::Intent;

/// Loader that fails the first `failures` attempts, then succeeds.
struct FlakyLoader {
    failures: usize,
    attempts: AtomicUsize,
}

impl FlakyLoader {
    fn new(failures: usize) -> Self {
        Self {
            failures,
            attempts: AtomicUsize::new(0),
        }
    }

    fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ModelLoader for FlakyLoader {
    fn load(&self, spec: &ModelSpec) -> Result<Box<dyn EntailmentModel>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(DestekError::backend(format!(
                "{} is not available",
                spec.name
            )));
        }
        Ok(Box::new(LexicalEntailmentModel::new(spec.name)))
    }
}

#[test]
fn test_primary_success_loads_once() {
    let loader = FlakyLoader::new(0);
    let backend = ZeroShotBackend::with_loader(ZeroShotConfig::default(), &loader).unwrap();

    assert_eq!(loader.attempts(), 1);
    assert!(backend.classify("merhaba").is_ok());
}

#[test]
fn test_fallback_is_attempted_exactly_once() {
    let loader = FlakyLoader::new(1);
    let backend = ZeroShotBackend::with_loader(ZeroShotConfig::default(), &loader).unwrap();

    // One failed primary attempt plus one successful fallback attempt.
    assert_eq!(loader.attempts(), 2);
    assert!(backend.classify("sepete ekle").is_ok());
}

#[test]
fn test_double_failure_is_a_construction_error() {
    let loader = FlakyLoader::new(2);
    let error = ZeroShotBackend::with_loader(ZeroShotConfig::default(), &loader).unwrap_err();

    assert!(matches!(error, DestekError::Config(_)));
    // No retry loop: primary once, fallback once, then give up.
    assert_eq!(loader.attempts(), 2);
}

#[test]
fn test_classification_maps_descriptions_back_to_intents() {
    let backend = ZeroShotBackend::new().unwrap();

    let cases = [
        ("Sepete ekle", Intent::CartOperations),
        ("İade etmek istiyorum", Intent::ReturnRefund),
        ("Kargo ücreti ne kadar", Intent::ShippingInfo),
        ("Şikayetim var", Intent::Complaint),
    ];
    for (text, expected) in cases {
        let result = backend.classify(text).unwrap();
        assert_eq!(result.intent, expected, "text: {text}");
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}
