//! End-to-end scenarios for the trained supervised backend: fit on a tiny
//! corpus, evaluate the held-out split, persist and reload the pipeline.

use destek::backend::model::Algorithm;
use destek::backend::trained::TrainedBackend;
use destek::backend::ClassifierBackend;
use destek::dataset::LabeledExample;
use destek::error::DestekError;
use destek::eval;
use destek::intent::Intent;
use tempfile::TempDir;

/// Two intents, ten examples each.
fn tiny_corpus() -> Vec<LabeledExample> {
    let greetings = [
        "merhaba",
        "selam nasılsınız",
        "iyi günler",
        "merhaba size ulaşmak istedim",
        "selam",
        "hey merhaba",
        "iyi akşamlar",
        "günaydın",
        "merhaba iyi günler",
        "selam iyi günler",
    ];
    let shipping = [
        "kargo ne kadar sürer",
        "kargo ücreti nedir",
        "teslimat saatleri nedir",
        "ücretsiz kargo var mı",
        "hangi kargo firması",
        "kargo ücreti ne kadar",
        "teslimat kaç gün sürer",
        "kargo takip nasıl yapılır",
        "teslimat adresi değişikliği",
        "kargo bedava mı",
    ];

    let mut examples = Vec::new();
    for text in greetings {
        examples.push(LabeledExample {
            text: text.to_string(),
            intent: Intent::Greeting,
        });
    }
    for text in shipping {
        examples.push(LabeledExample {
            text: text.to_string(),
            intent: Intent::ShippingInfo,
        });
    }
    examples
}

#[test]
fn test_fit_then_evaluate_holdout() {
    let mut backend = TrainedBackend::new(Algorithm::LogisticRegression);
    let report = backend.fit(&tiny_corpus()).unwrap();

    // 20 examples, stratified 80/20: 4 held out, 2 per intent.
    assert_eq!(report.holdout.len(), 4);
    for intent in [Intent::Greeting, Intent::ShippingInfo] {
        assert_eq!(
            report.holdout.iter().filter(|e| e.intent == intent).count(),
            2
        );
    }

    let result = eval::evaluate(&backend, &report.holdout).unwrap();
    assert_eq!(result.predicted_intents.len(), 4);
    assert_eq!(result.true_intents.len(), 4);
    for metric in [
        result.accuracy,
        result.precision,
        result.recall,
        result.f1_score,
    ] {
        assert!((0.0..=1.0).contains(&metric));
    }
}

#[test]
fn test_every_algorithm_fits_and_classifies() {
    for algorithm in [
        Algorithm::RandomForest,
        Algorithm::LogisticRegression,
        Algorithm::KernelSvm,
    ] {
        let mut backend = TrainedBackend::new(algorithm);
        backend.fit(&tiny_corpus()).unwrap();

        let result = backend.classify("kargo ne zaman gelir").unwrap();
        assert!(Intent::ALL.contains(&result.intent));
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}

#[test]
fn test_unfitted_backend_fails_loudly_through_the_harness() {
    let backend = TrainedBackend::new(Algorithm::RandomForest);
    let sample = tiny_corpus();

    let error = eval::evaluate(&backend, &sample).unwrap_err();
    assert!(matches!(error, DestekError::ModelNotTrained { .. }));
}

#[test]
fn test_save_load_roundtrip_preserves_predictions() {
    let temp_dir = TempDir::new().unwrap();
    let artifact = temp_dir.path().join("pipeline.json");

    let mut backend = TrainedBackend::new(Algorithm::LogisticRegression);
    backend.fit(&tiny_corpus()).unwrap();
    backend.save(&artifact).unwrap();

    let restored = TrainedBackend::load(&artifact).unwrap();
    assert!(restored.is_fitted());

    for text in ["merhaba", "kargo ücreti", "teslimat kaç gün"] {
        let before = backend.classify(text).unwrap();
        let after = restored.classify(text).unwrap();
        assert_eq!(before.intent, after.intent);
        assert_eq!(before.confidence, after.confidence);
    }
}

#[test]
fn test_save_before_fit_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let backend = TrainedBackend::new(Algorithm::KernelSvm);

    let error = backend.save(&temp_dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(error, DestekError::ModelNotTrained { .. }));
}

#[test]
fn test_load_from_missing_artifact_is_a_distinct_error() {
    let error = TrainedBackend::load(std::path::Path::new("/nonexistent/model.json")).unwrap_err();
    assert!(matches!(error, DestekError::ModelLoadError { .. }));
}

#[test]
fn test_repeated_classification_is_idempotent() {
    let mut backend = TrainedBackend::new(Algorithm::RandomForest);
    backend.fit(&tiny_corpus()).unwrap();

    let first = backend.classify("iyi günler").unwrap();
    for _ in 0..5 {
        let next = backend.classify("iyi günler").unwrap();
        assert_eq!(next.intent, first.intent);
        assert_eq!(next.confidence, first.confidence);
    }
}
