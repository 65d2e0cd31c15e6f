//! Error types for the destek library.
//!
//! All fallible operations return [`Result`], which wraps [`DestekError`].
//! Configuration problems (missing credentials, missing model artifacts) are
//! surfaced at construction time; per-call classification failures are
//! recovered inside the backends and never reach the caller through this type.

use std::io;

use thiserror::Error;

/// The main error type for destek operations.
#[derive(Error, Debug)]
pub enum DestekError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid or missing configuration (API credentials, model paths).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend-internal errors (transport failures, inference failures).
    #[error("Backend error: {0}")]
    Backend(String),

    /// Text analysis errors.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Dataset errors (empty files, malformed records).
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// The trained pipeline was used before `fit` or `load`.
    #[error("Model not trained: {message}")]
    ModelNotTrained { message: String },

    /// Too few labeled examples to fit a model.
    #[error("Training data insufficient: need at least {min_samples} samples, got {actual}")]
    InsufficientTrainingData { min_samples: usize, actual: usize },

    /// Model artifact could not be read or parsed.
    #[error("Model loading failed: {path}")]
    ModelLoadError { path: String },

    /// Model artifact could not be written.
    #[error("Model saving failed: {path}")]
    ModelSaveError { path: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with DestekError.
pub type Result<T> = std::result::Result<T, DestekError>;

impl DestekError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DestekError::Config(msg.into())
    }

    /// Create a new backend error.
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        DestekError::Backend(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        DestekError::Analysis(msg.into())
    }

    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        DestekError::Dataset(msg.into())
    }

    /// Create a new not-trained error.
    pub fn not_trained<S: Into<String>>(msg: S) -> Self {
        DestekError::ModelNotTrained {
            message: msg.into(),
        }
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DestekError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = DestekError::config("missing API key");
        assert_eq!(error.to_string(), "Configuration error: missing API key");

        let error = DestekError::backend("request timed out");
        assert_eq!(error.to_string(), "Backend error: request timed out");

        let error = DestekError::not_trained("classify called before fit");
        assert_eq!(
            error.to_string(),
            "Model not trained: classify called before fit"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let destek_error = DestekError::from(io_error);

        match destek_error {
            DestekError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
