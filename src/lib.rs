//! # Destek
//!
//! A pluggable intent-classification and canned-response toolkit for
//! e-commerce customer support bots.
//!
//! ## Features
//!
//! - Fixed nine-intent taxonomy for support conversations
//! - Three interchangeable classification backends behind one trait:
//!   remote few-shot prompting, zero-shot entailment scoring, and a locally
//!   trained TF-IDF pipeline
//! - Chat session adapter with confidence-gated clarification replies
//! - Evaluation harness with weighted classification metrics
//! - Backend comparison report ranked by F1 score

pub mod analysis;
pub mod backend;
pub mod catalog;
pub mod chat;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod intent;

pub mod prelude {
    //! Convenience re-exports for the common workflow.

    pub use crate::backend::trained::TrainedBackend;
    pub use crate::backend::{ClassificationResult, ClassifierBackend};
    pub use crate::catalog::ResponseCatalog;
    pub use crate::chat::ChatSession;
    pub use crate::dataset::LabeledExample;
    pub use crate::error::{DestekError, Result};
    pub use crate::eval::{ComparisonReport, EvaluationResult, evaluate, stratified_split};
    pub use crate::intent::Intent;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
