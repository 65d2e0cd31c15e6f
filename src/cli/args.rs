//! Command line argument parsing for the destek CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::backend::model::Algorithm;

/// Destek - intent classification and canned-response toolkit
#[derive(Parser, Debug, Clone)]
#[command(name = "destek")]
#[command(about = "Intent classification and canned-response toolkit for support bots")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DestekArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DestekArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fit a supervised model on a labeled dataset
    Train(TrainArgs),

    /// Evaluate one backend on a held-out sample
    Evaluate(EvaluateArgs),

    /// Evaluate several backends and rank them
    Compare(CompareArgs),

    /// Interactive chat loop on stdin/stdout
    Chat(ChatArgs),
}

/// Selectable classification backends.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Remote few-shot prompting backend
    Gemini,
    /// Local zero-shot entailment backend
    ZeroShot,
    /// Locally trained supervised backend (requires --model)
    Trained,
}

impl BackendChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendChoice::Gemini => "gemini",
            BackendChoice::ZeroShot => "zero-shot",
            BackendChoice::Trained => "trained",
        }
    }
}

/// Selectable training algorithms.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmChoice {
    RandomForest,
    LogisticRegression,
    KernelSvm,
}

impl From<AlgorithmChoice> for Algorithm {
    fn from(choice: AlgorithmChoice) -> Self {
        match choice {
            AlgorithmChoice::RandomForest => Algorithm::RandomForest,
            AlgorithmChoice::LogisticRegression => Algorithm::LogisticRegression,
            AlgorithmChoice::KernelSvm => Algorithm::KernelSvm,
        }
    }
}

/// Arguments for training a supervised model
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled dataset (JSON array of {text, intent} records)
    #[arg(short, long, value_name = "DATA_FILE")]
    pub data: PathBuf,

    /// Training algorithm
    #[arg(short, long, value_enum, default_value = "random-forest")]
    pub algorithm: AlgorithmChoice,

    /// Output path for the fitted pipeline artifact
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "destek_model.json")]
    pub model_out: PathBuf,

    /// Random seed for splitting and training
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Arguments for evaluating one backend
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Labeled dataset (JSON array of {text, intent} records)
    #[arg(short, long, value_name = "DATA_FILE")]
    pub data: PathBuf,

    /// Backend to evaluate
    #[arg(short, long, value_enum)]
    pub backend: BackendChoice,

    /// Fitted pipeline artifact (trained backend only)
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,

    /// Maximum number of held-out examples to score
    #[arg(long, default_value_t = 30)]
    pub sample_size: usize,

    /// Random seed for the held-out split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Arguments for comparing several backends
#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// Labeled dataset (JSON array of {text, intent} records)
    #[arg(short, long, value_name = "DATA_FILE")]
    pub data: PathBuf,

    /// Backends to compare
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_value = "gemini,zero-shot"
    )]
    pub backends: Vec<BackendChoice>,

    /// Fitted pipeline artifact (when comparing the trained backend)
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,

    /// Maximum number of held-out examples to score
    #[arg(long, default_value_t = 30)]
    pub sample_size: usize,

    /// Random seed for the held-out split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Arguments for the interactive chat loop
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Backend to chat with
    #[arg(short, long, value_enum, default_value = "zero-shot")]
    pub backend: BackendChoice,

    /// Fitted pipeline artifact (trained backend only)
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,

    /// Seed for reply sampling (reproducible sessions)
    #[arg(long)]
    pub seed: Option<u64>,
}
