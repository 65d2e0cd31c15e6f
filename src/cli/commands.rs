//! CLI command execution.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::backend::ClassifierBackend;
use crate::backend::gemini::{GeminiBackend, GeminiConfig};
use crate::backend::trained::TrainedBackend;
use crate::backend::zero_shot::ZeroShotBackend;
use crate::catalog::ResponseCatalog;
use crate::chat::ChatSession;
use crate::cli::args::*;
use crate::cli::output;
use crate::dataset::{self, LabeledExample};
use crate::error::{DestekError, Result};
use crate::eval::{self, ComparisonReport};

/// Execute the parsed CLI command.
pub fn execute_command(args: DestekArgs) -> Result<()> {
    match args.command {
        Command::Train(train_args) => execute_train(train_args),
        Command::Evaluate(evaluate_args) => execute_evaluate(evaluate_args),
        Command::Compare(compare_args) => execute_compare(compare_args),
        Command::Chat(chat_args) => execute_chat(chat_args),
    }
}

/// Construct a backend from a CLI choice. Configuration problems (missing
/// credential, missing model artifact) surface here, before any
/// classification is attempted.
fn build_backend(
    choice: BackendChoice,
    model: Option<&Path>,
) -> Result<Box<dyn ClassifierBackend>> {
    match choice {
        BackendChoice::Gemini => Ok(Box::new(GeminiBackend::new(GeminiConfig::default())?)),
        BackendChoice::ZeroShot => Ok(Box::new(ZeroShotBackend::new()?)),
        BackendChoice::Trained => {
            let path = model.ok_or_else(|| {
                DestekError::config("the trained backend needs --model <MODEL_FILE>")
            })?;
            Ok(Box::new(TrainedBackend::load(path)?))
        }
    }
}

/// Load the dataset and carve out the evaluation sample: a stratified
/// held-out split, truncated to the requested sample size.
fn load_sample(data: &Path, sample_size: usize, seed: u64) -> Result<Vec<LabeledExample>> {
    let examples = dataset::load_examples(data)?;
    output::print_dataset_summary(&examples);

    let (_, mut test) = eval::stratified_split(&examples, 0.2, seed);
    test.truncate(sample_size);
    if test.is_empty() {
        return Err(DestekError::dataset(
            "held-out sample is empty; the dataset is too small to evaluate",
        ));
    }
    println!("Test sample: {} examples", test.len());
    Ok(test)
}

fn execute_train(args: TrainArgs) -> Result<()> {
    let examples = dataset::load_examples(&args.data)?;
    output::print_dataset_summary(&examples);

    let mut backend = TrainedBackend::new(args.algorithm.into()).with_seed(args.seed);
    let report = backend.fit(&examples)?;
    output::print_fit_report(&report);

    backend.save(&args.model_out)?;
    println!("Model saved: {}", args.model_out.display());
    Ok(())
}

fn execute_evaluate(args: EvaluateArgs) -> Result<()> {
    let sample = load_sample(&args.data, args.sample_size, args.seed)?;
    let backend = build_backend(args.backend, args.model.as_deref())?;

    let result = eval::evaluate(backend.as_ref(), &sample)?;
    output::print_evaluation(backend.name(), &result);
    Ok(())
}

fn execute_compare(args: CompareArgs) -> Result<()> {
    let sample = load_sample(&args.data, args.sample_size, args.seed)?;

    let mut report = ComparisonReport::new();
    for choice in &args.backends {
        // A backend that cannot be constructed is reported and skipped; the
        // comparison proceeds with whatever remains.
        let backend = match build_backend(*choice, args.model.as_deref()) {
            Ok(backend) => backend,
            Err(err) => {
                eprintln!("Skipping {}: {err}", choice.as_str());
                continue;
            }
        };

        println!("Evaluating {}...", backend.name());
        let result = eval::evaluate(backend.as_ref(), &sample)?;
        report.insert(backend.name().to_string(), result);
    }

    if report.is_empty() {
        return Err(DestekError::config(
            "no backend could be constructed; nothing to compare",
        ));
    }

    output::print_comparison(&report);
    Ok(())
}

fn execute_chat(args: ChatArgs) -> Result<()> {
    let backend = build_backend(args.backend, args.model.as_deref())?;
    let mut session = ChatSession::new(backend, ResponseCatalog::builtin());
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }

    println!("destek chat ({}) — empty line or Ctrl-D to exit", session.backend_name());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        let reply = session.chat(message)?;
        println!(
            "[{} {:.2}] {}",
            reply.intent, reply.confidence, reply.response
        );
    }

    Ok(())
}
