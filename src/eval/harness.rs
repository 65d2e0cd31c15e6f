//! Batch evaluation of a backend over a labeled sample.

use crate::backend::ClassifierBackend;
use crate::dataset::LabeledExample;
use crate::error::Result;
use crate::eval::{EvaluationResult, metrics};

/// Run `backend` over the sample in input order and score the predictions.
///
/// The harness does no exception handling of its own: the remote and
/// zero-shot backends never error per-call by contract, so a flaky network
/// shows up as depressed accuracy, not as an aborted run. The one error that
/// does propagate is the trained backend's not-fitted precondition, which is
/// a caller bug.
///
/// Remote-backed evaluation is slow by design (one round trip plus pacing
/// delay per example); keep samples in the tens.
pub fn evaluate(
    backend: &dyn ClassifierBackend,
    sample: &[LabeledExample],
) -> Result<EvaluationResult> {
    let mut predicted_intents = Vec::with_capacity(sample.len());
    let mut true_intents = Vec::with_capacity(sample.len());

    for (index, example) in sample.iter().enumerate() {
        if index % 10 == 0 {
            log::info!("evaluating {}: {}/{}", backend.name(), index, sample.len());
        }

        let result = backend.classify(&example.text)?;
        predicted_intents.push(result.intent);
        true_intents.push(example.intent);
    }

    let accuracy = metrics::accuracy(&true_intents, &predicted_intents);
    let (precision, recall, f1_score) =
        metrics::weighted_precision_recall_f1(&true_intents, &predicted_intents);

    Ok(EvaluationResult {
        accuracy,
        precision,
        recall,
        f1_score,
        predicted_intents,
        true_intents,
    })
}
