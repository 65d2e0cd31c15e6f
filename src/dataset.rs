//! Labeled dataset records and loading.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DestekError, Result};
use crate::intent::Intent;

/// One labeled utterance from the evaluation corpus. Immutable input; the
/// core never mutates dataset records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub intent: Intent,
}

/// Load labeled examples from a JSON file (an array of `{text, intent}`
/// records). Records with labels outside the intent set fail parsing, which
/// is intentional: a dataset with invented labels cannot be evaluated
/// meaningfully.
pub fn load_examples(path: &Path) -> Result<Vec<LabeledExample>> {
    let content = std::fs::read_to_string(path)?;
    let examples: Vec<LabeledExample> = serde_json::from_str(&content)?;
    if examples.is_empty() {
        return Err(DestekError::dataset(format!(
            "no examples in {}",
            path.display()
        )));
    }
    Ok(examples)
}

/// Count examples per intent.
pub fn label_distribution(examples: &[LabeledExample]) -> HashMap<Intent, usize> {
    let mut distribution = HashMap::new();
    for example in examples {
        *distribution.entry(example.intent).or_insert(0) += 1;
    }
    distribution
}
