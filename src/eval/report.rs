//! Ranked comparison of per-backend evaluation results.

use crate::eval::EvaluationResult;

/// Comparison table: one row per backend, ranked by F1 when queried.
///
/// Rows keep insertion order. The winner is the row with the maximum F1
/// score; on an exact tie the earliest inserted row wins, so comparisons are
/// deterministic regardless of score distribution. A single-row table is
/// valid, it just is not much of a comparison.
#[derive(Debug, Clone, Default)]
pub struct ComparisonReport {
    rows: Vec<(String, EvaluationResult)>,
}

impl ComparisonReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one backend's result. Names are not deduplicated; callers
    /// evaluate each backend once per run.
    pub fn insert(&mut self, name: impl Into<String>, result: EvaluationResult) {
        self.rows.push((name.into(), result));
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[(String, EvaluationResult)] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The backend with the strictly highest F1 score; ties go to the
    /// earliest inserted row.
    pub fn best_backend(&self) -> Option<(&str, &EvaluationResult)> {
        let mut best: Option<&(String, EvaluationResult)> = None;
        for row in &self.rows {
            match best {
                None => best = Some(row),
                Some(current) if row.1.f1_score > current.1.f1_score => best = Some(row),
                _ => {}
            }
        }
        best.map(|(name, result)| (name.as_str(), result))
    }

    /// Render the table as aligned text with one metrics row per backend.
    pub fn to_table(&self) -> String {
        let name_width = self
            .rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Backend".len());

        let mut table = format!(
            "{:<name_width$}  {:>8}  {:>9}  {:>8}  {:>8}\n",
            "Backend", "Accuracy", "Precision", "Recall", "F1"
        );
        for (name, result) in &self.rows {
            table.push_str(&format!(
                "{:<name_width$}  {:>8.3}  {:>9.3}  {:>8.3}  {:>8.3}\n",
                name, result.accuracy, result.precision, result.recall, result.f1_score
            ));
        }
        table
    }
}
