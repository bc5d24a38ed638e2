use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Samples ---

/// One aggregate sentiment measurement. Produced once per scoring cycle,
/// consumed immediately by delivery, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSample {
    /// Aggregate positivity in [0, 1].
    #[serde(rename = "sentiment")]
    pub score: f64,
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
}

impl SentimentSample {
    /// Stamp a score with the current instant.
    pub fn now(score: f64) -> Self {
        Self {
            score,
            timestamp: Utc::now(),
        }
    }
}

// --- Classification ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Positive,
    Negative,
}

/// Per-item classifier output: a label and its confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    pub confidence: f64,
}

/// Remap a labeled confidence onto a single [0, 1] positivity axis,
/// where 1 is maximally positive and 0 maximally negative.
pub fn positivity(result: &ClassificationResult) -> f64 {
    match result.label {
        Label::Positive => result.confidence,
        Label::Negative => 1.0 - result.confidence,
    }
}

/// Mean positivity over a batch of classification results.
/// Returns `None` for an empty batch — no sample is produced that cycle.
pub fn aggregate_score(results: &[ClassificationResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let total: f64 = results.iter().map(positivity).sum();
    Some(total / results.len() as f64)
}
