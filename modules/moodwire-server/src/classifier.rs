//! Per-headline sentiment classification.

use moodwire_common::{ClassificationResult, Label, MoodwireError};

/// Classifier collaborator: maps one text item to a label and confidence.
/// Implementations must be deterministic per call.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<ClassificationResult, MoodwireError>;
}

const POSITIVE_WORDS: &[&str] = &[
    "advance", "beat", "boom", "boost", "bullish", "climb", "confident", "expand", "gain",
    "growth", "high", "hope", "improve", "jump", "optimism", "profit", "rally", "rebound",
    "record", "recovery", "rise", "soar", "strong", "success", "surge", "upbeat", "upgrade",
    "win",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "bankruptcy", "bearish", "collapse", "crash", "crisis", "cut", "decline", "deficit",
    "downgrade", "drop", "fail", "fall", "fear", "fraud", "layoff", "loss", "miss", "plunge",
    "recession", "risk", "scandal", "shortage", "sink", "slump", "tumble", "warning", "weak",
];

/// Deterministic lexicon scorer over embedded word lists.
///
/// Confidence is the majority share of sentiment-bearing words; text with no
/// sentiment-bearing words scores positive at the neutral midpoint (0.5).
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<ClassificationResult, MoodwireError> {
        if text.trim().is_empty() {
            return Err(MoodwireError::Classification(
                "empty text item".to_string(),
            ));
        }

        let mut positive = 0u32;
        let mut negative = 0u32;
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_ascii_lowercase();
            if POSITIVE_WORDS.contains(&word.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                negative += 1;
            }
        }

        let total = positive + negative;
        if total == 0 {
            return Ok(ClassificationResult {
                label: Label::Positive,
                confidence: 0.5,
            });
        }

        let (label, hits) = if positive >= negative {
            (Label::Positive, positive)
        } else {
            (Label::Negative, negative)
        };

        Ok(ClassificationResult {
            label,
            confidence: f64::from(hits) / f64::from(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_headline_labeled_positive() {
        let c = LexiconClassifier::new();
        let result = c.classify("Markets rally as profits surge to record high").unwrap();
        assert_eq!(result.label, Label::Positive);
        assert!(result.confidence > 0.5);
        assert!(result.confidence <= 1.0);
    }

    #[test]
    fn negative_headline_labeled_negative() {
        let c = LexiconClassifier::new();
        let result = c.classify("Shares plunge after fraud scandal and layoffs").unwrap();
        assert_eq!(result.label, Label::Negative);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn neutral_headline_scores_midpoint() {
        let c = LexiconClassifier::new();
        let result = c.classify("Committee schedules quarterly meeting").unwrap();
        assert_eq!(result.label, Label::Positive);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = LexiconClassifier::new();
        let a = c.classify("Stocks fall on recession fears").unwrap();
        let b = c.classify("Stocks fall on recession fears").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn case_and_punctuation_insensitive() {
        let c = LexiconClassifier::new();
        let a = c.classify("RALLY! Rally, rally.").unwrap();
        assert_eq!(a.label, Label::Positive);
        assert_eq!(a.confidence, 1.0);
    }

    #[test]
    fn empty_text_is_a_classification_error() {
        let c = LexiconClassifier::new();
        assert!(c.classify("").is_err());
        assert!(c.classify("   ").is_err());
    }
}
