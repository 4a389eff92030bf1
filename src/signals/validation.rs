//! Pre-action gate for completion suggestions.
//!
//! Runs independently of scanning, right before a suggestion is applied or
//! rejected. First failing rule wins.

use crate::types::{CompletionSignal, ValidationResult};

use super::lexicon::is_warning;
use super::scoring::CompletionDetector;

impl CompletionDetector {
    pub fn validate_signal(&self, signal: &CompletionSignal) -> ValidationResult {
        let thresholds = &self.config().thresholds;

        if signal.confidence < thresholds.validator_min_confidence {
            return ValidationResult::invalid("Confidence too low");
        }

        if signal.matched_keywords.is_empty() {
            return ValidationResult::invalid("No matching keywords found");
        }

        let has_negative = signal.matched_keywords.iter().any(|k| is_warning(k));
        if has_negative && signal.confidence < thresholds.validator_negative_min_confidence {
            return ValidationResult::invalid("Negative keywords detected with low confidence");
        }

        ValidationResult::valid()
    }
}

/// Validate with the default configuration.
pub fn validate_signal(signal: &CompletionSignal) -> ValidationResult {
    CompletionDetector::default().validate_signal(signal)
}
