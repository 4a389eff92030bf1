// Completion suggestions service.
// Wraps the detection core for the review UI: scan and bucket by tier, then
// apply or reject individual suggestions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ServiceError;
use crate::signals::CompletionDetector;
use crate::types::{CompletionSignal, ConfidenceTier, DetectionConfig, Email, Task};

/// Task persistence as seen by the suggestion actions.
pub trait TaskStore {
    fn get_task(&self, id: &str) -> Result<Option<Task>, String>;
    fn mark_complete(&self, id: &str, completed_at: DateTime<Utc>) -> Result<(), String>;
}

/// Scan results bucketed for display. Each bucket keeps scan order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSuggestions {
    pub high: Vec<CompletionSignal>,
    pub medium: Vec<CompletionSignal>,
    pub low: Vec<CompletionSignal>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCompletion {
    pub task_id: String,
    pub email_id: String,
    pub completed_at: DateTime<Utc>,
    pub confidence: u8,
}

/// A declined suggestion, handed to whatever records reviewer feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRejection {
    pub task_id: String,
    pub email_id: String,
    pub confidence: u8,
    pub matched_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub rejected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionService {
    detector: CompletionDetector,
}

impl CompletionService {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            detector: CompletionDetector::new(config),
        }
    }

    pub fn detector(&self) -> &CompletionDetector {
        &self.detector
    }

    /// Scan and bucket suggestions into high/medium/low tiers.
    ///
    /// `min_confidence` is an extra display floor on top of the scan threshold.
    /// Never actually suspends.
    pub async fn scan(
        &self,
        emails: &[Email],
        tasks: &[Task],
        min_confidence: Option<u8>,
    ) -> CompletionSuggestions {
        let floor = min_confidence.unwrap_or(0);
        let thresholds = &self.detector.config().thresholds;

        let mut suggestions = CompletionSuggestions::default();
        for signal in self.detector.scan_emails(emails, tasks) {
            if signal.confidence < floor {
                continue;
            }
            match ConfidenceTier::for_confidence(signal.confidence, thresholds) {
                ConfidenceTier::High => suggestions.high.push(signal),
                ConfidenceTier::Medium => suggestions.medium.push(signal),
                ConfidenceTier::Low => suggestions.low.push(signal),
            }
            suggestions.total += 1;
        }

        log::info!(
            "completion scan: {} suggestions ({} high, {} medium, {} low)",
            suggestions.total,
            suggestions.high.len(),
            suggestions.medium.len(),
            suggestions.low.len()
        );

        suggestions
    }

    /// Validate a suggestion and, if it holds, mark its task complete.
    pub fn apply_suggestion(
        &self,
        store: &dyn TaskStore,
        signal: &CompletionSignal,
    ) -> Result<AppliedCompletion, ServiceError> {
        let validation = self.detector.validate_signal(signal);
        if !validation.valid {
            let reason = validation.reason.unwrap_or_default();
            log::warn!(
                "apply_suggestion: refusing task {} from email {}: {}",
                signal.task_id,
                signal.email_id,
                reason
            );
            return Err(ServiceError::InvalidSuggestion(reason));
        }

        let task = store
            .get_task(&signal.task_id)
            .map_err(ServiceError::Store)?
            .ok_or_else(|| ServiceError::TaskNotFound(signal.task_id.clone()))?;

        if task.status.is_complete() {
            return Err(ServiceError::TaskAlreadyComplete(task.id));
        }

        store
            .mark_complete(&task.id, signal.completion_date)
            .map_err(ServiceError::Store)?;

        log::info!(
            "apply_suggestion: task {} completed from email {} ({}%)",
            task.id,
            signal.email_id,
            signal.confidence
        );

        Ok(AppliedCompletion {
            task_id: task.id,
            email_id: signal.email_id.clone(),
            completed_at: signal.completion_date,
            confidence: signal.confidence,
        })
    }

    /// Record that a reviewer declined a suggestion. Nothing here consumes
    /// the record; scoring weights are fixed.
    pub fn reject_suggestion(
        &self,
        signal: &CompletionSignal,
        note: Option<&str>,
    ) -> SuggestionRejection {
        let validation = self.detector.validate_signal(signal);
        log::info!(
            "reject_suggestion: task {} / email {} at {}% (validator said {})",
            signal.task_id,
            signal.email_id,
            signal.confidence,
            validation.reason.as_deref().unwrap_or("valid")
        );

        SuggestionRejection {
            task_id: signal.task_id.clone(),
            email_id: signal.email_id.clone(),
            confidence: signal.confidence,
            matched_keywords: signal.matched_keywords.clone(),
            note: note.map(str::to_string),
            rejected_at: Utc::now(),
        }
    }
}
