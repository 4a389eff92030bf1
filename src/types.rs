use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Inbound records
// =============================================================================

/// An inbound email as delivered by the mail sync layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    pub subject: String,
    pub body: String,
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Workflow status of a deal task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Blocked,
    Complete,
}

impl TaskStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, TaskStatus::Complete)
    }
}

/// The deal or property a task hangs off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub user_id: String,
    pub name: String,
}

/// Snapshot of an open (or closed) workflow task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub linked_entity: LinkedEntity,
    pub assigned_to: Assignee,
}

// =============================================================================
// Detection output
// =============================================================================

/// Which evidence category drove a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Name,
    Deal,
    Person,
    Multiple,
}

impl MatchType {
    /// Human-readable clause used in a signal's reasoning. `Multiple` is a
    /// summary of other types and has no clause of its own.
    pub fn reason_clause(self) -> Option<&'static str> {
        match self {
            MatchType::Name => Some("Email mentions task name"),
            MatchType::Deal => Some("Email mentions related deal/property"),
            MatchType::Person => Some("Email from/to assigned person"),
            MatchType::Multiple => None,
        }
    }
}

/// Evidence linking one email to the probable completion of one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSignal {
    pub task_id: String,
    pub task_name: String,
    pub email_id: String,
    pub email_subject: String,
    pub completion_date: DateTime<Utc>,
    /// Confidence in [0, 100].
    pub confidence: u8,
    pub matched_keywords: Vec<String>,
    pub matched_by: MatchType,
    pub sender: String,
    pub reasoning: String,
}

/// Outcome of the pre-action gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Display bucket for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn for_confidence(confidence: u8, thresholds: &Thresholds) -> Self {
        if confidence >= thresholds.high_tier {
            ConfidenceTier::High
        } else if confidence >= thresholds.medium_tier {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::High => "🟢 High",
            ConfidenceTier::Medium => "🟡 Medium",
            ConfidenceTier::Low => "🟠 Low",
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Tunables for the detection pipeline, loaded from `~/.taskscan/config.json`.
///
/// Every field has a serde default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub weights: Weights,
}

/// Cut-offs applied at each pipeline stage. Scan-time and validation-time
/// values are independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    /// Scorer drops anything below this.
    #[serde(default = "default_scorer_reject")]
    pub scorer_reject: i32,
    /// Scanner keeps only signals at or above this.
    #[serde(default = "default_scan_min_confidence")]
    pub scan_min_confidence: u8,
    #[serde(default = "default_validator_min_confidence")]
    pub validator_min_confidence: u8,
    /// Signals carrying a negative keyword need at least this much confidence.
    #[serde(default = "default_validator_negative_min_confidence")]
    pub validator_negative_min_confidence: u8,
    #[serde(default = "default_strong_name_ratio")]
    pub strong_name_ratio: f64,
    #[serde(default = "default_partial_name_ratio")]
    pub partial_name_ratio: f64,
    #[serde(default = "default_high_tier")]
    pub high_tier: u8,
    #[serde(default = "default_medium_tier")]
    pub medium_tier: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            scorer_reject: default_scorer_reject(),
            scan_min_confidence: default_scan_min_confidence(),
            validator_min_confidence: default_validator_min_confidence(),
            validator_negative_min_confidence: default_validator_negative_min_confidence(),
            strong_name_ratio: default_strong_name_ratio(),
            partial_name_ratio: default_partial_name_ratio(),
            high_tier: default_high_tier(),
            medium_tier: default_medium_tier(),
        }
    }
}

fn default_scorer_reject() -> i32 {
    30
}

fn default_scan_min_confidence() -> u8 {
    40
}

fn default_validator_min_confidence() -> u8 {
    40
}

fn default_validator_negative_min_confidence() -> u8 {
    70
}

fn default_strong_name_ratio() -> f64 {
    0.7
}

fn default_partial_name_ratio() -> f64 {
    0.4
}

fn default_high_tier() -> u8 {
    80
}

fn default_medium_tier() -> u8 {
    60
}

/// Points contributed by each piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    #[serde(default = "default_name_strong")]
    pub name_strong: i32,
    #[serde(default = "default_name_partial")]
    pub name_partial: i32,
    #[serde(default = "default_deal")]
    pub deal: i32,
    #[serde(default = "default_person")]
    pub person: i32,
    #[serde(default = "default_completion_keyword")]
    pub completion_keyword: i32,
    #[serde(default = "default_context_keyword")]
    pub context_keyword: i32,
    /// Subtracted once per negative keyword present.
    #[serde(default = "default_negative_keyword")]
    pub negative_keyword: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            name_strong: default_name_strong(),
            name_partial: default_name_partial(),
            deal: default_deal(),
            person: default_person(),
            completion_keyword: default_completion_keyword(),
            context_keyword: default_context_keyword(),
            negative_keyword: default_negative_keyword(),
        }
    }
}

fn default_name_strong() -> i32 {
    50
}

fn default_name_partial() -> i32 {
    30
}

fn default_deal() -> i32 {
    25
}

fn default_person() -> i32 {
    15
}

fn default_completion_keyword() -> i32 {
    5
}

fn default_context_keyword() -> i32 {
    3
}

fn default_negative_keyword() -> i32 {
    20
}

impl DetectionConfig {
    /// Reject settings that would make the pipeline incoherent.
    pub fn validate(&self) -> Result<(), String> {
        let t = &self.thresholds;
        for (name, ratio) in [
            ("strongNameRatio", t.strong_name_ratio),
            ("partialNameRatio", t.partial_name_ratio),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(format!("{} must be within 0.0..=1.0, got {}", name, ratio));
            }
        }
        if t.partial_name_ratio > t.strong_name_ratio {
            return Err(format!(
                "partialNameRatio ({}) exceeds strongNameRatio ({})",
                t.partial_name_ratio, t.strong_name_ratio
            ));
        }
        if t.medium_tier > t.high_tier {
            return Err(format!(
                "mediumTier ({}) exceeds highTier ({})",
                t.medium_tier, t.high_tier
            ));
        }
        if !(0..=100).contains(&t.scorer_reject) {
            return Err(format!("scorerReject must be within 0..=100, got {}", t.scorer_reject));
        }
        for (name, value) in [
            ("scanMinConfidence", t.scan_min_confidence),
            ("validatorMinConfidence", t.validator_min_confidence),
            ("validatorNegativeMinConfidence", t.validator_negative_min_confidence),
            ("highTier", t.high_tier),
            ("mediumTier", t.medium_tier),
        ] {
            if value > 100 {
                return Err(format!("{} must be at most 100, got {}", name, value));
            }
        }
        let w = &self.weights;
        for (name, value) in [
            ("nameStrong", w.name_strong),
            ("namePartial", w.name_partial),
            ("deal", w.deal),
            ("person", w.person),
            ("completionKeyword", w.completion_keyword),
            ("contextKeyword", w.context_keyword),
            ("negativeKeyword", w.negative_keyword),
        ] {
            if !(0..=100).contains(&value) {
                return Err(format!("weight {} must be within 0..=100, got {}", name, value));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: DetectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DetectionConfig::default());
        assert_eq!(config.thresholds.scorer_reject, 30);
        assert_eq!(config.thresholds.scan_min_confidence, 40);
        assert_eq!(config.thresholds.validator_negative_min_confidence, 70);
        assert_eq!(config.weights.name_strong, 50);
        assert_eq!(config.weights.negative_keyword, 20);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{"thresholds":{"scanMinConfidence":55}}"#).unwrap();
        assert_eq!(config.thresholds.scan_min_confidence, 55);
        assert_eq!(config.thresholds.scorer_reject, 30);
        assert_eq!(config.weights, Weights::default());
    }

    #[test]
    fn test_validate_rejects_inverted_ratios() {
        let mut config = DetectionConfig::default();
        config.thresholds.partial_name_ratio = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_tiers() {
        let mut config = DetectionConfig::default();
        config.thresholds.medium_tier = 90;
        let err = config.validate().unwrap_err();
        assert!(err.contains("mediumTier"));
    }

    #[test]
    fn test_validate_rejects_oversized_weights() {
        let mut config = DetectionConfig::default();
        config.weights.name_strong = i32::MAX;
        config.weights.deal = i32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.contains("nameStrong"), "got {}", err);
    }

    #[test]
    fn test_validate_rejects_negative_weights() {
        let mut config = DetectionConfig::default();
        config.weights.completion_keyword = -40;
        let err = config.validate().unwrap_err();
        assert!(err.contains("completionKeyword"), "got {}", err);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_tier_boundaries() {
        let t = Thresholds::default();
        assert_eq!(ConfidenceTier::for_confidence(80, &t), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::for_confidence(79, &t), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::for_confidence(60, &t), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::for_confidence(59, &t), ConfidenceTier::Low);
    }

    #[test]
    fn test_task_deserializes_from_camel_case() {
        let json = r#"{
            "id": "t1",
            "name": "Order title commitment",
            "status": "in_progress",
            "linkedEntity": {"id": "d1", "name": "Maple Plaza", "type": "deal"},
            "assignedTo": {"userId": "u1", "name": "Dana Reyes"}
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.linked_entity.entity_type, "deal");
        assert!(task.description.is_none());
    }

    #[test]
    fn test_email_recipients_default_to_empty() {
        let json = r#"{
            "id": "e1",
            "subject": "Re: closing",
            "body": "done",
            "sender": "a@b.com",
            "timestamp": "2026-03-02T15:04:05Z"
        }"#;
        let email: Email = serde_json::from_str(json).unwrap();
        assert!(email.recipients.is_empty());
    }
}
