//! Per-(email, task) completion scoring.
//!
//! Accumulates an integer confidence from name, deal, and person evidence,
//! then adjusts it by keyword hits:
//! 1. Task name fuzzy match (strong or partial)
//! 2. Linked deal/property name mentioned
//! 3. Assignee is sender or recipient
//! 4. +N per distinct completion keyword
//! 5. +N per distinct context keyword (not recorded)
//! 6. -N per distinct negative keyword (always recorded, with warning marker)
//!
//! Anything under the reject threshold is dropped; the rest is capped at 100.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::types::{CompletionSignal, ConfidenceTier, DetectionConfig, Email, MatchType, Task};

use super::lexicon::{
    is_warning, keywords_in, warning, COMPLETION_KEYWORDS, CONTEXT_KEYWORDS, NEGATIVE_KEYWORDS,
};
use super::matcher::fuzzy_match;

/// Stateless detection engine. Holds only immutable configuration and is
/// cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct CompletionDetector {
    config: Arc<DetectionConfig>,
}

impl CompletionDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Score one email against one task.
    ///
    /// `email_text` must be `lexicon::email_search_text(email)`; callers
    /// compute it once per email and reuse it across tasks.
    pub fn match_to_task(
        &self,
        email: &Email,
        task: &Task,
        email_text: &str,
    ) -> Option<CompletionSignal> {
        let weights = &self.config.weights;
        let thresholds = &self.config.thresholds;

        // Saturating: weights from an unvalidated config must not wrap.
        let mut confidence: i32 = 0;
        let mut match_types: Vec<MatchType> = Vec::new();
        let mut matched_keywords: Vec<String> = Vec::new();

        // 1. Task name
        let ratio = fuzzy_match(email_text, &task.name.to_lowercase());
        if ratio > thresholds.strong_name_ratio {
            confidence = confidence.saturating_add(weights.name_strong);
            match_types.push(MatchType::Name);
            matched_keywords.push(format!("task name: \"{}\"", task.name));
        } else if ratio > thresholds.partial_name_ratio {
            confidence = confidence.saturating_add(weights.name_partial);
            match_types.push(MatchType::Name);
            matched_keywords.push("partial task name match".to_string());
        }

        // 2. Deal / property
        let entity = task.linked_entity.name.to_lowercase();
        if !entity.is_empty() && email_text.contains(&entity) {
            confidence = confidence.saturating_add(weights.deal);
            match_types.push(MatchType::Deal);
            matched_keywords.push(format!("deal: \"{}\"", task.linked_entity.name));
        }

        // 3. Assigned person
        if involves_person(email, &task.assigned_to.name) {
            confidence = confidence.saturating_add(weights.person);
            match_types.push(MatchType::Person);
            matched_keywords.push(format!("person: \"{}\"", task.assigned_to.name));
        }

        // 4. Completion keywords
        for keyword in keywords_in(email_text, COMPLETION_KEYWORDS) {
            confidence = confidence.saturating_add(weights.completion_keyword);
            if !matched_keywords.iter().any(|k| k == keyword) {
                matched_keywords.push(keyword.to_string());
            }
        }

        // 5. Context keywords
        let context_hits = keywords_in(email_text, CONTEXT_KEYWORDS).count() as i32;
        confidence =
            confidence.saturating_add(context_hits.saturating_mul(weights.context_keyword));

        // 6. Negative keywords
        for keyword in keywords_in(email_text, NEGATIVE_KEYWORDS) {
            confidence = confidence.saturating_sub(weights.negative_keyword);
            matched_keywords.push(warning(keyword));
        }

        if confidence < thresholds.scorer_reject {
            log::debug!(
                "match_to_task: email {} / task {} rejected at {}",
                email.id,
                task.id,
                confidence
            );
            return None;
        }

        let confidence = confidence.clamp(0, 100) as u8;

        // No recorded match type means the score came from keywords alone;
        // such signals are still labelled as name matches.
        let matched_by = match match_types.as_slice() {
            [] => MatchType::Name,
            [single] => *single,
            _ => MatchType::Multiple,
        };

        let reasoning = self.build_reasoning(confidence, &match_types, &matched_keywords);

        Some(CompletionSignal {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            email_id: email.id.clone(),
            email_subject: email.subject.clone(),
            completion_date: extract_completion_date(email),
            confidence,
            matched_keywords,
            matched_by,
            sender: email.sender.clone(),
            reasoning,
        })
    }

    fn build_reasoning(
        &self,
        confidence: u8,
        match_types: &[MatchType],
        matched_keywords: &[String],
    ) -> String {
        let tier = ConfidenceTier::for_confidence(confidence, &self.config.thresholds);

        let clauses: Vec<&str> = match_types.iter().filter_map(|m| m.reason_clause()).collect();
        let mut reasoning = if clauses.is_empty() {
            format!("{} confidence: keyword evidence only", tier.label())
        } else {
            format!("{} confidence: {}", tier.label(), clauses.join(", "))
        };

        let highlights: Vec<&str> = matched_keywords
            .iter()
            .filter(|k| !is_warning(k))
            .take(3)
            .map(String::as_str)
            .collect();
        if !highlights.is_empty() {
            reasoning.push_str(". Keywords: ");
            reasoning.push_str(&highlights.join(", "));
        }

        reasoning
    }
}

/// True when the assignee's name appears in the sender or any recipient.
fn involves_person(email: &Email, assignee_name: &str) -> bool {
    let needle = assignee_name.to_lowercase();
    if needle.is_empty() {
        return false;
    }
    email.sender.to_lowercase().contains(&needle)
        || email
            .recipients
            .iter()
            .any(|r| r.to_lowercase().contains(&needle))
}

/// Suggested completion date for a signal: the email's own timestamp.
pub fn extract_completion_date(email: &Email) -> DateTime<Utc> {
    email.timestamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::lexicon::email_search_text;
    use crate::signals::test_utils::{make_email, make_task};

    fn score(email: &Email, task: &Task) -> Option<CompletionSignal> {
        let detector = CompletionDetector::default();
        detector.match_to_task(email, task, &email_search_text(email))
    }

    #[test]
    fn test_name_and_completion_keywords() {
        let task = make_task("t1", "Submit Phase I Environmental Report");
        let email = make_email(
            "e1",
            "Update",
            "Hi all, the Phase I environmental report for the site has been completed and submitted to the lender.",
        );
        let signal = score(&email, &task).expect("signal");
        assert_eq!(signal.confidence, 60);
        assert_eq!(signal.matched_by, MatchType::Name);
        assert_eq!(
            signal.matched_keywords,
            vec![
                "task name: \"Submit Phase I Environmental Report\"".to_string(),
                "completed".to_string(),
                "submitted".to_string(),
            ]
        );
    }

    #[test]
    fn test_keyword_alone_is_rejected() {
        let task = make_task("t1", "Order zoning letter");
        let email = make_email("e1", "Fwd", "I submitted the form yesterday.");
        assert!(score(&email, &task).is_none());
    }

    #[test]
    fn test_deal_and_person_resolve_to_multiple() {
        let task = make_task("t1", "Order zoning letter");
        let mut email = make_email("e1", "Maple Plaza", "All wrapped up on my side.");
        email.sender = "Dana Reyes <dana@brokerage.com>".to_string();
        let signal = score(&email, &task).expect("signal");
        // deal 25 + person 15 + "wrapped up" 5
        assert_eq!(signal.confidence, 45);
        assert_eq!(signal.matched_by, MatchType::Multiple);
        assert!(signal
            .reasoning
            .contains("Email mentions related deal/property, Email from/to assigned person"));
    }

    #[test]
    fn test_person_match_through_recipients() {
        let task = make_task("t1", "Order zoning letter");
        let mut email = make_email("e1", "Maple Plaza", "Finished.");
        email.recipients = vec!["ops@firm.com".to_string(), "DANA REYES <dana@firm.com>".to_string()];
        let signal = score(&email, &task).expect("signal");
        assert!(signal
            .matched_keywords
            .contains(&"person: \"Dana Reyes\"".to_string()));
    }

    #[test]
    fn test_negative_keyword_penalizes_and_is_recorded() {
        let task = make_task("t1", "Order zoning letter");
        let email = make_email(
            "e1",
            "Maple Plaza zoning letter",
            "The zoning letter was ordered but delivery is delayed.",
        );
        let signal = score(&email, &task).expect("signal");
        // name 50 + deal 25 - delayed 20
        assert_eq!(signal.confidence, 55);
        assert!(signal.matched_keywords.contains(&"⚠️ delayed".to_string()));
    }

    #[test]
    fn test_not_completed_fires_both_boost_and_penalty() {
        let task = make_task("t1", "Order zoning letter");
        let email = make_email(
            "e1",
            "Maple Plaza zoning letter",
            "Ordering the zoning letter is not completed yet.",
        );
        let signal = score(&email, &task).expect("signal");
        // name 50 + deal 25 + completed 5 - not completed 20
        assert_eq!(signal.confidence, 60);
        assert!(signal.matched_keywords.contains(&"completed".to_string()));
        assert!(signal
            .matched_keywords
            .contains(&"⚠️ not completed".to_string()));
    }

    #[test]
    fn test_keyword_only_signal_defaults_to_name() {
        let task = make_task("t1", "Order zoning letter");
        let email = make_email(
            "e1",
            "Status",
            "Completed, done, finished, closed, resolved, accomplished.",
        );
        let signal = score(&email, &task).expect("signal");
        assert_eq!(signal.confidence, 30);
        assert_eq!(signal.matched_by, MatchType::Name);
        assert!(signal.reasoning.starts_with("🟠 Low confidence: keyword evidence only"));
    }

    #[test]
    fn test_confidence_capped_at_100() {
        let task = make_task("t1", "Order zoning letter");
        let mut email = make_email(
            "e1",
            "Maple Plaza zoning letter",
            "Zoning letter ordered, completed, finished, delivered, uploaded and signed. Milestone task done.",
        );
        email.sender = "dana reyes".to_string();
        let signal = score(&email, &task).expect("signal");
        assert_eq!(signal.confidence, 100);
        assert!(signal.reasoning.starts_with("🟢 High confidence"));
    }

    #[test]
    fn test_reasoning_lists_first_three_plain_keywords() {
        let task = make_task("t1", "Order zoning letter");
        let email = make_email(
            "e1",
            "Maple Plaza zoning letter",
            "Ordered and delivered, signed, uploaded. Still waiting on the invoice.",
        );
        let signal = score(&email, &task).expect("signal");
        // name 50 + deal 25 + delivered/uploaded/signed 15 - waiting 20
        assert_eq!(signal.confidence, 70);
        assert_eq!(
            signal.reasoning,
            "🟡 Medium confidence: Email mentions task name, Email mentions related deal/property. \
             Keywords: task name: \"Order zoning letter\", deal: \"Maple Plaza\", delivered"
        );
    }

    #[test]
    fn test_partial_name_match() {
        let task = make_task("t1", "Collect rent roll estoppels");
        let email = make_email("e1", "Rent roll", "Rent roll uploaded.");
        let signal = score(&email, &task).expect("signal");
        // partial name 30 + uploaded 5
        assert_eq!(signal.confidence, 35);
        assert_eq!(signal.matched_keywords[0], "partial task name match");
    }

    #[test]
    fn test_context_keywords_boost_without_being_recorded() {
        let task = make_task("t1", "Order zoning letter");
        let email = make_email("e1", "Maple Plaza", "Done. milestone task");
        let signal = score(&email, &task).expect("signal");
        // deal 25 + done 5 + milestone 3 + task 3
        assert_eq!(signal.confidence, 36);
        assert_eq!(
            signal.matched_keywords,
            vec!["deal: \"Maple Plaza\"".to_string(), "done".to_string()]
        );
        assert!(!signal.matched_keywords.iter().any(|k| k == "milestone" || k == "task"));
    }

    #[test]
    fn test_huge_weights_saturate_instead_of_overflowing() {
        let mut config = DetectionConfig::default();
        config.weights.name_strong = i32::MAX;
        config.weights.deal = i32::MAX;
        let detector = CompletionDetector::new(config);
        let task = make_task("t1", "Order zoning letter");
        let email = make_email("e1", "Maple Plaza zoning letter", "Zoning letter ordered, done.");
        let signal = detector
            .match_to_task(&email, &task, &email_search_text(&email))
            .expect("signal");
        assert_eq!(signal.confidence, 100);
    }

    #[test]
    fn test_completion_date_is_email_timestamp() {
        let email = make_email("e1", "s", "b");
        assert_eq!(extract_completion_date(&email), email.timestamp);
    }

    #[test]
    fn test_custom_weights_apply() {
        let mut config = DetectionConfig::default();
        config.weights.deal = 40;
        let detector = CompletionDetector::new(config);
        let task = make_task("t1", "Order zoning letter");
        let email = make_email("e1", "Maple Plaza", "Done.");
        let signal = detector
            .match_to_task(&email, &task, &email_search_text(&email))
            .expect("signal");
        assert_eq!(signal.confidence, 45);
        assert_eq!(signal.matched_by, MatchType::Deal);
    }
}
