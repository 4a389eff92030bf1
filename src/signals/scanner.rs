//! Batch scan: every email against every open task.
//!
//! Emails without a single completion keyword are skipped outright. Survivors
//! are scored per open task and kept when they clear the scan threshold, which
//! sits on top of the scorer's own reject threshold. Output is stable-sorted
//! by descending confidence, so equal scores keep email-then-task order.
//!
//! O(|emails| x |tasks|) with no indexing; callers bound both batches.

use crate::types::{CompletionSignal, Email, Task};

use super::lexicon::{email_search_text, has_completion_keyword};
use super::scoring::CompletionDetector;

impl CompletionDetector {
    /// Scan a batch of emails for completion evidence against `tasks`.
    ///
    /// Completed tasks are never scored. Identical inputs give identical,
    /// identically ordered output.
    pub fn scan_emails(&self, emails: &[Email], tasks: &[Task]) -> Vec<CompletionSignal> {
        let min_confidence = self.config().thresholds.scan_min_confidence;
        let open_tasks: Vec<&Task> = tasks.iter().filter(|t| !t.status.is_complete()).collect();

        let mut signals = Vec::new();
        let mut skipped = 0usize;

        for email in emails {
            let text = email_search_text(email);
            if !has_completion_keyword(&text) {
                skipped += 1;
                log::debug!("scan_emails: email {} has no completion keyword", email.id);
                continue;
            }

            for task in &open_tasks {
                match self.match_to_task(email, task, &text) {
                    Some(signal) if signal.confidence >= min_confidence => signals.push(signal),
                    Some(signal) => log::debug!(
                        "scan_emails: dropping {} for task {} (confidence {} < {})",
                        email.id,
                        task.id,
                        signal.confidence,
                        min_confidence
                    ),
                    None => {}
                }
            }
        }

        signals.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        log::info!(
            "scan_emails: {} signals from {} emails ({} skipped) against {} open tasks",
            signals.len(),
            emails.len(),
            skipped,
            open_tasks.len()
        );

        signals
    }
}

/// Scan with the default configuration.
pub fn scan_emails(emails: &[Email], tasks: &[Task]) -> Vec<CompletionSignal> {
    CompletionDetector::default().scan_emails(emails, tasks)
}
