//! Keyword lists for completion detection.
//!
//! All matching is case-insensitive substring matching against
//! `lowercase(subject + " " + body)`. The lists are fixed; phrases are not
//! tokenized, so "not completed" also satisfies "completed".

use crate::types::Email;

/// Strong evidence that something was finished.
pub const COMPLETION_KEYWORDS: &[&str] = &[
    "completed",
    "done",
    "finished",
    "closed",
    "resolved",
    "accomplished",
    "wrapped up",
    "finalized",
    "submitted",
    "delivered",
    "sent",
    "uploaded",
    "signed",
    "executed",
];

/// Weak boosters: the email is talking about work items at all.
pub const CONTEXT_KEYWORDS: &[&str] = &["task", "action item", "to-do", "deliverable", "milestone"];

/// Counter-evidence.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "not completed",
    "incomplete",
    "pending",
    "waiting",
    "blocked",
    "delayed",
    "issue",
    "problem",
];

/// Prefix marking a matched keyword as counter-evidence.
pub const WARNING_MARKER: &str = "⚠️ ";

/// Lowercased `subject + " " + body`. Compute once per email.
pub fn email_search_text(email: &Email) -> String {
    format!("{} {}", email.subject, email.body).to_lowercase()
}

/// Keywords from `list` present in `text`, in list order, each at most once.
pub fn keywords_in<'a>(
    text: &'a str,
    list: &'static [&'static str],
) -> impl Iterator<Item = &'static str> + 'a {
    list.iter().copied().filter(move |kw| text.contains(kw))
}

pub fn has_completion_keyword(text: &str) -> bool {
    keywords_in(text, COMPLETION_KEYWORDS).next().is_some()
}

pub fn warning(keyword: &str) -> String {
    format!("{}{}", WARNING_MARKER, keyword)
}

pub fn is_warning(keyword: &str) -> bool {
    keyword.starts_with(WARNING_MARKER)
}
