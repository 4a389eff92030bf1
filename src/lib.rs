//! Task completion detection for deal workflows.
//!
//! Scans inbound email for evidence that open tasks are done and produces
//! ranked, explainable suggestions for human review.

pub mod error;
pub mod json_loader;
pub mod services;
pub mod signals;
pub mod state;
pub mod types;

pub use signals::{
    extract_completion_date, fuzzy_match, scan_emails, validate_signal, CompletionDetector,
};
