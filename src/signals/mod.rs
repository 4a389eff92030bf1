//! Task completion detection.
//!
//! Scans inbound email for evidence that an open deal task has been
//! completed. The lexicon and fuzzy matcher feed a per-(email, task) scorer;
//! the scanner applies it across a batch and the validator is a stricter
//! gate run before a suggestion is acted on. Everything here is pure and
//! synchronous.

pub mod lexicon;
pub mod matcher;
pub mod scanner;
pub mod scoring;
pub mod validation;

pub use matcher::fuzzy_match;
pub use scanner::scan_emails;
pub use scoring::{extract_completion_date, CompletionDetector};
pub use validation::validate_signal;
