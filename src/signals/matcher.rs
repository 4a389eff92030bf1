//! Fuzzy task-name matching.
//!
//! Word-overlap ratio with bidirectional substring containment. No edit
//! distance and no stemming; containment in either direction absorbs simple
//! prefix/suffix variation ("submit" vs "submitted").

/// Fraction of `pattern`'s whitespace-separated words that appear in `text`.
///
/// A pattern word matches a text word when either contains the other.
/// Returns a ratio in `[0.0, 1.0]`; an empty pattern scores 0.0.
pub fn fuzzy_match(text: &str, pattern: &str) -> f64 {
    let pattern_words: Vec<&str> = pattern.split_whitespace().collect();
    if pattern_words.is_empty() {
        return 0.0;
    }

    let text_words: Vec<&str> = text.split_whitespace().collect();
    let matched = pattern_words
        .iter()
        .filter(|pw| {
            text_words
                .iter()
                .any(|tw| tw.contains(**pw) || pw.contains(*tw))
        })
        .count();

    matched as f64 / pattern_words.len() as f64
}
