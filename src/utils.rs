//! Small string helpers shared across the pipeline.
//!
//! Scraped pages and captions are Portuguese text, so every truncation here
//! cuts on `char` boundaries rather than bytes.

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the ends.
///
/// Scraped text nodes arrive with the page's original indentation and line
/// breaks; the caption and the summarizer input both want one flat line.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hard-truncate a string to at most `max` characters.
///
/// The cut lands exactly at the character budget; no attempt is made to
/// preserve word boundaries.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a byte-count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head = truncate_chars(s, max);
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}
