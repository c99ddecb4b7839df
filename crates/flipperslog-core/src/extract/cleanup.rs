//! Cleanup stages applied to a model response before JSON parsing.
//!
//! Every stage is unconditional and leaves its input untouched when the
//! pattern it targets is absent.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Fence opener at the very start: ``` plus optional language tag, then newline
    static ref FENCE_OPEN: Regex = Regex::new(
        r"^```[A-Za-z0-9_+.\-]*[ \t]*\r?\n"
    ).unwrap();

    // Fence closer at the very end: newline, then ```
    static ref FENCE_CLOSE: Regex = Regex::new(
        r"\r?\n```$"
    ).unwrap();
}

/// Remove a leading fence opener and a trailing fence closer.
///
/// Fences occurring inside the text are left alone.
pub fn strip_code_fence(text: &str) -> &str {
    let start = FENCE_OPEN.find(text).map(|m| m.end()).unwrap_or(0);
    let rest = &text[start..];
    let end = FENCE_CLOSE.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    &rest[..end]
}

/// Remove any leading or trailing run of backticks.
pub fn strip_backtick_runs(text: &str) -> &str {
    text.trim_matches('`')
}

/// Span from the first `{` to the last `}`, inclusive.
///
/// Returns `None` when the text has no `{`. When no `}` follows the first
/// `{`, the span runs to the end of the text so that parsing reports the
/// truncation.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}
