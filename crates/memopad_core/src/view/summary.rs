//! One-line memo summaries for compact renderers.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Default summary width used by list renderers.
pub const SUMMARY_DEFAULT_CHARS: usize = 60;

/// Collapses whitespace runs and truncates to `max_chars` characters.
///
/// Truncated output ends with `...` (not counted in `max_chars`).
pub fn summarize_text(text: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let trimmed = collapsed.trim();
    let mut summary = trimmed.chars().take(max_chars).collect::<String>();
    if trimmed.chars().count() > max_chars {
        summary.push_str("...");
    }
    summary
}
