//! Text normalization helpers shared by the segmenter and the aggregator.

use once_cell::sync::Lazy;
use regex::Regex;

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}\s*[.)\-]\s*").unwrap());
static ANY_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Unify line endings to `\n` and collapse runs of spaces and tabs into a
/// single space. Blank lines are kept because they delimit paragraphs.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    HORIZONTAL_WS.replace_all(&unified, " ").into_owned()
}

/// Turn a raw heading match into a clause title.
///
/// Strips a leading list marker, collapses internal whitespace and applies
/// [`title_case`]: `"12.  limitation of\nliability"` becomes
/// `"Limitation Of Liability"`.
pub fn clean_heading(raw: &str) -> String {
    let without_marker = LEADING_MARKER.replace(raw, "");
    let collapsed = ANY_WS.replace_all(&without_marker, " ");
    title_case(collapsed.trim())
}

/// Title-case `text` the way word processors do for headings: a cased
/// letter is upper-cased when the character before it is not a cased
/// letter, and lower-cased otherwise. Scripts without case pass through.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }
    out
}

/// Whitespace-collapsed prefix of `text`, at most `max_chars` characters.
pub fn short_summary(text: &str, max_chars: usize) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}
