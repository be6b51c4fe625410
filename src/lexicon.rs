//! Clause heading vocabulary and the matchers built from it.
//!
//! Two fixed vocabularies (English and Hindi) are compiled into two regex
//! families:
//!
//! - **strong**: the phrase starts a line, optionally after a numeric list
//!   marker (`12.`, `3)`, `4-`)
//! - **loose**: the phrase appears anywhere as a whole word
//!
//! Both are case-insensitive and expose the matched heading (marker
//! included) through the `head` capture group.

use once_cell::sync::Lazy;
use regex::Regex;

/// English clause headings.
pub const EN_HEADINGS: &[&str] = &[
    "Definitions",
    "Term",
    "Term and Termination",
    "Termination",
    "Payment",
    "Payment Terms",
    "Fees",
    "Confidentiality",
    "Intellectual Property",
    "IP",
    "Indemnity",
    "Limitation of Liability",
    "Liability",
    "Governing Law",
    "Jurisdiction",
    "Dispute Resolution",
    "Arbitration",
    "Non-Compete",
    "Non Solicitation",
    "Force Majeure",
    "Scope",
    "Services",
    "Deliverables",
];

/// Hindi clause headings.
pub const HI_HEADINGS: &[&str] = &[
    "परिभाषाएँ",
    "अवधि",
    "समापन",
    "भुगतान",
    "गोपनीयता",
    "बौद्धिक संपदा",
    "क्षतिपूर्ति",
    "देयता की सीमा",
    "प्रवर्तनीय क़ानून",
    "अधिकार क्षेत्र",
    "विवाद निपटान",
    "मध्यस्थता",
    "बलपूर्वक",
];

/// Optional numeric list marker in front of a heading: `12.`, `3)`, `4-`.
const LIST_MARKER: &str = r"(?:\d{1,2}\s*[.)\-]\s*)?";

static DEFAULT_LEXICON: Lazy<HeadingLexicon> =
    Lazy::new(|| HeadingLexicon::from_phrases(EN_HEADINGS.iter().chain(HI_HEADINGS)));

/// Compiled heading matchers.
#[derive(Debug, Clone)]
pub struct HeadingLexicon {
    strong: Regex,
    loose: Regex,
}

impl HeadingLexicon {
    /// The built-in English + Hindi lexicon, compiled once per process.
    pub fn global() -> &'static HeadingLexicon {
        &DEFAULT_LEXICON
    }

    /// Build matchers for an arbitrary set of heading phrases.
    ///
    /// Alternatives are tried in the given order and the first one that
    /// ends on a word boundary wins, so with the built-in vocabulary
    /// "Term and Termination" is read as the heading "Term" followed by body
    /// text.
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::compile(normalized_phrases(phrases))
    }

    /// Like [`HeadingLexicon::from_phrases`], but longer phrases are tried
    /// first so that "Term and Termination" is not shadowed by "Term".
    pub fn longest_first<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases = normalized_phrases(phrases);
        phrases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        Self::compile(phrases)
    }

    fn compile(phrases: Vec<String>) -> Self {
        let alternation = phrases
            .iter()
            .map(|phrase| regex::escape(phrase))
            .collect::<Vec<_>>()
            .join("|");
        // An empty vocabulary must never match anything.
        let alternation = if alternation.is_empty() {
            r"\b\B".to_string()
        } else {
            alternation
        };

        let strong = Regex::new(&format!(
            r"(?mi)^(?P<head>{}(?:{}))\b",
            LIST_MARKER, alternation
        ))
        .expect("escaped heading alternation is a valid regex");
        let loose = Regex::new(&format!(
            r"(?i)(?P<head>{}(?:{}))\b",
            LIST_MARKER, alternation
        ))
        .expect("escaped heading alternation is a valid regex");

        Self { strong, loose }
    }

    /// Line-anchored heading matcher.
    pub fn strong(&self) -> &Regex {
        &self.strong
    }

    /// Unanchored whole-word heading matcher.
    pub fn loose(&self) -> &Regex {
        &self.loose
    }
}

/// Trimmed, non-empty phrases with later duplicates removed.
fn normalized_phrases<I, S>(phrases: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();
    for phrase in phrases {
        let phrase = phrase.as_ref().trim();
        if !phrase.is_empty() && !unique.iter().any(|seen| seen == phrase) {
            unique.push(phrase.to_string());
        }
    }
    unique
}

impl Default for HeadingLexicon {
    fn default() -> Self {
        Self::global().clone()
    }
}

/// Returns true if `text` contains any Devanagari code point.
pub fn is_hindi(text: &str) -> bool {
    text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads(re: &Regex, text: &str) -> Vec<String> {
        re.captures_iter(text)
            .map(|caps| caps["head"].to_string())
            .collect()
    }

    #[test]
    fn strong_requires_line_start() {
        let lexicon = HeadingLexicon::global();
        let text = "1. Payment\nThe Client pays.\nSee the Payment section.";
        assert_eq!(heads(lexicon.strong(), text), vec!["1. Payment"]);
        assert_eq!(
            heads(lexicon.loose(), text),
            vec!["1. Payment", "Payment"]
        );
    }

    #[test]
    fn list_marker_variants() {
        let lexicon = HeadingLexicon::global();
        let text = "12. Fees\n3) Scope\n4- Services\n";
        assert_eq!(
            heads(lexicon.strong(), text),
            vec!["12. Fees", "3) Scope", "4- Services"]
        );
    }

    #[test]
    fn case_insensitive_whole_word() {
        let lexicon = HeadingLexicon::global();
        assert_eq!(heads(lexicon.strong(), "GOVERNING LAW\n"), vec!["GOVERNING LAW"]);
        // "Terms" is not the heading "Term"
        assert!(heads(lexicon.strong(), "Terms of use\n").is_empty());
    }

    #[test]
    fn vocabulary_order_wins() {
        let lexicon = HeadingLexicon::global();
        assert_eq!(
            heads(lexicon.strong(), "Term and Termination\nbody"),
            vec!["Term"]
        );
        assert_eq!(heads(lexicon.strong(), "Payment Terms\nbody"), vec!["Payment"]);
        assert_eq!(
            heads(lexicon.strong(), "Limitation of Liability\nbody"),
            vec!["Limitation of Liability"]
        );
    }

    #[test]
    fn longest_first_is_opt_in() {
        let lexicon = HeadingLexicon::longest_first(EN_HEADINGS);
        assert_eq!(
            heads(lexicon.strong(), "Term and Termination\nbody"),
            vec!["Term and Termination"]
        );
        assert_eq!(
            heads(lexicon.strong(), "Payment Terms\nbody"),
            vec!["Payment Terms"]
        );
    }

    #[test]
    fn duplicate_phrases_keep_first_position() {
        assert_eq!(
            normalized_phrases([" Term ", "Payment", "Term", ""]),
            vec!["Term", "Payment"]
        );
    }

    #[test]
    fn hindi_headings() {
        let lexicon = HeadingLexicon::global();
        let text = "भुगतान\nसाठ दिनों में।\nगोपनीयता\nजानकारी गोपनीय रहेगी।";
        assert_eq!(heads(lexicon.strong(), text), vec!["भुगतान", "गोपनीयता"]);
        assert!(is_hindi(text));
        assert!(!is_hindi("Payment"));
    }

    #[test]
    fn empty_vocabulary_matches_nothing() {
        let lexicon = HeadingLexicon::from_phrases(Vec::<String>::new());
        assert!(!lexicon.strong().is_match("Payment\n"));
        assert!(!lexicon.loose().is_match("anything at all"));
    }
}
