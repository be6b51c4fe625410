//! Sentence splitting for the sentence-level segmentation fallback.
//!
//! Boundaries come from Unicode sentence segmentation (UAX #29), which
//! already understands `?`, `!` and the Devanagari danda. Pieces that end
//! in a known abbreviation ("Dr.", "Inc.", "e.g.") are glued back onto the
//! following piece.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Splits text into trimmed, non-empty sentences.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    abbreviations: HashSet<String>,
}

impl SentenceSplitter {
    pub fn new() -> Self {
        // Common abbreviations that should NOT end a sentence
        let common_abbrevs = [
            "dr", "mr", "mrs", "ms", "prof", "sr", "jr",
            "inc", "ltd", "corp", "co", "llc", "pvt", "llp",
            "e.g", "i.e", "vs", "etc", "approx", "no", "viz",
            "u.s", "u.k", "p.m", "a.m",
            "st", "ave", "blvd", "dept", "fig", "sec", "cl",
        ];

        SentenceSplitter {
            abbreviations: common_abbrevs.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn with_custom_abbreviations(mut self, abbreviations: &[&str]) -> Self {
        for abbrev in abbreviations {
            self.abbreviations
                .insert(abbrev.trim_end_matches('.').to_lowercase());
        }
        self
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut pending = String::new();

        for piece in text.split_sentence_bounds() {
            pending.push_str(piece);
            let candidate = pending.trim();
            if candidate.is_empty() || self.ends_with_abbreviation(candidate) {
                continue;
            }
            sentences.push(candidate.to_string());
            pending.clear();
        }

        let rest = pending.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }

    fn ends_with_abbreviation(&self, text: &str) -> bool {
        let stripped = match text.strip_suffix('.') {
            Some(stripped) => stripped,
            None => return false,
        };
        let last_word = stripped.rsplit(char::is_whitespace).next().unwrap_or("");
        let normalized = last_word
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        self.abbreviations.contains(&normalized)
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_sentences() {
        let splitter = SentenceSplitter::new();
        assert_eq!(
            splitter.split("Hello world. Goodbye! How are you?"),
            vec!["Hello world.", "Goodbye!", "How are you?"]
        );
    }

    #[test]
    fn abbreviations_do_not_split() {
        let splitter = SentenceSplitter::new();
        assert_eq!(
            splitter.split("Dr. Smith signed for Acme Inc. Mr. Jones witnessed it."),
            vec!["Dr. Smith signed for Acme Inc. Mr. Jones witnessed it."]
        );
    }

    #[test]
    fn custom_abbreviations() {
        let splitter = SentenceSplitter::new().with_custom_abbreviations(&["Art."]);
        assert_eq!(
            splitter.split("See Art. Four for details. Then sign."),
            vec!["See Art. Four for details.", "Then sign."]
        );
    }

    #[test]
    fn devanagari_danda() {
        let splitter = SentenceSplitter::new();
        assert_eq!(
            splitter.split("पहला वाक्य। दूसरा वाक्य।"),
            vec!["पहला वाक्य।", "दूसरा वाक्य।"]
        );
    }

    #[test]
    fn whitespace_only() {
        assert!(SentenceSplitter::new().split(" \n\t ").is_empty());
        assert!(SentenceSplitter::new().split("").is_empty());
    }
}
