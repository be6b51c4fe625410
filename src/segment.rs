//! Clause segmentation.
//!
//! Text is normalized once and then handed to an ordered list of
//! [`Strategy`] tiers. The first tier that produces at least one clause
//! (after its own filtering) wins, so a later tier only runs when every
//! earlier one came back empty:
//!
//! | tier | ids | titles |
//! |---|---|---|
//! | [`Strategy::StrongHeadings`] | `c1..` | cleaned heading |
//! | [`Strategy::LooseHeadings`] | `c1..` | cleaned heading |
//! | [`Strategy::Paragraphs`] | `p1..` | `Clause N` |
//! | [`Strategy::Sentences`] | `s1..` | `Clause N` |
//! | [`Strategy::WholeDocument`] | `c1` | `Contract` |
//!
//! [`Strategy::WholeDocument`] never comes back empty, which makes
//! segmentation total.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::clause::Clause;
use crate::lexicon::HeadingLexicon;
use crate::normalize::{clean_heading, normalize_whitespace};
use crate::sentence::SentenceSplitter;

/// Loose-heading spans with a shorter body are treated as accidental
/// in-sentence matches.
pub const DEFAULT_MIN_LOOSE_BODY_CHARS: usize = 40;

/// Paragraphs grouped into one clause by the paragraph tier.
pub const DEFAULT_PARAGRAPHS_PER_CHUNK: usize = 3;

/// Title of the single clause produced by [`Strategy::WholeDocument`].
const WHOLE_DOCUMENT_TITLE: &str = "Contract";

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Characters stripped between a heading and its body.
fn is_heading_separator(c: char) -> bool {
    matches!(c, ' ' | ':' | '-' | '\n' | '\r' | '\t')
}

/// One segmentation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Headings at the start of a line
    StrongHeadings,
    /// Headings anywhere, short bodies filtered out
    LooseHeadings,
    /// Blank-line separated paragraphs, grouped into chunks
    Paragraphs,
    /// One clause per sentence
    Sentences,
    /// The whole document as one clause
    WholeDocument,
}

impl Strategy {
    /// Tiers in the order they are tried.
    pub const ORDER: [Strategy; 5] = [
        Strategy::StrongHeadings,
        Strategy::LooseHeadings,
        Strategy::Paragraphs,
        Strategy::Sentences,
        Strategy::WholeDocument,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::StrongHeadings => "strong_headings",
            Strategy::LooseHeadings => "loose_headings",
            Strategy::Paragraphs => "paragraphs",
            Strategy::Sentences => "sentences",
            Strategy::WholeDocument => "whole_document",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunable segmentation constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// See [`DEFAULT_MIN_LOOSE_BODY_CHARS`]; counted in characters
    pub min_loose_body_chars: usize,
    /// See [`DEFAULT_PARAGRAPHS_PER_CHUNK`]; values below 1 are treated as 1
    pub paragraphs_per_chunk: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_loose_body_chars: DEFAULT_MIN_LOOSE_BODY_CHARS,
            paragraphs_per_chunk: DEFAULT_PARAGRAPHS_PER_CHUNK,
        }
    }
}

/// Clauses together with the tier that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub strategy: Strategy,
    pub clauses: Vec<Clause>,
}

/// A heading-delimited block before ids are assigned.
#[derive(Debug, Clone)]
struct Block {
    title: String,
    body: String,
}

/// Splits contract text into clauses.
#[derive(Debug, Clone)]
pub struct Segmenter {
    lexicon: HeadingLexicon,
    config: SegmenterConfig,
    sentences: SentenceSplitter,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            lexicon: HeadingLexicon::default(),
            config: SegmenterConfig::default(),
            sentences: SentenceSplitter::default(),
        }
    }

    pub fn with_config(mut self, config: SegmenterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_lexicon(mut self, lexicon: HeadingLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_sentence_splitter(mut self, sentences: SentenceSplitter) -> Self {
        self.sentences = sentences;
        self
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Split `text` into clauses. Never returns an empty vector.
    pub fn segment(&self, text: &str) -> Vec<Clause> {
        self.segment_detailed(text).clauses
    }

    /// Like [`Segmenter::segment`], also reporting the winning tier.
    pub fn segment_detailed(&self, text: &str) -> Segmentation {
        let normalized = normalize_whitespace(text);

        for strategy in Strategy::ORDER {
            let clauses = self.run(strategy, &normalized);
            if !clauses.is_empty() {
                debug!(%strategy, clauses = clauses.len(), "segmented document");
                return Segmentation { strategy, clauses };
            }
        }

        // WholeDocument always yields a clause; kept for exhaustiveness.
        Segmentation {
            strategy: Strategy::WholeDocument,
            clauses: self.whole_document(&normalized),
        }
    }

    /// Run a single tier on already normalized text.
    pub fn run(&self, strategy: Strategy, normalized: &str) -> Vec<Clause> {
        match strategy {
            Strategy::StrongHeadings => self.strong_headings(normalized),
            Strategy::LooseHeadings => self.loose_headings(normalized),
            Strategy::Paragraphs => self.paragraphs(normalized),
            Strategy::Sentences => self.sentence_clauses(normalized),
            Strategy::WholeDocument => self.whole_document(normalized),
        }
    }

    fn strong_headings(&self, text: &str) -> Vec<Clause> {
        let blocks = split_at_headings(text, self.lexicon.strong());
        number_blocks(blocks)
    }

    fn loose_headings(&self, text: &str) -> Vec<Clause> {
        let mut blocks = split_at_headings(text, self.lexicon.loose());

        if blocks.len() > 1 {
            let min = self.config.min_loose_body_chars;
            let kept: Vec<Block> = blocks
                .iter()
                .filter(|block| block.body.chars().count() >= min)
                .cloned()
                .collect();
            // Filtering never empties the tier.
            if !kept.is_empty() {
                blocks = kept;
            }
        }

        number_blocks(blocks)
    }

    fn paragraphs(&self, text: &str) -> Vec<Clause> {
        let paragraphs: Vec<&str> = PARAGRAPH_BREAK
            .split(text)
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .collect();

        // A single paragraph means there is no blank-line structure.
        if paragraphs.len() < 2 {
            return Vec::new();
        }

        paragraphs
            .chunks(self.config.paragraphs_per_chunk.max(1))
            .enumerate()
            .map(|(idx, chunk)| {
                Clause::new(
                    format!("p{}", idx + 1),
                    format!("Clause {}", idx + 1),
                    chunk.join("\n\n"),
                )
            })
            .collect()
    }

    fn sentence_clauses(&self, text: &str) -> Vec<Clause> {
        let sentences = self.sentences.split(text);
        if sentences.len() < 2 {
            return Vec::new();
        }

        sentences
            .into_iter()
            .enumerate()
            .map(|(idx, sentence)| {
                Clause::new(format!("s{}", idx + 1), format!("Clause {}", idx + 1), sentence)
            })
            .collect()
    }

    fn whole_document(&self, text: &str) -> Vec<Clause> {
        vec![Clause::new("c1", WHOLE_DOCUMENT_TITLE, text)]
    }
}

/// Partition `text` at every heading match. Text before the first heading
/// belongs to no block. Consecutive blocks with the same title are merged.
fn split_at_headings(text: &str, pattern: &Regex) -> Vec<Block> {
    let heads: Vec<(usize, &str)> = pattern
        .captures_iter(text)
        .filter_map(|caps| caps.name("head"))
        .map(|head| (head.start(), head.as_str()))
        .collect();

    let mut blocks: Vec<Block> = Vec::new();
    for (idx, &(start, raw_head)) in heads.iter().enumerate() {
        let end = heads.get(idx + 1).map_or(text.len(), |(next, _)| *next);
        let span = text[start..end].trim();
        let body = span
            .strip_prefix(raw_head)
            .unwrap_or(span)
            .trim_start_matches(is_heading_separator);
        let title = clean_heading(raw_head);

        match blocks.last_mut() {
            Some(prev) if prev.title == title => {
                let merged = format!("{}\n{}", prev.body, body);
                prev.body = merged.trim().to_string();
            }
            _ => blocks.push(Block {
                title,
                body: body.to_string(),
            }),
        }
    }
    blocks
}

fn number_blocks(blocks: Vec<Block>) -> Vec<Clause> {
    blocks
        .into_iter()
        .enumerate()
        .map(|(idx, block)| Clause::new(format!("c{}", idx + 1), block.title, block.body))
        .collect()
}
