//! Named-entity tagging for clause bodies.
//!
//! Entities are reported as display strings of the form `"value (KIND)"`,
//! in text order.

use once_cell::sync::Lazy;
use regex::Regex;

/// Entity categories kept in the analysis output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Date,
    Money,
    Org,
    Gpe,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Date => "DATE",
            EntityKind::Money => "MONEY",
            EntityKind::Org => "ORG",
            EntityKind::Gpe => "GPE",
        }
    }

    /// Display string stored on a clause report.
    pub fn tag(self, value: &str) -> String {
        format!("{} ({})", value, self.label())
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Extracts tagged entities from one clause body.
pub trait EntityExtractor {
    fn entities(&self, text: &str) -> Vec<String>;
}

impl<E: EntityExtractor + ?Sized> EntityExtractor for Box<E> {
    fn entities(&self, text: &str) -> Vec<String> {
        (**self).entities(text)
    }
}

/// Extractor that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntities;

impl EntityExtractor for NoEntities {
    fn entities(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sep|sept|oct|nov|dec";

/// Places recognized by name.
const PLACES: &[&str] = &[
    "India",
    "New Delhi",
    "Delhi",
    "Mumbai",
    "Bengaluru",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Hyderabad",
    "Pune",
    "Ahmedabad",
    "Gurugram",
    "Noida",
    "Maharashtra",
    "Karnataka",
    "Tamil Nadu",
    "Telangana",
    "Gujarat",
    "Delaware",
    "New York",
    "California",
    "Singapore",
    "London",
    "England",
    "Wales",
    "United States",
    "United Kingdom",
    "Dubai",
    "Hong Kong",
];

static DEFAULT_PATTERNS: Lazy<Vec<(EntityKind, Regex)>> = Lazy::new(|| {
    let dates = [
        // 1st January 2024, 5 Mar, 2025
        format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{months})\.?,?\s+\d{{4}}\b", months = MONTHS),
        // January 1, 2024
        format!(r"(?i)\b(?:{months})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b", months = MONTHS),
        // 01/02/2024, 1-2-24, 01.02.2024
        r"\b\d{1,2}[/.\-]\d{1,2}[/.\-](?:\d{4}|\d{2})\b".to_string(),
        // 60 days, 30 business days, 12 months
        r"(?i)\b\d{1,3}\s*(?:business\s+|working\s+|calendar\s+)?(?:days?|weeks?|months?|years?)\b"
            .to_string(),
    ];
    let money = [
        r"(?i)(?:₹|\brs\.?|\binr\b|\busd\b|us\$|\$|€|£)\s?\d[\d,]*(?:\.\d+)?(?:\s*(?:lakhs?|crores?|million|thousand)\b)?"
            .to_string(),
        r"(?i)\b\d[\d,]*(?:\.\d+)?\s*(?:lakhs?|crores?)\b".to_string(),
    ];
    let orgs = [
        r"\b(?:[A-Z][A-Za-z0-9&'\-]*\s+)+(?:Private\s+Limited|Pvt\.?\s*Ltd\.?|Limited|Ltd\.?|LLP|LLC|Inc\.?|Corp\.?|Corporation|Company)"
            .to_string(),
    ];
    let mut places: Vec<&str> = PLACES.to_vec();
    places.sort_by_key(|place| std::cmp::Reverse(place.len()));
    let alternation = places
        .iter()
        .map(|place| regex::escape(place))
        .collect::<Vec<_>>()
        .join("|");
    let gpe = format!(r"\b(?:{})\b", alternation);

    let mut patterns = Vec::new();
    for pattern in dates {
        patterns.push((EntityKind::Date, pattern));
    }
    for pattern in money {
        patterns.push((EntityKind::Money, pattern));
    }
    for pattern in orgs {
        patterns.push((EntityKind::Org, pattern));
    }
    patterns.push((EntityKind::Gpe, gpe));

    patterns
        .into_iter()
        .map(|(kind, pattern)| {
            let regex = Regex::new(&pattern).expect("entity pattern must compile");
            (kind, regex)
        })
        .collect()
});

/// A match before overlap resolution.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    kind: EntityKind,
}

/// Regex and gazetteer based tagger for dates, amounts, companies and
/// places.
///
/// Overlapping matches resolve to the one that starts first; among those,
/// the longest wins, and among equally long ones the earlier pattern.
#[derive(Debug, Clone)]
pub struct PatternEntityExtractor {
    patterns: Vec<(EntityKind, Regex)>,
}

impl Default for PatternEntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternEntityExtractor {
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
        }
    }

    /// Add a pattern tried after the built-in ones.
    pub fn with_pattern(mut self, kind: EntityKind, pattern: Regex) -> Self {
        self.patterns.push((kind, pattern));
        self
    }

    fn candidates(&self, text: &str) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .patterns
            .iter()
            .flat_map(|(kind, regex)| {
                regex.find_iter(text).map(move |m| Candidate {
                    start: m.start(),
                    end: m.end(),
                    kind: *kind,
                })
            })
            .filter(|candidate| candidate.end > candidate.start)
            .collect();

        // Stable: ties keep pattern order.
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        candidates
    }
}

impl EntityExtractor for PatternEntityExtractor {
    fn entities(&self, text: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut covered_until = 0;
        for candidate in self.candidates(text) {
            if candidate.start < covered_until {
                continue;
            }
            let value = text[candidate.start..candidate.end].trim();
            found.push(candidate.kind.tag(value));
            covered_until = candidate.end;
        }
        found
    }
}
