//! Heuristic clause risk rules.
//!
//! A clause is checked by six independent topic detectors. Each detector
//! fires only when its trigger vocabulary appears somewhere in the
//! lower-cased clause body, and then emits zero or more [`RuleId`]s.
//!
//! # Scoring
//!
//! 1. Sum the configured weight of every hit. Duplicated hits count twice
//!    (`unlimited_liability` can be emitted by both the indemnity and the
//!    liability detector).
//! 2. Subtract the dampeners whose mitigating language is present, no
//!    matter which detectors fired. Floor at 0.
//! 3. Unless a severe rule fired, cap at [`SOFT_CAP`].
//! 4. Clamp to `0..=10`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clause::Clause;
use crate::weights::RuleWeights;

/// Ceiling applied to scores that contain no severe hit.
pub const SOFT_CAP: i64 = 6;

/// Highest possible clause score.
const MAX_SCORE: i64 = 10;

/// Payment terms longer than this many days are flagged.
const MAX_PAYMENT_DAYS: u32 = 45;

/// Notice periods shorter than this many days are flagged.
const MIN_NOTICE_DAYS: u32 = 15;

// ============================================================================
// Rule identifiers
// ============================================================================

/// Identifier of a heuristic risk pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    LiabilityDisclaimed,
    UnlimitedLiability,
    UnilateralIndemnity,
    LiabilityCapMissing,
    #[serde(rename = "payment_terms_gt_45d")]
    PaymentTermsGt45d,
    NoLateFee,
    UnilateralTermination,
    ShortNotice,
    NonIndianLaw,
    ForeignForum,
    ConfidentialityPerpetual,
}

impl RuleId {
    /// Every rule, in default-table order.
    pub const ALL: [RuleId; 11] = [
        RuleId::LiabilityDisclaimed,
        RuleId::UnlimitedLiability,
        RuleId::UnilateralIndemnity,
        RuleId::LiabilityCapMissing,
        RuleId::PaymentTermsGt45d,
        RuleId::NoLateFee,
        RuleId::UnilateralTermination,
        RuleId::ShortNotice,
        RuleId::NonIndianLaw,
        RuleId::ForeignForum,
        RuleId::ConfidentialityPerpetual,
    ];

    /// The identifier as written in rule hits and override files.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::LiabilityDisclaimed => "liability_disclaimed",
            RuleId::UnlimitedLiability => "unlimited_liability",
            RuleId::UnilateralIndemnity => "unilateral_indemnity",
            RuleId::LiabilityCapMissing => "liability_cap_missing",
            RuleId::PaymentTermsGt45d => "payment_terms_gt_45d",
            RuleId::NoLateFee => "no_late_fee",
            RuleId::UnilateralTermination => "unilateral_termination",
            RuleId::ShortNotice => "short_notice",
            RuleId::NonIndianLaw => "non_indian_law",
            RuleId::ForeignForum => "foreign_forum",
            RuleId::ConfidentialityPerpetual => "confidentiality_perpetual",
        }
    }

    /// Parse an identifier; `None` for unknown names.
    pub fn from_id(id: &str) -> Option<RuleId> {
        RuleId::ALL.iter().copied().find(|rule| rule.as_str() == id)
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleId::LiabilityDisclaimed => "One party disclaims all liability",
            RuleId::UnlimitedLiability => "Liability is unlimited or without limit",
            RuleId::UnilateralIndemnity => "Indemnity runs in one direction only",
            RuleId::LiabilityCapMissing => "Liability is discussed without any cap",
            RuleId::PaymentTermsGt45d => "Payment is due more than 45 days out",
            RuleId::NoLateFee => "No late fee or interest on overdue payment",
            RuleId::UnilateralTermination => "Only one party may terminate for convenience",
            RuleId::ShortNotice => "Termination notice is shorter than 15 days",
            RuleId::NonIndianLaw => "Governing law is not Indian law",
            RuleId::ForeignForum => "Disputes go to a foreign forum",
            RuleId::ConfidentialityPerpetual => "Confidentiality lasts forever",
        }
    }

    /// Severe rules lift the soft cap.
    pub fn is_severe(self) -> bool {
        matches!(self, RuleId::LiabilityDisclaimed | RuleId::UnlimitedLiability)
    }

    pub fn default_weight(self) -> i64 {
        match self {
            RuleId::LiabilityDisclaimed => 10,
            RuleId::UnlimitedLiability => 6,
            RuleId::UnilateralIndemnity => 4,
            RuleId::LiabilityCapMissing => 2,
            RuleId::PaymentTermsGt45d => 2,
            RuleId::NoLateFee => 1,
            RuleId::UnilateralTermination => 2,
            RuleId::ShortNotice => 1,
            RuleId::NonIndianLaw => 2,
            RuleId::ForeignForum => 1,
            RuleId::ConfidentialityPerpetual => 2,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Vocabulary
// ============================================================================

const INDEMNITY_TRIGGERS: &[&str] = &["indemn", "क्षतिपूर्ति"];
const MUTUAL_MARKERS: &[&str] = &["each party", "mutual", "दोनों पक्ष"];
const UNLIMITED_MARKERS: &[&str] = &["without limit", "unlimited", "no limit", "असीमित"];

const LIABILITY_TRIGGERS: &[&str] = &["liability", "देयता"];
const DISCLAIMER_MARKERS: &[&str] = &["no liability", "shall have no liability"];
const CAP_MARKERS: &[&str] = &["cap", "maximum", "limit of", "capped", "सीमा"];

const PAYMENT_TRIGGERS: &[&str] = &["payment", "fees", "invoice", "भुगतान", "शुल्क"];
const LATE_FEE_MARKERS: &[&str] = &["interest", "विलंब"];
const LATE_FEE_PHRASE: &str = "late fee";
const NEGATIONS: &[&str] = &["no", "without"];

const TERMINATION_TRIGGERS: &[&str] = &["termination", "समापन"];
const CONVENIENCE_MARKERS: &[&str] = &["for convenience", "may terminate"];
const RECIPROCITY_MARKERS: &[&str] = &["either party", "client", "both parties", "दोनों"];

const LAW_TRIGGERS: &[&str] = &["governing law", "jurisdiction", "प्रवर्तनीय", "अधिकार क्षेत्र"];
const INDIA_MARKERS: &[&str] = &["india", "भारतीय", "भारत"];
const FOREIGN_FORUMS: &[&str] = &["delaware", "new york", "california", "singapore", "london"];

const CONFIDENTIALITY_TRIGGERS: &[&str] = &["confidential", "गोपनीय"];
const PERPETUAL_MARKERS: &[&str] = &["perpetual", "indefinite"];

static PAYMENT_DAYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:within|net)?\s*(\d{2,3})\s*day").unwrap());
static NOTICE_DAYS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)notice(?:\s*period)?(?:\s+of)?\s*(\d{1,2})\s*day").unwrap()
});

/// Mitigating language that lowers a clause score.
struct Dampener {
    phrases: &'static [&'static str],
    amount: i64,
}

const DAMPENERS: &[Dampener] = &[
    // mutual obligations
    Dampener {
        phrases: MUTUAL_MARKERS,
        amount: 2,
    },
    // explicit caps
    Dampener {
        phrases: &["cap of", "capped at", "maximum liability", "aggregate cap"],
        amount: 2,
    },
    // reasonableness qualifiers
    Dampener {
        phrases: &["reasonable"],
        amount: 1,
    },
    // balanced termination
    Dampener {
        phrases: &["either party may terminate"],
        amount: 2,
    },
];

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// First day count captured by `pattern`.
fn day_count(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|days| days.as_str().parse().ok())
}

/// True if `before` ends with one of `words` as a whole word followed by a
/// single space ("... no ").
fn ends_with_word(before: &str, words: &[&str]) -> bool {
    let before = match before.strip_suffix(' ') {
        Some(before) => before,
        None => return false,
    };
    words.iter().any(|word| {
        before.strip_suffix(word).map_or(false, |rest| {
            rest.chars().last().map_or(true, |c| !c.is_alphanumeric())
        })
    })
}

/// Late-fee or interest language that is not negated ("no late fee").
fn has_late_fee_language(text: &str) -> bool {
    contains_any(text, LATE_FEE_MARKERS)
        || text
            .match_indices(LATE_FEE_PHRASE)
            .any(|(idx, _)| !ends_with_word(&text[..idx], NEGATIONS))
}

// ============================================================================
// Topic detectors
// ============================================================================

type Detector = fn(&str, &mut Vec<RuleId>);

/// Detectors in the order their hits are reported.
const DETECTORS: &[Detector] = &[
    detect_indemnity,
    detect_liability,
    detect_payment,
    detect_termination,
    detect_governing_law,
    detect_confidentiality,
];

fn detect_indemnity(t: &str, hits: &mut Vec<RuleId>) {
    if !contains_any(t, INDEMNITY_TRIGGERS) {
        return;
    }
    if !contains_any(t, MUTUAL_MARKERS) {
        hits.push(RuleId::UnilateralIndemnity);
    }
    if contains_any(t, UNLIMITED_MARKERS) {
        hits.push(RuleId::UnlimitedLiability);
    }
}

fn detect_liability(t: &str, hits: &mut Vec<RuleId>) {
    if !contains_any(t, LIABILITY_TRIGGERS) {
        return;
    }
    if contains_any(t, DISCLAIMER_MARKERS) {
        hits.push(RuleId::LiabilityDisclaimed);
    }
    if contains_any(t, UNLIMITED_MARKERS) {
        hits.push(RuleId::UnlimitedLiability);
    }
    if !contains_any(t, CAP_MARKERS) {
        hits.push(RuleId::LiabilityCapMissing);
    }
}

fn detect_payment(t: &str, hits: &mut Vec<RuleId>) {
    if !contains_any(t, PAYMENT_TRIGGERS) {
        return;
    }
    if day_count(&PAYMENT_DAYS, t).map_or(false, |days| days > MAX_PAYMENT_DAYS) {
        hits.push(RuleId::PaymentTermsGt45d);
    }
    if !has_late_fee_language(t) {
        hits.push(RuleId::NoLateFee);
    }
}

fn detect_termination(t: &str, hits: &mut Vec<RuleId>) {
    if !contains_any(t, TERMINATION_TRIGGERS) {
        return;
    }
    if contains_any(t, CONVENIENCE_MARKERS) && !contains_any(t, RECIPROCITY_MARKERS) {
        hits.push(RuleId::UnilateralTermination);
    }
    if day_count(&NOTICE_DAYS, t).map_or(false, |days| days < MIN_NOTICE_DAYS) {
        hits.push(RuleId::ShortNotice);
    }
}

fn detect_governing_law(t: &str, hits: &mut Vec<RuleId>) {
    if !contains_any(t, LAW_TRIGGERS) {
        return;
    }
    if !contains_any(t, INDIA_MARKERS) {
        hits.push(RuleId::NonIndianLaw);
    }
    if contains_any(t, FOREIGN_FORUMS) {
        hits.push(RuleId::ForeignForum);
    }
}

fn detect_confidentiality(t: &str, hits: &mut Vec<RuleId>) {
    if !contains_any(t, CONFIDENTIALITY_TRIGGERS) {
        return;
    }
    // "अवधि" (term) together with "हमेशा" (forever)
    let perpetual_hi = t.contains("अवधि") && t.contains("हमेशा");
    if contains_any(t, PERPETUAL_MARKERS) || perpetual_hi {
        hits.push(RuleId::ConfidentialityPerpetual);
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Score and rule hits for one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    /// Final score, 0..=10
    pub score: u8,
    /// Triggered rules in detection order, duplicates kept
    pub hits: Vec<RuleId>,
}

/// Scores clauses against a fixed set of rules and an immutable weight
/// table.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    weights: RuleWeights,
}

impl RuleEngine {
    pub fn new(weights: RuleWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RuleWeights {
        &self.weights
    }

    /// Assess a clause. Pure: depends only on `clause.text` and the weights.
    pub fn score(&self, clause: &Clause) -> RiskAssessment {
        self.score_text(&clause.text)
    }

    /// Assess a raw clause body.
    pub fn score_text(&self, text: &str) -> RiskAssessment {
        let t = text.to_lowercase();

        let mut hits = Vec::new();
        for detect in DETECTORS {
            detect(&t, &mut hits);
        }

        let score = self.combine(&t, &hits);
        RiskAssessment { score, hits }
    }

    /// Score `clause` and store the result on it.
    pub fn apply(&self, clause: &mut Clause) {
        let RiskAssessment { score, hits } = self.score(clause);
        clause.risk = score;
        clause.rule_hits = hits;
    }

    fn combine(&self, t: &str, hits: &[RuleId]) -> u8 {
        // Override weights are unbounded, so every step saturates.
        let raw = hits
            .iter()
            .fold(0i64, |acc, hit| acc.saturating_add(self.weights.get(*hit)));
        let dampening: i64 = DAMPENERS
            .iter()
            .filter(|dampener| contains_any(t, dampener.phrases))
            .map(|dampener| dampener.amount)
            .sum();

        let mut total = raw.saturating_sub(dampening).max(0);
        if !hits.iter().any(|hit| hit.is_severe()) {
            total = total.min(SOFT_CAP);
        }
        total.clamp(0, MAX_SCORE) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip() {
        for id in RuleId::ALL {
            assert_eq!(RuleId::from_id(id.as_str()), Some(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert_eq!(RuleId::from_id("nope"), None);
    }

    #[test]
    fn negated_late_fee() {
        assert!(!has_late_fee_language("no late fee applies"));
        assert!(!has_late_fee_language("payable without late fee"));
        assert!(has_late_fee_language("a late fee of 2% applies"));
        assert!(has_late_fee_language("piano late fee"));
        assert!(has_late_fee_language("no late fee, but interest accrues"));
    }

    #[test]
    fn day_counts() {
        assert_eq!(day_count(&PAYMENT_DAYS, "net 60 days"), Some(60));
        assert_eq!(day_count(&PAYMENT_DAYS, "within 120 days"), Some(120));
        assert_eq!(day_count(&PAYMENT_DAYS, "within 7 days"), None);
        assert_eq!(day_count(&NOTICE_DAYS, "notice period 7 days"), Some(7));
        assert_eq!(day_count(&NOTICE_DAYS, "notice of 10 days"), Some(10));
        assert_eq!(day_count(&NOTICE_DAYS, "30 days notice"), None);
    }
}
