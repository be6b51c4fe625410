//! Clause records and the aggregate analysis output.

use serde::{Deserialize, Serialize};

use crate::rules::RuleId;

/// A contiguous span of contract text assigned to one heading.
///
/// `text` never contains the heading line itself. `risk` and `rule_hits`
/// stay at their defaults until the clause has been through the
/// [`RuleEngine`](crate::RuleEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Ordering token, unique within a document (`c1`, `p2`, `s3`, ...)
    pub id: String,
    /// Cleaned heading text or a synthetic label such as "Clause 2"
    pub title: String,
    /// Clause body with the heading stripped
    pub text: String,
    /// Risk score, 0..=10
    #[serde(default)]
    pub risk: u8,
    /// Triggered rules in detection order; duplicates are kept
    #[serde(default)]
    pub rule_hits: Vec<RuleId>,
}

impl Clause {
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
            risk: 0,
            rule_hits: Vec::new(),
        }
    }

    /// Rule hits joined with ", ", or `None` when nothing fired.
    pub fn joined_hits(&self) -> Option<String> {
        if self.rule_hits.is_empty() {
            return None;
        }
        Some(
            self.rule_hits
                .iter()
                .map(|hit| hit.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Structured result of an LLM clause explanation.
///
/// Failures are represented as notes too: the warning goes in
/// `explanation` and every other field is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmNote {
    pub explanation: String,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub alt_clause: Option<String>,
    #[serde(default)]
    pub risk_0_10: Option<u8>,
}

impl LlmNote {
    /// Placeholder used when no credential is configured for the explainer.
    pub fn missing_credentials() -> Self {
        Self {
            explanation: "⚠️ No LLM API key found. Showing heuristic results only.".to_string(),
            ..Self::default()
        }
    }

    /// Placeholder carrying a collaborator failure message.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            explanation: format!("⚠️ LLM error: {}", message),
            ..Self::default()
        }
    }

    /// Returns true if this note carries an actual explanation rather than a
    /// placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.explanation.starts_with("⚠️")
    }
}

/// A scored clause as it appears in the analysis output.
///
/// Decorations are explicit fields: `entities` is always present (possibly
/// empty) and `llm` is only set when the explainer was consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseReport {
    #[serde(flatten)]
    pub clause: Clause,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmNote>,
}

impl ClauseReport {
    pub fn new(clause: Clause) -> Self {
        Self {
            clause,
            entities: Vec::new(),
            llm: None,
        }
    }
}

/// Read-only projection of a high scoring clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopRisk {
    pub title: String,
    pub score: u8,
    pub reason: String,
}

/// Fallback reason for a top risk without rule hits.
pub(crate) const GENERIC_REASON: &str = "Rule risk";

impl TopRisk {
    pub fn from_clause(clause: &Clause) -> Self {
        Self {
            title: clause.title.clone(),
            score: clause.risk,
            reason: clause
                .joined_hits()
                .unwrap_or_else(|| GENERIC_REASON.to_string()),
        }
    }
}

/// Categorical risk label derived from a 0..=10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBucket {
    Low,
    Medium,
    High,
}

impl RiskBucket {
    /// `<= 3` is Low, `<= 6` is Medium, everything above is High.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => RiskBucket::Low,
            4..=6 => RiskBucket::Medium,
            _ => RiskBucket::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskBucket::Low => "Low",
            RiskBucket::Medium => "Medium",
            RiskBucket::High => "High",
        }
    }
}

impl std::fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate output of one document analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub bucket: RiskBucket,
    pub duration_ms: u64,
    #[serde(default)]
    pub top_risks: Vec<TopRisk>,
    #[serde(default)]
    pub clauses: Vec<ClauseReport>,
}

impl AnalysisResult {
    /// The result reported for empty or whitespace-only documents.
    pub fn empty(duration_ms: u64) -> Self {
        Self {
            overall_score: 0,
            bucket: RiskBucket::Low,
            duration_ms,
            top_risks: Vec::new(),
            clauses: Vec::new(),
        }
    }
}
