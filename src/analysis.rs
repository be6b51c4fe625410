//! Document-level analysis: segmentation, scoring, decoration and
//! aggregation under a time budget.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clause::{AnalysisResult, Clause, ClauseReport, LlmNote, RiskBucket, TopRisk};
use crate::clock::{Clock, SystemClock};
use crate::entities::{EntityExtractor, PatternEntityExtractor};
use crate::errors::ExplainError;
use crate::explain::{ExplainRequest, Explainer};
use crate::normalize::short_summary;
use crate::rules::RuleEngine;
use crate::segment::Segmenter;

/// Default time budget in seconds.
pub const DEFAULT_BUDGET_SEC: u64 = 15;

/// Length of the document summary handed to the explainer, in characters.
pub const SUMMARY_CHARS: usize = 700;

/// Clauses scoring at least this much are listed as top risks.
const TOP_RISK_THRESHOLD: u8 = 5;
const TOP_RISK_LIMIT: usize = 5;

/// No explainer call starts with this many seconds or fewer left.
const LLM_MIN_REMAINING_SEC: f64 = 3.0;
const LLM_MIN_TIMEOUT_SEC: f64 = 6.0;
const LLM_MAX_TIMEOUT_SEC: f64 = 18.0;

/// Weights of the three highest clause risks in the overall score.
const OVERALL_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Per-document analysis options.
///
/// Every field has a default, so partial JSON such as `{"use_llm": true}`
/// deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Wall-clock budget for the whole analysis, in seconds
    pub time_budget_sec: u64,
    /// Language passed through to the explainer
    pub lang: String,
    /// Whether to consult the explainer for each clause
    pub use_llm: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            time_budget_sec: DEFAULT_BUDGET_SEC,
            lang: "English".to_string(),
            use_llm: false,
        }
    }
}

/// Runs the full pipeline for one document.
///
/// ```
/// use clause_risk::{AnalysisOptions, Analyzer, NoEntities, RiskBucket, RuleEngine};
///
/// let analyzer = Analyzer::new(RuleEngine::default()).with_entity_extractor(NoEntities);
/// let result = analyzer.analyze("   \n ", &AnalysisOptions::default());
/// assert_eq!(result.bucket, RiskBucket::Low);
/// assert!(result.clauses.is_empty());
/// ```
pub struct Analyzer {
    segmenter: Segmenter,
    engine: RuleEngine,
    entities: Box<dyn EntityExtractor>,
    explainer: Option<Box<dyn Explainer>>,
    clock: Box<dyn Clock>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(RuleEngine::default())
    }
}

impl Analyzer {
    /// An analyzer with the default segmenter, pattern-based entity
    /// extraction, the system clock and no explainer.
    pub fn new(engine: RuleEngine) -> Self {
        Self {
            segmenter: Segmenter::new(),
            engine,
            entities: Box::new(PatternEntityExtractor::new()),
            explainer: None,
            clock: Box::new(SystemClock::new()),
        }
    }

    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_entity_extractor(mut self, extractor: impl EntityExtractor + 'static) -> Self {
        self.entities = Box::new(extractor);
        self
    }

    pub fn with_explainer(mut self, explainer: impl Explainer + 'static) -> Self {
        self.explainer = Some(Box::new(explainer));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Analyze `text`. Never fails: collaborator errors end up as
    /// placeholder notes and budget exhaustion yields a partial result.
    pub fn analyze(&self, text: &str, options: &AnalysisOptions) -> AnalysisResult {
        let start = self.clock.now();
        if text.trim().is_empty() {
            return AnalysisResult::empty(self.elapsed_ms(start));
        }

        let budget = Duration::from_secs(options.time_budget_sec);
        let summary = short_summary(text, SUMMARY_CHARS);
        let clauses = self.segmenter.segment(text);
        let total = clauses.len();

        let mut reports: Vec<ClauseReport> = Vec::with_capacity(total);
        for mut clause in clauses {
            self.engine.apply(&mut clause);
            let mut report = ClauseReport::new(clause);
            report.entities = self.entities.entities(&report.clause.text);

            if options.use_llm {
                let remaining = budget.as_secs_f64() - self.elapsed(start).as_secs_f64();
                if remaining <= LLM_MIN_REMAINING_SEC {
                    info!(
                        analyzed = reports.len(),
                        total, "time budget nearly exhausted, skipping remaining clauses"
                    );
                    break;
                }
                let timeout = llm_timeout(remaining);
                report.llm = Some(self.explain(&report.clause, options, &summary, timeout));
            }

            reports.push(report);

            if self.elapsed(start) > budget {
                if reports.len() < total {
                    info!(
                        analyzed = reports.len(),
                        total, "time budget exhausted, skipping remaining clauses"
                    );
                }
                break;
            }
        }

        let overall_score = overall_score(&reports);
        debug!(clauses = reports.len(), overall_score, "analysis finished");

        AnalysisResult {
            overall_score,
            bucket: RiskBucket::from_score(overall_score),
            duration_ms: self.elapsed_ms(start),
            top_risks: top_risks(&reports),
            clauses: reports,
        }
    }

    fn explain(
        &self,
        clause: &Clause,
        options: &AnalysisOptions,
        summary: &str,
        timeout: Duration,
    ) -> LlmNote {
        let explainer = match &self.explainer {
            Some(explainer) => explainer,
            None => return LlmNote::missing_credentials(),
        };

        let request = ExplainRequest {
            clause_text: &clause.text,
            title: &clause.title,
            lang: &options.lang,
            summary,
            timeout,
        };

        match explainer.explain(&request) {
            Ok(note) => note,
            Err(ExplainError::MissingCredentials) => LlmNote::missing_credentials(),
            Err(err) => {
                warn!(clause = %clause.id, error = %err, "clause explanation failed");
                LlmNote::error(err)
            }
        }
    }

    fn elapsed(&self, start: Duration) -> Duration {
        self.clock.now().saturating_sub(start)
    }

    fn elapsed_ms(&self, start: Duration) -> u64 {
        u64::try_from(self.elapsed(start).as_millis()).unwrap_or(u64::MAX)
    }
}

/// Per-call explainer timeout for the remaining budget, in whole seconds.
fn llm_timeout(remaining_sec: f64) -> Duration {
    let secs = (remaining_sec - 1.0)
        .min(LLM_MAX_TIMEOUT_SEC)
        .floor()
        .max(LLM_MIN_TIMEOUT_SEC);
    Duration::from_secs(secs as u64)
}

/// Clauses at or above [`TOP_RISK_THRESHOLD`], highest first. Equal
/// scores keep document order.
fn top_risks(reports: &[ClauseReport]) -> Vec<TopRisk> {
    let mut top: Vec<TopRisk> = reports
        .iter()
        .filter(|report| report.clause.risk >= TOP_RISK_THRESHOLD)
        .map(|report| TopRisk::from_clause(&report.clause))
        .collect();
    top.sort_by(|a, b| b.score.cmp(&a.score));
    top.truncate(TOP_RISK_LIMIT);
    top
}

/// Weighted combination of the three highest clause risks, rounded half
/// to even.
fn overall_score(reports: &[ClauseReport]) -> u8 {
    let mut risks: Vec<u8> = reports.iter().map(|report| report.clause.risk).collect();
    risks.sort_unstable_by(|a, b| b.cmp(a));

    let weighted: f64 = OVERALL_WEIGHTS
        .iter()
        .zip(risks.iter().chain(std::iter::repeat(&0)))
        .map(|(weight, risk)| weight * f64::from(*risk))
        .sum();

    weighted.round_ties_even().clamp(0.0, 10.0) as u8
}
