#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/clause-risk/main/assets/clause-risk.svg",
    issue_tracker_base_url = "https://github.com/storyscript/clause-risk/issues/"
)]

//! Clause segmentation and heuristic risk scoring for legal contracts.
//!
//! The crate turns raw contract text into titled clauses, scores each clause
//! against a fixed set of risk rules and aggregates the scores into a
//! document-level report.
//!
//! ## Pipeline
//!
//! - [`HeadingLexicon`] - English and Hindi heading phrases, compiled into
//!   strong (line-anchored) and loose matchers
//! - [`Segmenter`] - Splits normalized text into [`Clause`]s using an ordered
//!   list of [`Strategy`] tiers
//! - [`RuleEngine`] - Scores one clause against [`RuleWeights`] with dampeners
//!   and a soft cap
//! - [`Analyzer`] - Runs the whole pipeline under a time budget and produces
//!   an [`AnalysisResult`]
//!
//! ## Collaborators
//!
//! Entity tagging ([`EntityExtractor`]), clause explanation ([`Explainer`])
//! and time ([`Clock`]) are traits so that callers can plug in network
//! clients or deterministic test doubles.
//!
//! ## Example
//!
//! ```
//! use clause_risk::{AnalysisOptions, Analyzer, RuleEngine, RuleWeights};
//!
//! let analyzer = Analyzer::new(RuleEngine::new(RuleWeights::default()));
//! let result = analyzer.analyze(
//!     "Liability\nThe Vendor shall have no liability for any loss.",
//!     &AnalysisOptions::default(),
//! );
//! assert_eq!(result.clauses.len(), 1);
//! assert_eq!(result.clauses[0].clause.risk, 10);
//! ```

mod analysis;
mod clause;
mod clock;
mod entities;
mod errors;
mod explain;
mod lexicon;
mod normalize;
mod rules;
mod segment;
mod sentence;
mod weights;

pub use analysis::{AnalysisOptions, Analyzer, DEFAULT_BUDGET_SEC, SUMMARY_CHARS};
pub use clause::{AnalysisResult, Clause, ClauseReport, LlmNote, RiskBucket, TopRisk};
pub use clock::{Clock, SystemClock};
pub use entities::{EntityExtractor, EntityKind, NoEntities, PatternEntityExtractor};
pub use errors::{ExplainError, WeightsError};
pub use explain::{ExplainRequest, Explainer};
pub use lexicon::{is_hindi, HeadingLexicon, EN_HEADINGS, HI_HEADINGS};
pub use normalize::{clean_heading, normalize_whitespace, short_summary, title_case};
pub use rules::{RiskAssessment, RuleEngine, RuleId, SOFT_CAP};
pub use segment::{Segmentation, Segmenter, SegmenterConfig, Strategy};
pub use sentence::SentenceSplitter;
pub use weights::{override_path_from_env, RuleWeights, DEFAULT_WEIGHTS_PATH, WEIGHTS_ENV_VAR};

#[cfg(test)]
mod tests {
    mod analysis;
    mod properties;
    mod rules;
    mod segment;
}
