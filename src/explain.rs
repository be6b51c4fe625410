//! Clause explanation collaborator interface.

use std::time::Duration;

use crate::clause::LlmNote;
use crate::errors::ExplainError;

/// Everything an explainer needs to describe one clause.
#[derive(Debug, Clone, Copy)]
pub struct ExplainRequest<'a> {
    pub clause_text: &'a str,
    pub title: &'a str,
    /// Language the explanation should be written in (e.g. "English", "Hindi")
    pub lang: &'a str,
    /// Short whole-document summary for context
    pub summary: &'a str,
    /// How long the caller is willing to wait for this call
    pub timeout: Duration,
}

/// Produces a plain-language explanation of a clause, typically by calling
/// a large language model.
///
/// Implementations return `Err` for every failure; the [`Analyzer`]
/// converts errors into placeholder [`LlmNote`]s so a failing explainer
/// never aborts an analysis.
///
/// [`Analyzer`]: crate::Analyzer
pub trait Explainer {
    fn explain(&self, request: &ExplainRequest<'_>) -> Result<LlmNote, ExplainError>;
}

impl<E: Explainer + ?Sized> Explainer for Box<E> {
    fn explain(&self, request: &ExplainRequest<'_>) -> Result<LlmNote, ExplainError> {
        (**self).explain(request)
    }
}
