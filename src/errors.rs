//! Error types for configuration loading and collaborator calls.
//!
//! None of these escape [`Analyzer::analyze`](crate::Analyzer::analyze): the
//! analysis contract is total, so collaborator errors are folded into
//! placeholder data and configuration errors fall back to defaults.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a rule weight override file.
#[derive(Debug, Error)]
pub enum WeightsError {
    /// The override file could not be read.
    #[error("failed to read weights file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The override file is not a valid JSON object.
    #[error("failed to parse weights file {path} as JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The override file is not a valid TOML table.
    #[error("failed to parse weights file {path} as TOML: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors reported by an [`Explainer`](crate::Explainer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplainError {
    /// No API key or token is configured.
    #[error("no credentials configured")]
    MissingCredentials,

    /// The request failed (network, timeout, non-success status).
    #[error("{0}")]
    Request(String),

    /// The service answered with something that is not a chat completion.
    #[error("malformed response: {0}")]
    Malformed(String),
}
