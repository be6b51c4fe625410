//! Clause explanations from a chat-completions LLM.
//!
//! [`GroqExplainer`] implements [`clause_risk::Explainer`] against any
//! OpenAI-compatible `/chat/completions` endpoint, Groq by default.
//!
//! ## Environment
//!
//! | variable | default |
//! |---|---|
//! | `GROQ_API_KEY` | none; without it every call reports missing credentials |
//! | `GROQ_MODEL` | [`DEFAULT_MODEL`] |
//! | `GROQ_BASE_URL` | [`DEFAULT_BASE_URL`] |
//!
//! A `.env` file in the working directory is read first.

mod parse;
mod prompt;
mod types;

use clause_risk::{ExplainError, ExplainRequest, Explainer, LlmNote};
use tracing::debug;

pub use parse::{parse_response, safe_int, safe_json};
pub use prompt::{user_prompt, CLAUSE_PROMPT_CHARS, SUMMARY_PROMPT_CHARS, SYSTEM_PROMPT};

use types::{ApiErrorBody, ChatMessage, ChatRequest, ChatResponse};

pub const API_KEY_ENV_VAR: &str = "GROQ_API_KEY";
pub const MODEL_ENV_VAR: &str = "GROQ_MODEL";
pub const BASE_URL_ENV_VAR: &str = "GROQ_BASE_URL";

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Connection settings for [`GroqExplainer`].
#[derive(Clone, PartialEq)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GroqConfig {
    /// Settings from the process environment, after loading `.env`.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Settings from an arbitrary variable lookup. Empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: var(API_KEY_ENV_VAR),
            model: var(MODEL_ENV_VAR).unwrap_or(defaults.model),
            base_url: var(BASE_URL_ENV_VAR).unwrap_or(defaults.base_url),
            temperature: defaults.temperature,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Blocking chat-completions client.
#[derive(Debug, Clone)]
pub struct GroqExplainer {
    config: GroqConfig,
    client: reqwest::blocking::Client,
}

impl GroqExplainer {
    pub fn new(config: GroqConfig) -> Self {
        Self {
            config,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GroqConfig::from_env())
    }

    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    /// True if a credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.config.api_key.is_some()
    }
}

impl Explainer for GroqExplainer {
    fn explain(&self, request: &ExplainRequest<'_>) -> Result<LlmNote, ExplainError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ExplainError::MissingCredentials)?;

        let user = user_prompt(request);
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(&user)],
        };

        debug!(
            model = %self.config.model,
            title = request.title,
            timeout_secs = request.timeout.as_secs(),
            "requesting clause explanation"
        );
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .map_err(|err| ExplainError::Request(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|err| ExplainError::Request(err.to_string()))?;
        if !status.is_success() {
            return Err(ExplainError::Request(api_error_message(&text, status.as_u16())));
        }

        let completion: ChatResponse =
            serde_json::from_str(&text).map_err(|err| ExplainError::Malformed(err.to_string()))?;
        Ok(parse_response(&completion.first_content()))
    }
}

fn api_error_message(body: &str, status: u16) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("HTTP {}: {}", status, parsed.error.message),
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}
