//! Rule severity weights and their optional override file.
//!
//! The default table is compiled in. An override file may provide any
//! subset of rule identifiers; missing keys keep their default. JSON files
//! (`.json`) and TOML files (anything else) are both accepted:
//!
//! ```toml
//! liability_disclaimed = 9
//! no_late_fee = 0
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::WeightsError;
use crate::rules::RuleId;

/// Environment variable naming the override file.
pub const WEIGHTS_ENV_VAR: &str = "CLAUSE_RISK_WEIGHTS";

/// Override file consulted when [`WEIGHTS_ENV_VAR`] is not set, relative to
/// the working directory.
pub const DEFAULT_WEIGHTS_PATH: &str = "rules/risks.json";

/// Immutable mapping from rule identifier to severity weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleWeights {
    weights: BTreeMap<RuleId, i64>,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            weights: RuleId::ALL
                .iter()
                .map(|id| (*id, id.default_weight()))
                .collect(),
        }
    }
}

impl RuleWeights {
    /// Weight for `id`. Every rule has a weight, so this never fails.
    pub fn get(&self, id: RuleId) -> i64 {
        self.weights
            .get(&id)
            .copied()
            .unwrap_or_else(|| id.default_weight())
    }

    /// Replace a single weight.
    pub fn with_weight(mut self, id: RuleId, weight: i64) -> Self {
        self.weights.insert(id, weight);
        self
    }

    /// All weights in rule order.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, i64)> + '_ {
        self.weights.iter().map(|(id, weight)| (*id, *weight))
    }

    /// Merge a partial `identifier -> weight` mapping over the current table.
    /// Unknown identifiers are skipped.
    pub fn merge<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        for (key, weight) in overrides {
            match RuleId::from_id(key.as_ref()) {
                Some(id) => {
                    self.weights.insert(id, weight);
                }
                None => warn!(rule = key.as_ref(), "ignoring weight for unknown rule"),
            }
        }
        self
    }

    /// Load defaults merged with the override file at `path`.
    ///
    /// The file must be a JSON object or TOML table. Entries are coerced one
    /// by one: integers as-is, floats truncated, integer strings parsed,
    /// booleans as 0/1. An entry that cannot be coerced is skipped with a
    /// warning and keeps its current weight.
    pub fn load(path: &Path) -> Result<Self, WeightsError> {
        let content = fs::read_to_string(path).map_err(|source| WeightsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: BTreeMap<String, Value> = if is_json(path) {
            serde_json::from_str(&content).map_err(|source| WeightsError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            toml::from_str(&content).map_err(|source| WeightsError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        };

        let overrides = entries
            .into_iter()
            .filter_map(|(key, value)| match coerce_weight(&value) {
                Some(weight) => Some((key, weight)),
                None => {
                    warn!(rule = %key, value = %value, "ignoring non-integer weight");
                    None
                }
            })
            .collect::<Vec<_>>();

        Ok(Self::default().merge(overrides))
    }

    /// Like [`RuleWeights::load`], but a missing file silently yields the
    /// defaults and a malformed one logs a warning and yields the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no weights override file, using defaults");
            return Self::default();
        }

        match Self::load(path) {
            Ok(weights) => {
                debug!(path = %path.display(), "loaded weights override file");
                weights
            }
            Err(err) => {
                warn!(error = %err, "ignoring malformed weights override file");
                Self::default()
            }
        }
    }

    /// Resolve the override file from [`WEIGHTS_ENV_VAR`], falling back to
    /// [`DEFAULT_WEIGHTS_PATH`], and load it with
    /// [`RuleWeights::load_or_default`].
    pub fn from_env() -> Self {
        Self::load_or_default(&override_path_from_env())
    }
}

/// The override path [`RuleWeights::from_env`] would read.
pub fn override_path_from_env() -> PathBuf {
    std::env::var_os(WEIGHTS_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WEIGHTS_PATH))
}

/// Integer weight for an override value, if it has one.
fn coerce_weight(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}
