use std::collections::BTreeMap;

use clause_risk::{AnalysisOptions, AnalysisResult, Analyzer, Clock, RuleEngine, RuleWeights};
use clause_risk_report::{build_detailed_markdown, build_markdown, build_pdf};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

mod clock;
mod manifest;

pub use clock::JsClock;
pub use manifest::{rule_infos, RuleInfo, RuleManifest, RULE_MANIFESTS};

// Set up panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Maximum input size in characters, matching the upload text cap.
const MAX_INPUT_SIZE: usize = 60_000;

/// Options accepted by [`analyze`]: the analysis options plus optional
/// weight overrides keyed by rule identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WasmOptions {
    #[serde(flatten)]
    pub analysis: AnalysisOptions,
    pub weights: BTreeMap<String, i64>,
}

/// Error payload returned across the wasm boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasmError {
    pub error: WasmErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasmErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl WasmError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: WasmErrorDetail {
                code: code.to_string(),
                message: message.into(),
                details: None,
            },
        }
    }

    fn invalid_options(message: impl std::fmt::Display) -> Self {
        Self::new("invalid_options", format!("Invalid analysis options: {}", message))
    }

    fn invalid_result(message: impl std::fmt::Display) -> Self {
        Self::new("invalid_result", format!("Not an analysis result: {}", message))
    }

    fn input_too_large(size: usize) -> Self {
        let mut error = Self::new(
            "input_too_large",
            format!("Document exceeds maximum size of {} characters", MAX_INPUT_SIZE),
        );
        error.error.details = Some(serde_json::json!({
            "size": size,
            "max_size": MAX_INPUT_SIZE
        }));
        error
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Analyze contract text.
///
/// `options` may be `undefined` or a partial object such as
/// `{"time_budget_sec": 10, "weights": {"no_late_fee": 0}}`. Returns an
/// `AnalysisResult`, or a `WasmError` for bad options or oversized input.
/// No explainer is available in the browser, so `use_llm` yields
/// placeholder notes.
#[wasm_bindgen]
pub fn analyze(text: &str, options: JsValue) -> JsValue {
    let options = if options.is_undefined() || options.is_null() {
        WasmOptions::default()
    } else {
        match serde_wasm_bindgen::from_value::<WasmOptions>(options) {
            Ok(options) => options,
            Err(err) => return to_js(&WasmError::invalid_options(err)),
        }
    };

    match analyze_internal(text, &options, JsClock) {
        Ok(result) => to_js(&result),
        Err(error) => to_js(&error),
    }
}

fn analyze_internal(
    text: &str,
    options: &WasmOptions,
    clock: impl Clock + 'static,
) -> Result<AnalysisResult, WasmError> {
    let size = text.chars().count();
    if size > MAX_INPUT_SIZE {
        return Err(WasmError::input_too_large(size));
    }

    let weights = RuleWeights::default().merge(options.weights.clone());
    let analyzer = Analyzer::new(RuleEngine::new(weights)).with_clock(clock);
    Ok(analyzer.analyze(text, &options.analysis))
}

/// Render an `AnalysisResult` (as returned by [`analyze`]) to Markdown.
#[wasm_bindgen]
pub fn render_report(result: JsValue, detailed: bool) -> JsValue {
    match serde_wasm_bindgen::from_value::<AnalysisResult>(result) {
        Ok(result) => JsValue::from_str(&render(&result, detailed)),
        Err(err) => to_js(&WasmError::invalid_result(err)),
    }
}

fn render(result: &AnalysisResult, detailed: bool) -> String {
    if detailed {
        build_detailed_markdown(result)
    } else {
        build_markdown(result)
    }
}

/// Render an `AnalysisResult` as a PDF, returned as a `Uint8Array`.
#[wasm_bindgen]
pub fn render_pdf(result: JsValue) -> JsValue {
    let result = match serde_wasm_bindgen::from_value::<AnalysisResult>(result) {
        Ok(result) => result,
        Err(err) => return to_js(&WasmError::invalid_result(err)),
    };
    match pdf_bytes(&result) {
        Ok(bytes) => js_sys::Uint8Array::from(bytes.as_slice()).into(),
        Err(error) => to_js(&error),
    }
}

fn pdf_bytes(result: &AnalysisResult) -> Result<Vec<u8>, WasmError> {
    build_pdf(result).map_err(|err| WasmError::new("render_failed", err.to_string()))
}

/// Every rule with description, color, severity and default weight.
#[wasm_bindgen]
pub fn rule_catalog() -> JsValue {
    to_js(&rule_infos(&RuleWeights::default()))
}
