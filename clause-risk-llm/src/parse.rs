//! Lenient decoding of model replies.
//!
//! Models are asked for strict JSON but often wrap it in prose or code
//! fences, so the outermost `{...}` is cut out before decoding. Anything
//! unparseable becomes an empty note rather than an error.

use clause_risk::LlmNote;
use serde_json::{Map, Value};

const MAX_RISK: i64 = 10;

pub fn parse_response(reply: &str) -> LlmNote {
    let data = safe_json(reply);
    LlmNote {
        explanation: text_field(data.get("explanation")).unwrap_or_default(),
        issue: text_field(data.get("issue")),
        alt_clause: text_field(data.get("alt_clause")),
        risk_0_10: data.get("risk_0_10").and_then(safe_int),
    }
}

/// The outermost JSON object in `reply`, or an empty map.
pub fn safe_json(reply: &str) -> Map<String, Value> {
    let trimmed = reply.trim();
    let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    };
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Risk as an integer in `0..=10`. Accepts integers, floats (truncated),
/// integer strings and booleans.
pub fn safe_int(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(text) => text.trim().parse::<i64>().ok()?,
        Value::Bool(flag) => i64::from(*flag),
        _ => return None,
    };
    Some(raw.clamp(0, MAX_RISK) as u8)
}

/// Strings pass through, null and empty strings are absent, other values
/// are rendered as JSON.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_wrapped_json() {
        let reply = "Sure! Here is the analysis:\n```json\n{\"explanation\": \"Pays late.\", \"issue\": \"60 day terms\", \"alt_clause\": null, \"risk_0_10\": 7}\n```";
        assert_eq!(
            parse_response(reply),
            LlmNote {
                explanation: "Pays late.".to_string(),
                issue: Some("60 day terms".to_string()),
                alt_clause: None,
                risk_0_10: Some(7),
            }
        );
    }

    #[test]
    fn garbage_becomes_empty_note() {
        assert_eq!(parse_response(""), LlmNote::default());
        assert_eq!(parse_response("no json here"), LlmNote::default());
        assert_eq!(parse_response("{broken"), LlmNote::default());
        assert_eq!(parse_response("[1, 2]"), LlmNote::default());
    }

    #[test]
    fn risk_is_clamped_and_coerced() {
        assert_eq!(safe_int(&json!(7)), Some(7));
        assert_eq!(safe_int(&json!(42)), Some(10));
        assert_eq!(safe_int(&json!(-3)), Some(0));
        assert_eq!(safe_int(&json!(6.9)), Some(6));
        assert_eq!(safe_int(&json!(" 8 ")), Some(8));
        assert_eq!(safe_int(&json!("high")), None);
        assert_eq!(safe_int(&json!(null)), None);
        assert_eq!(safe_int(&json!([5])), None);
    }

    #[test]
    fn non_string_fields_are_rendered() {
        let note = parse_response(r#"{"explanation": "", "issue": ["a", "b"]}"#);
        assert_eq!(note.explanation, "");
        assert_eq!(note.issue.as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(note.risk_0_10, None);
    }
}
