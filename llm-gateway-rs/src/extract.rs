// llm-gateway-rs/src/extract.rs
//
// Best-effort JSON extraction from free-form model text. Models routinely
// wrap the requested object in Markdown fences or surrounding prose.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{GatewayError, GatewayResult};

/// A decoded JSON object returned by a structured invoke
pub type JsonObject = Map<String, Value>;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*|\s*```").expect("code fence pattern is valid"));

// Greedy: first '{' through last '}'.
static OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"));

/// Strip Markdown code-fence markers and surrounding whitespace
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Extract a JSON object from model text.
///
/// Tries the brace-delimited span first, then the whole trimmed text. Fails
/// with `ParseError` (keeping the raw text) when neither yields an object.
pub fn extract_json_object(text: &str) -> GatewayResult<JsonObject> {
    if text.trim().is_empty() {
        return Err(GatewayError::parse("Empty text", text));
    }

    let cleaned = strip_code_fences(text);

    if let Some(span) = OBJECT_SPAN.find(&cleaned) {
        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(span.as_str()) {
            return Ok(object);
        }
    }

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(GatewayError::parse(
            format!("Expected a JSON object, got {}", json_type_name(&other)),
            text,
        )),
        Err(err) => Err(GatewayError::parse(
            format!("Could not parse JSON from text: {}", err),
            text,
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
