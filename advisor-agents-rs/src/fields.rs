//! Field tables: which keys an advisor promises its consumer, where each is
//! read from in the model output, and what fills it when absent or failed.

use llm_gateway::JsonObject;
use serde_json::Value;

/// How a missing field is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Text(&'static str),
    List(&'static [&'static str]),
    /// The query text the advisor was asked about
    OriginalQuery,
}

impl FieldDefault {
    pub fn to_value(self, sql: &str) -> Value {
        match self {
            FieldDefault::Text(text) => Value::String(text.to_string()),
            FieldDefault::List(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
            }
            FieldDefault::OriginalQuery => Value::String(sql.to_string()),
        }
    }
}

/// One promised output field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the record details
    pub key: &'static str,
    /// Key in the parsed model output
    pub source: &'static str,
    /// Used when the model omitted the field
    pub default: FieldDefault,
    /// Used when the call failed altogether
    pub on_error: FieldDefault,
}

impl FieldSpec {
    pub const fn new(key: &'static str, default: FieldDefault, on_error: FieldDefault) -> Self {
        Self {
            key,
            source: key,
            default,
            on_error,
        }
    }

    /// Read the field from a differently named model key
    pub const fn from_source(self, source: &'static str) -> Self {
        Self { source, ..self }
    }
}

// Lists accept a bare string as a single item; strings accept other scalars.
// Anything else that disagrees with the default's type falls back to it.
fn coerce(value: &Value, default: Value) -> Value {
    match (value, &default) {
        (Value::Null, _) => default,
        (Value::Array(_), Value::Array(_)) => value.clone(),
        (Value::String(s), Value::Array(_)) => Value::Array(vec![Value::String(s.clone())]),
        (Value::String(_), Value::String(_)) => value.clone(),
        (Value::Number(n), Value::String(_)) => Value::String(n.to_string()),
        (Value::Bool(b), Value::String(_)) => Value::String(b.to_string()),
        _ => default,
    }
}

/// Details for a successful call: every declared field, model value first
pub fn normalize(fields: &[FieldSpec], parsed: &JsonObject, sql: &str) -> JsonObject {
    let mut details = JsonObject::new();
    let mut missing = Vec::new();

    for field in fields {
        let default = field.default.to_value(sql);
        let value = match parsed.get(field.source) {
            Some(value) => coerce(value, default),
            None => {
                missing.push(field.source);
                default
            }
        };
        details.insert(field.key.to_string(), value);
    }

    if !missing.is_empty() {
        tracing::debug!(?missing, "model output missing fields, defaults applied");
    }
    details
}

/// Details for a failed call: every declared field with its placeholder
pub fn placeholders(fields: &[FieldSpec], sql: &str) -> JsonObject {
    fields
        .iter()
        .map(|field| (field.key.to_string(), field.on_error.to_value(sql)))
        .collect()
}
