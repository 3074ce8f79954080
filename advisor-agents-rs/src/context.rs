//! Execution context handed to the advisors.
//!
//! Each piece is either data the provider returned or the reason it could not.
//! Prompts render unusable pieces as an explicit sentinel so the model is told
//! the context is missing rather than handed an empty blob.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// One piece of database context
#[derive(Debug, Clone, PartialEq)]
pub enum ContextData {
    Available(Value),
    Unavailable(String),
}

/// Shape a context piece must have to be embedded in a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A non-empty JSON array (EXPLAIN rows)
    Array,
    /// A non-empty JSON object (sample rows)
    Object,
    /// A non-empty JSON object without an `error` key (schema)
    ObjectWithoutError,
}

impl ContextData {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ContextData::Unavailable(reason.into())
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ContextData::Available(value) => Some(value),
            ContextData::Unavailable(_) => None,
        }
    }

    /// True when the piece is present and has the expected shape
    pub fn fits(&self, shape: Shape) -> bool {
        match (self.as_value(), shape) {
            (Some(Value::Array(items)), Shape::Array) => !items.is_empty(),
            (Some(Value::Object(map)), Shape::Object) => !map.is_empty(),
            (Some(Value::Object(map)), Shape::ObjectWithoutError) => {
                !map.is_empty() && map.get("error").map_or(true, Value::is_null)
            }
            _ => false,
        }
    }

    /// Pretty JSON for prompts, or `sentinel` when the piece does not fit
    pub fn render(&self, shape: Shape, sentinel: &str) -> Result<String, serde_json::Error> {
        match self.as_value() {
            Some(value) if self.fits(shape) => serde_json::to_string_pretty(value),
            _ => Ok(sentinel.to_string()),
        }
    }

    /// Value passed through to technical details
    pub fn to_value(&self) -> Value {
        match self {
            ContextData::Available(value) => value.clone(),
            ContextData::Unavailable(reason) => json!({ "error": reason }),
        }
    }
}

impl Serialize for ContextData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContextData::Available(value) => value.serialize(serializer),
            ContextData::Unavailable(reason) => json!({ "error": reason }).serialize(serializer),
        }
    }
}

/// Everything the advisors see for one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    pub sql: String,
    /// Target engine named in prompts, e.g. "MariaDB"
    pub engine: String,
    pub schema: ContextData,
    pub explain: ContextData,
    pub sample_rows: ContextData,
}

impl QueryContext {
    /// Context with nothing collected yet
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            engine: "MariaDB".to_string(),
            schema: ContextData::unavailable("schema not collected"),
            explain: ContextData::unavailable("explain plan not collected"),
            sample_rows: ContextData::unavailable("sample rows not collected"),
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_schema(mut self, schema: ContextData) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_explain(mut self, explain: ContextData) -> Self {
        self.explain = explain;
        self
    }

    pub fn with_sample_rows(mut self, sample_rows: ContextData) -> Self {
        self.sample_rows = sample_rows;
        self
    }
}
