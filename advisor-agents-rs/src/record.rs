//! Agent identities, statuses and the uniform record every advisor returns.

use llm_gateway::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The four advisors of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    QueryOptimizer,
    CostAdvisor,
    SchemaAdvisor,
    DataValidator,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::QueryOptimizer,
        AgentKind::CostAdvisor,
        AgentKind::SchemaAdvisor,
        AgentKind::DataValidator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::QueryOptimizer => "query_optimizer",
            AgentKind::CostAdvisor => "cost_advisor",
            AgentKind::SchemaAdvisor => "schema_advisor",
            AgentKind::DataValidator => "data_validator",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one advisor run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Success,
    Error,
    /// The query failed the read-only gate; details carry a safe rewrite
    Unsafe,
    #[default]
    Unknown,
}

/// Uniform advisor output.
///
/// `details` always holds every field the advisor declares, filled with
/// defaults or placeholders when the model omitted them or the call failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRecord {
    pub agent: AgentKind,
    pub status: AgentStatus,
    pub query: String,
    pub details: JsonObject,
}

impl AgentRecord {
    pub fn new(agent: AgentKind, status: AgentStatus, query: &str, details: JsonObject) -> Self {
        Self {
            agent,
            status,
            query: query.to_string(),
            details,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == AgentStatus::Error
    }

    /// Failure message for error-shaped records
    pub fn error_message(&self) -> Option<&str> {
        self.details.get("error").and_then(Value::as_str)
    }

    /// String detail, or `default` when absent or not a string
    pub fn detail_str(&self, key: &str, default: &str) -> String {
        self.details
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// List detail, or empty when absent or not a list
    pub fn detail_list(&self, key: &str) -> Vec<Value> {
        match self.details.get(key) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}
