// query-advisor-rs/src/context_provider.rs
//
// Database context provider seam.
//
// The service never talks to a database directly: schema, EXPLAIN output and
// sample rows come from a `ContextProvider`. `Unavailable` means the piece
// could not be produced and the advisors should be told so; `Connection`
// means the database itself is unreachable and fails the request.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context unavailable: {0}")]
    Unavailable(String),

    #[error("database connection failed: {0}")]
    Connection(String),
}

pub type ContextResult<T> = Result<T, ContextError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Name reported in responses
    fn database_name(&self) -> String;

    /// Table definitions relevant to `sql`, keyed by table name
    async fn schema_context(&self, sql: &str) -> ContextResult<Value>;

    /// EXPLAIN rows for `sql`
    async fn explain(&self, sql: &str) -> ContextResult<Value>;

    /// A small preview of the rows `sql` returns
    async fn sample_rows(&self, sql: &str) -> ContextResult<Value>;

    /// Every table with its columns
    async fn full_schema(&self) -> ContextResult<Value>;
}

/// Provider used when no database is attached
#[derive(Debug, Clone)]
pub struct OfflineContextProvider {
    database: String,
}

const OFFLINE_REASON: &str = "No database connection configured";

impl OfflineContextProvider {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
        }
    }

    /// Reads `ADVISOR_DATABASE_NAME`, default "unknown"
    pub fn from_env() -> Self {
        Self::new(config_rs::env_string("ADVISOR_DATABASE_NAME").unwrap_or_else(|| "unknown".to_string()))
    }
}

#[async_trait]
impl ContextProvider for OfflineContextProvider {
    fn database_name(&self) -> String {
        self.database.clone()
    }

    async fn schema_context(&self, _sql: &str) -> ContextResult<Value> {
        Err(ContextError::Unavailable(OFFLINE_REASON.to_string()))
    }

    async fn explain(&self, _sql: &str) -> ContextResult<Value> {
        Err(ContextError::Unavailable(OFFLINE_REASON.to_string()))
    }

    async fn sample_rows(&self, _sql: &str) -> ContextResult<Value> {
        Err(ContextError::Unavailable(OFFLINE_REASON.to_string()))
    }

    async fn full_schema(&self) -> ContextResult<Value> {
        Err(ContextError::Unavailable(OFFLINE_REASON.to_string()))
    }
}
