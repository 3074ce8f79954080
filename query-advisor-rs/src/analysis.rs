// query-advisor-rs/src/analysis.rs
//
// One analysis request end to end:
//   read-only gate -> context provider (sequential) -> advisory panel -> assembler
//
// Context pieces the provider cannot produce are passed on as unavailable;
// only a connection failure aborts the request.

use std::sync::Arc;

use advisor_agents::{assemble, AdvisoryPanel, AnalysisResponse, ContextData, QueryContext};
use llm_gateway::LlmGateway;
use serde_json::Value;

use crate::context_provider::{ContextError, ContextProvider, ContextResult};
use crate::error::ApiError;

pub const DEFAULT_ENGINE: &str = "MariaDB";

#[derive(Clone)]
pub struct QueryAnalyzer {
    panel: AdvisoryPanel,
    provider: Arc<dyn ContextProvider>,
    engine: String,
}

fn collect(piece: &str, result: ContextResult<Value>) -> Result<ContextData, ApiError> {
    match result {
        Ok(value) => Ok(ContextData::Available(value)),
        Err(ContextError::Unavailable(reason)) => {
            tracing::warn!(piece, "context unavailable: {}", reason);
            Ok(ContextData::Unavailable(reason))
        }
        Err(err @ ContextError::Connection(_)) => Err(err.into()),
    }
}

impl QueryAnalyzer {
    pub fn new(gateway: Arc<dyn LlmGateway>, provider: Arc<dyn ContextProvider>) -> Self {
        Self {
            panel: AdvisoryPanel::new(gateway),
            provider,
            engine: DEFAULT_ENGINE.to_string(),
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn provider(&self) -> &Arc<dyn ContextProvider> {
        &self.provider
    }

    /// Gate the query and gather its context
    pub async fn prepare(&self, sql: &str) -> Result<QueryContext, ApiError> {
        let query = sql.trim();
        if query.is_empty() {
            return Err(ApiError::EmptyQuery);
        }
        sql_safety::check_read_only(query)?;

        let schema = collect("schema", self.provider.schema_context(query).await)?;
        let explain = collect("explain", self.provider.explain(query).await)?;
        let sample_rows = collect("sample_rows", self.provider.sample_rows(query).await)?;

        Ok(QueryContext::new(query)
            .with_engine(self.engine.clone())
            .with_schema(schema)
            .with_explain(explain)
            .with_sample_rows(sample_rows))
    }

    /// Full analysis. Advisor failures are reported inside the response.
    pub async fn analyze(&self, sql: &str, run_in_sandbox: bool) -> Result<AnalysisResponse, ApiError> {
        if run_in_sandbox {
            tracing::info!("Running query in sandbox mode");
        }
        let ctx = Arc::new(self.prepare(sql).await?);
        let preview: String = ctx.sql.chars().take(50).collect();
        tracing::info!(query = %preview, "Starting analysis");

        let report = self.panel.consult(Arc::clone(&ctx)).await;
        let response = assemble(&self.provider.database_name(), &ctx, &report);

        tracing::info!(errors = report.error_count(), "Analysis complete");
        Ok(response)
    }

    /// Whole-database schema overview
    pub async fn schema_overview(&self) -> Result<Value, ApiError> {
        let tables = self.provider.full_schema().await.map_err(|err| match err {
            ContextError::Unavailable(reason) => ApiError::Internal(reason),
            connection => ApiError::Context(connection),
        })?;
        Ok(serde_json::json!({
            "database": self.provider.database_name(),
            "tables": tables,
        }))
    }
}
