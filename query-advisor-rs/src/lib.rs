//! # Query Advisor Service
//!
//! HTTP front end for the advisory panel.
//!
//! - `POST /analyze`: gate a query, gather context and return the
//!   assembled advice
//! - `POST /analyze-schema`: whole-database schema overview
//! - `GET /health`, `GET /`: health and service descriptor

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use advisor_agents::AnalysisResponse;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use llm_gateway::{GatewayClient, GatewayResult, LlmGateway};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod analysis;
pub mod context_provider;
pub mod error;
pub mod logging;

pub use analysis::QueryAnalyzer;
pub use context_provider::{ContextError, ContextProvider, OfflineContextProvider};
pub use error::{ApiError, ErrorResponse};

/// Service name used for ports, logs and health reports
pub const SERVICE: &str = "QUERY_ADVISOR";

/// Maximum accepted request body (1MB)
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

fn default_sandbox() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub sql: String,
    #[serde(default = "default_sandbox")]
    pub run_in_sandbox: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: u64,
    pub status: String,
    pub dependencies: BTreeMap<String, String>,
}

/// Shared application state
pub struct AppState {
    analyzer: QueryAnalyzer,
    service_name: String,
    llm_configured: bool,
    started: Instant,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        provider: Arc<dyn ContextProvider>,
        llm_configured: bool,
    ) -> Self {
        Self {
            analyzer: QueryAnalyzer::new(gateway, provider),
            service_name: config_rs::get_formatted_service_name(SERVICE),
            llm_configured,
            started: Instant::now(),
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.analyzer = self.analyzer.with_engine(engine);
        self
    }

    /// Gateway client and offline provider configured from the environment
    pub fn from_env() -> GatewayResult<Self> {
        let client = GatewayClient::from_env()?;
        let llm_configured = client.is_configured();
        if !llm_configured {
            tracing::warn!(
                api_url = %client.config().api_url,
                model = %client.config().model,
                "LLM gateway has no API key; advisor calls will fail"
            );
        }
        let provider = OfflineContextProvider::from_env();
        let engine = config_rs::env_string("ADVISOR_TARGET_ENGINE")
            .unwrap_or_else(|| analysis::DEFAULT_ENGINE.to_string());

        Ok(Self::new(Arc::new(client), Arc::new(provider), llm_configured).with_engine(engine))
    }

    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }
}

/// POST /analyze
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let response = state
        .analyzer
        .analyze(&request.sql, request.run_in_sandbox)
        .await?;
    Ok(Json(response))
}

/// POST /analyze-schema
async fn analyze_schema_handler(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.analyzer.schema_overview().await?))
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut dependencies = BTreeMap::new();
    dependencies.insert(
        "llm_gateway".to_string(),
        if state.llm_configured { "configured" } else { "missing_credential" }.to_string(),
    );
    dependencies.insert(
        "database".to_string(),
        state.analyzer.provider().database_name(),
    );

    Json(HealthResponse {
        healthy: true,
        service_name: state.service_name.clone(),
        uptime_seconds: state.started.elapsed().as_secs(),
        status: if state.llm_configured { "SERVING" } else { "DEGRADED" }.to_string(),
        dependencies,
    })
}

/// GET /
async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "engine": state.analyzer.engine(),
        "endpoints": [
            "GET /",
            "GET /health",
            "POST /analyze",
            "POST /analyze-schema"
        ]
    }))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/analyze-schema", post(analyze_schema_handler))
        .layer(RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests;
