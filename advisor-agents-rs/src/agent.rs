//! Generic advisor runner.
//!
//! Every advisor follows the same cycle: build a prompt from the context,
//! call the gateway's structured invoke, then normalize the parsed object
//! against the advisor's field table. Failures at any step become an
//! error-shaped [`AgentRecord`]; nothing escapes [`run_advisor`].

use llm_gateway::{GatewayError, GatewayRequest, JsonObject, LlmGateway};
use thiserror::Error;

use crate::context::QueryContext;
use crate::fields::{normalize, placeholders, FieldSpec};
use crate::record::{AgentKind, AgentRecord, AgentStatus};

/// Output budget and temperature for one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Sampling {
    pub const fn new(max_tokens: u32, temperature: f64) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to build prompt: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("agent task failed: {0}")]
    Task(String),
}

impl AgentError {
    /// Message placed in `details.error`
    pub fn detail_message(&self) -> String {
        match self {
            AgentError::Gateway(err) => err.message.clone(),
            other => other.to_string(),
        }
    }
}

/// A call issued instead of the advisor's main prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Diversion {
    pub prompt: String,
    pub sampling: Sampling,
    pub fields: &'static [FieldSpec],
    /// Status reported whether or not the diverted call succeeds
    pub status: AgentStatus,
}

/// One advisor: prompt template, field table and an optional pre-check
pub trait Advisor: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Fields promised to the consumer
    fn fields(&self) -> &'static [FieldSpec];

    fn sampling(&self) -> Sampling;

    fn build_prompt(&self, ctx: &QueryContext) -> Result<String, AgentError>;

    /// Replace the main call for queries that need different handling
    fn pre_check(&self, _ctx: &QueryContext) -> Option<Diversion> {
        None
    }
}

impl AgentRecord {
    /// Error-shaped record: every declared field with its placeholder, plus `error`
    pub fn failed(kind: AgentKind, sql: &str, fields: &[FieldSpec], message: &str) -> Self {
        let mut details = placeholders(fields, sql);
        details.insert("error".to_string(), serde_json::Value::String(message.to_string()));
        AgentRecord::new(kind, AgentStatus::Error, sql, details)
    }
}

async fn call_structured(
    gateway: &dyn LlmGateway,
    prompt: String,
    sampling: Sampling,
) -> Result<JsonObject, AgentError> {
    let request = GatewayRequest::new(
        gateway.default_model(),
        prompt,
        sampling.max_tokens,
        sampling.temperature,
    )?;
    Ok(gateway.invoke_structured(&request).await?)
}

/// Run one advisor to completion. Never fails.
pub async fn run_advisor(
    advisor: &dyn Advisor,
    gateway: &dyn LlmGateway,
    ctx: &QueryContext,
) -> AgentRecord {
    let kind = advisor.kind();
    let sql = ctx.sql.as_str();

    if let Some(diversion) = advisor.pre_check(ctx) {
        tracing::info!(agent = %kind, status = ?diversion.status, "pre-check diverted advisor call");
        let details = match call_structured(gateway, diversion.prompt, diversion.sampling).await {
            Ok(parsed) => normalize(diversion.fields, &parsed, sql),
            Err(err) => {
                tracing::warn!(agent = %kind, "diverted call failed: {}", err);
                placeholders(diversion.fields, sql)
            }
        };
        return AgentRecord::new(kind, diversion.status, sql, details);
    }

    let outcome = match advisor.build_prompt(ctx) {
        Ok(prompt) => {
            tracing::debug!(agent = %kind, prompt_len = prompt.len(), "calling LLM gateway");
            call_structured(gateway, prompt, advisor.sampling()).await
        }
        Err(err) => Err(err),
    };

    match outcome {
        Ok(parsed) => {
            AgentRecord::new(kind, AgentStatus::Success, sql, normalize(advisor.fields(), &parsed, sql))
        }
        Err(err) => {
            tracing::warn!(agent = %kind, "advisor error: {}", err);
            AgentRecord::failed(kind, sql, advisor.fields(), &err.detail_message())
        }
    }
}
