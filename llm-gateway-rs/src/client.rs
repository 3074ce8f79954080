// llm-gateway-rs/src/client.rs
//
// HTTP client for an OpenAI-compatible chat-completions endpoint.
//
// - One user message per request, bearer-token auth
// - Status classification: 400/401/429 surface immediately, other non-2xx and
//   transport failures are retried with exponential backoff
// - Outbound concurrency capped by a semaphore shared by all callers
// - Structured invoke extracts a JSON object from the model reply

use async_trait::async_trait;
use backoff::backoff::Backoff;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::GatewayConfig;
use crate::error::{classify_transport, FailureKind, GatewayError, GatewayResult};
use crate::extract::{extract_json_object, JsonObject};
use crate::request::{completion_from_body, Completion, GatewayRequest};

/// Seam between the advisors and the model provider
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model used when the caller does not pick one
    fn default_model(&self) -> &str;

    /// Send one request, retrying transient failures
    async fn invoke(&self, request: &GatewayRequest) -> GatewayResult<Completion>;

    /// Send one request and extract a JSON object from the reply text
    async fn invoke_structured(&self, request: &GatewayRequest) -> GatewayResult<JsonObject> {
        let completion = self.invoke(request).await?;
        extract_json_object(&completion.text).map_err(|err| {
            tracing::warn!("Failed to parse JSON from LLM output: {}", err.message);
            GatewayError::parse("Failed to parse JSON response", completion.text)
        })
    }
}

/// Classify a received HTTP response
pub(crate) fn classify_response(status: u16, body: String) -> GatewayResult<Completion> {
    match status {
        200..=299 => Ok(completion_from_body(body)),
        400 => {
            tracing::error!("400 Bad Request from LLM gateway: {}", body);
            Err(GatewayError::new(FailureKind::BadRequest, "Bad Request")
                .with_status(status)
                .with_body(body))
        }
        401 => {
            tracing::error!("401 Unauthorized - invalid or expired API key");
            Err(
                GatewayError::new(FailureKind::Unauthorized, "Unauthorized - Check your API key")
                    .with_status(status)
                    .with_body(body),
            )
        }
        429 => {
            tracing::warn!("429 Rate Limited by LLM gateway");
            Err(
                GatewayError::new(FailureKind::RateLimited, "Rate limited - quota exceeded")
                    .with_status(status)
                    .with_body(body),
            )
        }
        _ => {
            tracing::error!("LLM gateway returned {}: {}", status, body);
            Err(GatewayError::new(FailureKind::UpstreamError, "LLM request failed")
                .with_status(status)
                .with_body(body))
        }
    }
}

/// Reqwest-backed [`LlmGateway`]
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    config: Arc<GatewayConfig>,
    permits: Arc<Semaphore>,
}

impl GatewayClient {
    /// Build a client. Fails only if the HTTP client itself cannot be built;
    /// a missing credential is reported per call.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let max_connections = config.max_connections.max(1);
        let http = Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(max_connections)
            .build()
            .map_err(|err| {
                GatewayError::configuration(format!("Failed to build HTTP client: {}", err))
            })?;

        tracing::info!(
            api_url = %config.api_url,
            model = %config.model,
            max_attempts = config.retry.attempts(),
            max_connections,
            "LLM gateway client initialized"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
            permits: Arc::new(Semaphore::new(max_connections)),
        })
    }

    /// Build a client from `LLM_*` environment variables
    pub fn from_env() -> GatewayResult<Self> {
        Self::new(GatewayConfig::from_env())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// True when a credential is configured
    pub fn is_configured(&self) -> bool {
        self.config.has_credential()
    }

    /// Validate and send a prompt; `None` uses the configured model
    pub async fn invoke_prompt(
        &self,
        prompt: &str,
        model: Option<&str>,
        max_tokens: u32,
        temperature: f64,
    ) -> GatewayResult<Completion> {
        let model = model.unwrap_or(self.config.model.as_str());
        let request = GatewayRequest::new(model, prompt, max_tokens, temperature)?;
        self.invoke(&request).await
    }

    // Execute a single attempt
    async fn execute_once(&self, request: &GatewayRequest, api_key: &str) -> GatewayResult<Completion> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GatewayError::network("Connection limiter closed"))?;

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request.to_wire())
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status().as_u16();
        tracing::debug!(status, "LLM gateway responded");
        let body = response.text().await.map_err(classify_transport)?;

        classify_response(status, body)
    }
}

#[async_trait]
impl LlmGateway for GatewayClient {
    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, request: &GatewayRequest) -> GatewayResult<Completion> {
        let api_key = match self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => {
                tracing::error!("LLM API key not configured");
                return Err(GatewayError::configuration(
                    "LLM_API_KEY not set in environment.",
                ));
            }
        };

        let max_attempts = self.config.retry.attempts();
        let mut backoff = self.config.retry.backoff();
        let mut attempt = 0;

        tracing::debug!(
            model = request.model(),
            max_tokens = request.max_tokens(),
            "Preparing LLM request to {}",
            self.config.api_url
        );

        loop {
            attempt += 1;
            tracing::debug!("POST {} (attempt {}/{})", self.config.api_url, attempt, max_attempts);

            match self.execute_once(request, api_key).await {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = backoff
                        .next_backoff()
                        .unwrap_or(self.config.retry.max_backoff);
                    tracing::warn!(
                        kind = %err.kind,
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        max_attempts,
                        err.message,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    if err.is_retryable() {
                        tracing::error!("LLM request failed after {} attempts: {}", attempt, err);
                    }
                    return Err(if err.kind == FailureKind::NetworkError {
                        GatewayError::network(format!(
                            "Network error - LLM API unavailable: {}",
                            err.message
                        ))
                    } else {
                        err
                    });
                }
            }
        }
    }
}
