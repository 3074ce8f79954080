// llm-gateway-rs/src/request.rs
//
// Request/response types for the OpenAI-compatible chat-completions wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

/// Allowed sampling temperature range, inclusive
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// A validated, immutable single-prompt request
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: f64,
}

impl GatewayRequest {
    /// Validate and build a request. Nothing is sent here.
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        max_tokens: u32,
        temperature: f64,
    ) -> GatewayResult<Self> {
        let model = model.into();
        let prompt = prompt.into();

        if model.trim().is_empty() {
            return Err(GatewayError::invalid_request("model must not be empty"));
        }
        if prompt.trim().is_empty() {
            return Err(GatewayError::invalid_request("prompt must not be empty"));
        }
        if max_tokens == 0 {
            return Err(GatewayError::invalid_request("max_tokens must be greater than zero"));
        }
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(GatewayError::invalid_request(format!(
                "temperature {} is outside [0, 2]",
                temperature
            )));
        }

        Ok(Self {
            model,
            prompt,
            max_tokens,
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub(crate) fn to_wire(&self) -> ChatCompletionRequest<'_> {
        ChatCompletionRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: &self.prompt,
            }],
        }
    }
}

/// Successful completion: the model text plus the decoded response body
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// Decoded JSON body, `Value::Null` when the body was not JSON
    pub raw: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// Pull the reply text out of a 2xx body.
///
/// The first choice's message content wins; an unexpected shape falls back to
/// the compact JSON rendering of the body, or the body text when it is not JSON.
pub(crate) fn completion_from_body(body: String) -> Completion {
    let raw: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    if let Ok(parsed) = serde_json::from_value::<ChatCompletionResponse>(raw.clone()) {
        if let Some(choice) = parsed.choices.into_iter().next() {
            if let Some(usage) = parsed.usage.and_then(|u| u.total_tokens) {
                tracing::info!(total_tokens = usage, "LLM request completed");
            }
            let text = choice.message.and_then(|m| m.content).unwrap_or_default();
            return Completion { text, raw };
        }
    }

    tracing::warn!("LLM response had no choices; falling back to the raw body");
    let text = if raw.is_null() { body } else { raw.to_string() };
    Completion { text, raw }
}
