//! # LLM Gateway
//!
//! Client for OpenAI-compatible chat-completion endpoints, built for callers
//! that expect a JSON object back from free-form model text.
//!
//! - [`GatewayClient`]: reqwest client with bounded retry and exponential
//!   backoff, status-code classification and a connection cap
//! - [`LlmGateway`]: the trait advisors depend on, with a default
//!   [`LlmGateway::invoke_structured`] built on [`extract_json_object`]
//! - [`GatewayError`] / [`FailureKind`]: the failure taxonomy

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod request;

pub use client::{GatewayClient, LlmGateway};
pub use config::{backoff_schedule, GatewayConfig, RetryPolicy, DEFAULT_API_URL, DEFAULT_MODEL};
pub use error::{FailureKind, GatewayError, GatewayResult};
pub use extract::{extract_json_object, strip_code_fences, JsonObject};
pub use request::{Completion, GatewayRequest};

#[cfg(test)]
mod tests;
