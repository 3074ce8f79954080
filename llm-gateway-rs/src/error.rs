// llm-gateway-rs/src/error.rs
//
// Failure taxonomy for gateway calls. Every failure carries its kind, a
// human-readable message, and when available the HTTP status and raw body
// (or the raw model text for parse failures).

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Classification of a failed gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No credential configured, or the client could not be built
    ConfigurationError,
    /// The request was rejected locally before any network call
    InvalidRequest,
    /// 400 from the upstream
    BadRequest,
    /// 401 from the upstream
    Unauthorized,
    /// 429 from the upstream; the caller must back off on its own
    RateLimited,
    /// Timeout, connect or read failure
    NetworkError,
    /// Any other non-2xx status
    UpstreamError,
    /// The model replied but no JSON object could be extracted
    ParseError,
}

impl FailureKind {
    /// Only transport failures and unclassified upstream statuses are retried
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureKind::NetworkError | FailureKind::UpstreamError)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::ConfigurationError => "configuration_error",
            FailureKind::InvalidRequest => "invalid_request",
            FailureKind::BadRequest => "bad_request",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::NetworkError => "network_error",
            FailureKind::UpstreamError => "upstream_error",
            FailureKind::ParseError => "parse_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified gateway failure
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: FailureKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl GatewayError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ConfigurationError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidRequest, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NetworkError, message)
    }

    /// Parse failure keeping the model text that could not be decoded
    pub fn parse(message: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self::new(FailureKind::ParseError, message).with_body(raw_text)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Map a reqwest transport error to a gateway failure
pub(crate) fn classify_transport(err: reqwest::Error) -> GatewayError {
    if err.is_builder() {
        GatewayError::configuration(format!("Invalid gateway request: {}", err))
    } else if err.is_timeout() {
        GatewayError::network(format!("Request timed out: {}", err))
    } else if err.is_connect() {
        GatewayError::network(format!("Connection failed: {}", err))
    } else {
        GatewayError::network(format!("Network error: {}", err))
    }
}
