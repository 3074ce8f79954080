//! Request-level failures and their HTTP mapping.
//!
//! Advisor failures never show up here; they are reported inside the
//! analysis response. Only problems that prevent an analysis do.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sql_safety::SafetyViolation;
use thiserror::Error;

use crate::context_provider::ContextError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("SQL query cannot be empty")]
    EmptyQuery,

    #[error("Query rejected: {0}")]
    UnsafeQuery(#[from] SafetyViolation),

    #[error("{0}")]
    Context(#[from] ContextError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyQuery | ApiError::UnsafeQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Context(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
