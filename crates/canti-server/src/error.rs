//! JSON error responses for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use canti_core::CantiError;
use serde_json::json;

/// API error with status code and client-facing message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn invalid_request() -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: "Invalid request data" }
    }
    pub fn upstream_failure() -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: "Failed to contact OpenAI API" }
    }
    pub fn method_not_allowed() -> Self {
        Self { status: StatusCode::METHOD_NOT_ALLOWED, message: "Method not allowed" }
    }
    pub fn not_found() -> Self {
        Self { status: StatusCode::NOT_FOUND, message: "Not found" }
    }
    pub fn internal() -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: "Internal server error" }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Error detail stays in the server log; callers only see the fixed message.
impl From<CantiError> for ApiError {
    fn from(err: CantiError) -> Self {
        match &err {
            CantiError::InvalidRequest(_) => {
                tracing::warn!(error = %err, "rejecting request");
                ApiError::invalid_request()
            }
            CantiError::Upstream(_) => {
                tracing::error!(error = %err, "Error fetching OpenAI response");
                ApiError::upstream_failure()
            }
            _ => {
                tracing::error!(error = %err, "request failed");
                ApiError::internal()
            }
        }
    }
}
