use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::{ErrorKind, LlmError};
use crate::tailoring::pipeline::INVALID_API_KEY_MESSAGE;

/// Application-level error type for the endpoints that do not answer with a
/// tailoring envelope.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Llm(e) if e.is_invalid_api_key() => (
                StatusCode::UNAUTHORIZED,
                "INVALID_API_KEY",
                INVALID_API_KEY_MESSAGE.to_string(),
            ),
            AppError::Llm(e) => match e.kind() {
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
                ErrorKind::Provider => {
                    tracing::error!("LLM provider error: {e}");
                    (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", e.to_string())
                }
                ErrorKind::SchemaViolation => {
                    tracing::error!("LLM schema violation: {e}");
                    (StatusCode::BAD_GATEWAY, "SCHEMA_VIOLATION", e.to_string())
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
