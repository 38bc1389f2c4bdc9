use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::recommendation::validator::ValidationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every kind stays distinguishable all the way to the HTTP response so the front-end
/// can tell "bad input" from "AI unreachable" from "AI replied with garbage".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),

    #[error("Recommendation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed recommendation: {0}")]
    MalformedResponse(String),

    #[error("Recommendation failed validation: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ServiceUnavailable(detail) => AppError::ServiceUnavailable(detail),
            LlmError::MalformedResponse(detail) => AppError::MalformedResponse(detail),
        }
    }
}

/// A body that is not JSON, or JSON of the wrong shape, is bad input like any other.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidPreferences(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::InvalidPreferences(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_PREFERENCES", msg.clone())
            }
            AppError::ServiceUnavailable(detail) => {
                tracing::error!("Recommendation service unavailable: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "The AI recommendation service could not be reached. Please try again."
                        .to_string(),
                )
            }
            AppError::MalformedResponse(detail) => {
                tracing::error!("Malformed recommendation: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The AI service returned a response that could not be read. Please try again."
                        .to_string(),
                )
            }
            AppError::Validation(e) => {
                tracing::error!("Recommendation failed validation: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "VALIDATION_ERROR",
                    format!("The AI service returned an incomplete build: {e}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
