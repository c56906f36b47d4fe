use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure of a proxy route, always answered with 500 `{ error, details }`
#[derive(Debug, Error)]
#[error("{error}: {details}")]
pub struct ApiError {
    /// Short, stable description of what failed
    pub error: &'static str,
    /// Underlying cause
    pub details: String,
}

impl ApiError {
    pub fn new(error: &'static str, cause: impl std::fmt::Display) -> Self {
        Self {
            error,
            details: cause.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.error, "details": self.details });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
