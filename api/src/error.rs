use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use llm_client::LlmError;
use serde_json::json;
use thiserror::Error;

/// Startup errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid port: `{0}`")]
    InvalidPort(String),

    #[error("Invalid CORS origin: `{0}`")]
    InvalidOrigin(String),
}

/// Request-scoped errors, rendered as `{success: false, error: {message}}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Not Found - {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        source: LlmError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream { context, source } = &self {
            tracing::error!("{}: {}", context, source);
        }

        let body = json!({
            "success": false,
            "error": { "message": self.to_string() },
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Validation(err.body_text())
    }
}
