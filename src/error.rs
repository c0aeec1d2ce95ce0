//! Error codes and the HTTP error response.
//!
//! Every domain error implements [`ErrorCode`]; handlers convert them into an
//! [`ApiError`], which serializes as
//! `{"error": {"code", "message", "retryable"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::prisma::PrismaError;
use crate::services::auth::AuthError;
use crate::services::ReviewError;

/// Stable machine-readable code for an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// An error ready to be sent to an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { status, code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, code: "E_BAD_REQUEST", message: message.into(), retryable: false }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNAUTHORIZED, code: "E_UNAUTHORIZED", message: message.into(), retryable: false }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "E_INTERNAL",
            message: message.into(),
            retryable: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "retryable": self.retryable,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<PrismaError> for ApiError {
    fn from(err: PrismaError) -> Self {
        let status = match err {
            PrismaError::InvalidCounts(_) => StatusCode::BAD_REQUEST,
            PrismaError::Render(_) | PrismaError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, &err)
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        let status = match err {
            ReviewError::EmptyInput(_) => StatusCode::BAD_REQUEST,
            ReviewError::LlmNotConfigured | ReviewError::Llm(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, &err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, &err)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
