//! API error type and JSON error body.
//!
//! Every failed request answers `{ "code": "...", "message": "..." }`, with
//! optional `details` for validation failures.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }
}

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::ExternalServiceError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.code);

        let body = match err.code {
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                tracing::error!(code = %err.code, error = %err.message, "Request failed");
                ErrorResponse::new(err.code.to_string(), "An internal error occurred")
            }
            ErrorCode::ExternalServiceError => {
                tracing::error!(code = %err.code, error = %err.message, "Upstream service failed");
                ErrorResponse::new(err.code.to_string(), "An upstream service failed")
            }
            _ => ErrorResponse {
                code: err.code.to_string(),
                message: err.message,
                details: err.details,
            },
        };

        (status, Json(body)).into_response()
    }
}
