//! Webhook error types for Stripe webhook handling.
//!
//! The HTTP status of each error decides whether Stripe redelivers the event:
//! 2xx and 4xx are final, 5xx is retried.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the accepted window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required metadata field missing from webhook event.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The event references a subscription not stored yet. Usually the
    /// checkout event has not arrived; redelivery resolves it.
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    /// Event was intentionally ignored (not an error condition).
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Calling the payments provider failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Database(_)
                | WebhookError::Provider(_)
                | WebhookError::SubscriptionNotFound(_)
        )
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp => StatusCode::UNAUTHORIZED,

            WebhookError::ParseError(_)
            | WebhookError::MissingMetadata(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,

            // Acknowledged so Stripe stops redelivering
            WebhookError::Ignored(_) => StatusCode::OK,

            WebhookError::SubscriptionNotFound(_)
            | WebhookError::Provider(_)
            | WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Repository and handler failures surfacing inside webhook processing.
///
/// Illegal status transitions mean the event arrived out of order after a
/// newer one; they are acknowledged rather than retried forever.
impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => WebhookError::Ignored(err.message),
            ErrorCode::ExternalServiceError | ErrorCode::PaymentRequired => {
                WebhookError::Provider(err.message)
            }
            ErrorCode::ValidationFailed => WebhookError::ParseError(err.message),
            _ => WebhookError::Database(err.to_string()),
        }
    }
}
