//! Stripe webhook endpoint.
//!
//! The signature covers the exact request bytes, so the body is taken raw
//! and only parsed after verification.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::state::AppState;
use crate::application::handlers::billing::HandleStripeWebhookCommand;
use crate::domain::billing::WebhookError;
use crate::ports::WebhookResult;

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// POST /api/webhooks/stripe
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("BAD_REQUEST", "Missing Stripe-Signature header")),
        )
            .into_response();
    };

    let command = HandleStripeWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    match state.webhook_handler().handle(command).await {
        Ok(WebhookResult::Processed) => Json(json!({ "received": true })).into_response(),
        Ok(WebhookResult::AlreadyProcessed) => {
            Json(json!({ "received": true, "duplicate": true })).into_response()
        }
        Err(err) => webhook_error_response(err),
    }
}

fn webhook_error_response(err: WebhookError) -> Response {
    let status = err.status_code();
    if err.is_retryable() {
        tracing::error!(error = %err, status = status.as_u16(), "Stripe webhook failed, provider will redeliver");
    } else {
        tracing::warn!(error = %err, status = status.as_u16(), "Stripe webhook rejected");
    }

    let body = match &err {
        WebhookError::Ignored(_) => return Json(json!({ "received": true })).into_response(),
        WebhookError::InvalidSignature
        | WebhookError::TimestampOutOfRange
        | WebhookError::InvalidTimestamp => ErrorResponse::new("UNAUTHORIZED", err.to_string()),
        _ if status.is_server_error() => {
            ErrorResponse::new("INTERNAL_ERROR", "Webhook processing failed")
        }
        _ => ErrorResponse::new("BAD_REQUEST", err.to_string()),
    };
    (status, Json(body)).into_response()
}
