//! Cron-triggered maintenance endpoint.
//!
//! Authorized by `Authorization: Bearer <cron secret>`; the secret is
//! compared in constant time.

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::adapters::http::error::{ApiError, ErrorResponse};
use crate::adapters::http::state::AppState;

/// True when the bearer token equals `secret`. An empty secret never matches.
pub fn cron_token_matches(headers: &HeaderMap, secret: &str) -> bool {
    let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return false;
    };
    !secret.is_empty() && bool::from(token.as_bytes().ct_eq(secret.as_bytes()))
}

/// POST /api/cron/process-retries
pub async fn process_retries(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !cron_token_matches(&headers, state.settings.cron_secret.expose_secret()) {
        tracing::warn!("Cron request with missing or wrong secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("UNAUTHORIZED", "Invalid cron secret")),
        )
            .into_response();
    }

    match state.retries_handler().handle().await {
        Ok(report) => {
            tracing::info!(
                examined = report.examined,
                recovered = report.recovered,
                still_failing = report.still_failing,
                abandoned = report.abandoned,
                purged = report.purged_webhook_events,
                "Payment retry pass finished"
            );
            Json(report).into_response()
        }
        Err(err) => ApiError(err).into_response(),
    }
}
