//! Routers for machine-facing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::cron::process_retries;
use super::health::health;
use super::webhooks::handle_stripe_webhook;
use crate::adapters::http::state::AppState;

/// Mounted at the root.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Mounted at `/api/webhooks`; no user auth, the signature is verified instead.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

/// Mounted at `/api/cron`.
pub fn cron_routes() -> Router<AppState> {
    Router::new().route("/process-retries", post(process_retries))
}
