//! Routers for dashboard endpoints.

use axum::{routing::get, Router};

use super::handlers::{admin_stats, member_dashboard};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/dashboard`.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(member_dashboard))
}

/// Mounted at `/api/admin/stats`.
pub fn admin_stats_routes() -> Router<AppState> {
    Router::new().route("/", get(admin_stats))
}
