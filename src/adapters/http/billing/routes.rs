//! Routers for billing endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    admin_list_plans, cancel_subscription, create_plan, get_subscription, list_payments,
    list_plans, open_portal, start_checkout, update_plan,
};
use crate::adapters::http::state::AppState;

/// Public plan listing, mounted at `/api/plans`.
pub fn plan_routes() -> Router<AppState> {
    Router::new().route("/", get(list_plans))
}

/// Member routes, mounted at `/api/billing`.
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/subscription", get(get_subscription))
        .route("/payments", get(list_payments))
        .route("/checkout", post(start_checkout))
        .route("/portal", post(open_portal))
        .route("/cancel", post(cancel_subscription))
}

/// Admin routes, mounted at `/api/admin/plans`.
pub fn admin_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_plans).post(create_plan))
        .route("/:id", put(update_plan))
}
