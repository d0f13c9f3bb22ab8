//! Routers for profile endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{change_role, get_profile, list_profiles, update_profile};
use crate::adapters::http::state::AppState;

/// Member routes, mounted at `/api/profile`.
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).patch(update_profile))
}

/// Admin routes, mounted at `/api/admin/profiles`.
pub fn admin_profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles))
        .route("/:id/role", put(change_role))
}
