//! Router for authentication endpoints, mounted at `/api/auth`.

use axum::{routing::post, Router};

use super::handlers::{request_password_reset, sign_in, sign_up, update_password};
use crate::adapters::http::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/password-reset", post(request_password_reset))
        .route("/password", post(update_password))
}
