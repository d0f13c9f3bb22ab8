//! HTTP handlers for authentication endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{PasswordResetRequest, SignInRequest, SignUpRequest, UpdatePasswordRequest};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::auth::{SignInCommand, SignUpCommand, UpdatePasswordCommand};

/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .sign_up_handler()
        .handle(SignUpCommand {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sign_in_handler()
        .handle(SignInCommand {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(session))
}

/// POST /api/auth/password-reset
///
/// Always accepted, whether or not the address belongs to an account.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.password_reset_handler().handle(&req.email).await?;

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/auth/password
pub async fn update_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .update_password_handler()
        .handle(UpdatePasswordCommand {
            user,
            new_password: req.password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
