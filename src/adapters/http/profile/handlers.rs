//! HTTP handlers for profile endpoints.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use super::dto::{ChangeRoleRequest, UpdateProfileRequest};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{AdminUser, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::profile::{
    ChangeRoleCommand, GetProfileQuery, UpdateProfileCommand,
};
use crate::domain::foundation::ProfileId;

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .get_profile_handler()
        .handle(GetProfileQuery {
            profile_id: user.id,
            email: user.email,
        })
        .await?;

    Ok(Json(profile))
}

/// PATCH /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // The row may not exist yet for a user who signed up elsewhere.
    state
        .get_profile_handler()
        .handle(GetProfileQuery {
            profile_id: user.id,
            email: user.email,
        })
        .await?;

    let profile = state
        .update_profile_handler()
        .handle(UpdateProfileCommand {
            profile_id: user.id,
            full_name: req.full_name,
            phone: req.phone,
        })
        .await?;

    Ok(Json(profile))
}

/// GET /api/admin/profiles
pub async fn list_profiles(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let profiles = state.list_profiles_handler().handle().await?;
    Ok(Json(profiles))
}

/// PUT /api/admin/profiles/:id/role
pub async fn change_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(profile_id): Path<ProfileId>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .change_role_handler()
        .handle(ChangeRoleCommand {
            actor_id: admin.id,
            profile_id,
            role: req.role,
        })
        .await?;

    Ok(Json(profile))
}
