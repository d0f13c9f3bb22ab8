//! HTTP handlers for catalog endpoints.
//!
//! Member handlers never see inactive rows; an inactive row fetched by id
//! is reported as not found.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{AdminListParams, GymFilterParams};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::catalog::{
    GetClassTypeQuery, GetGymQuery, GetLocationQuery, ListGymsQuery, UpdateClassTypeCommand,
    UpdateGymCommand, UpdateLocationCommand,
};
use crate::domain::catalog::{ClassTypeInput, GymInput, LocationInput};
use crate::domain::foundation::{ClassTypeId, GymId, LocationId};

// ════════════════════════════════════════════════════════════════════════════════
// Member Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/locations
pub async fn list_locations(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.list_locations_handler().handle(false).await?))
}

/// GET /api/locations/:id
pub async fn get_location(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<LocationId>,
) -> Result<impl IntoResponse, ApiError> {
    let location = state
        .get_location_handler()
        .handle(GetLocationQuery {
            id,
            include_inactive: false,
        })
        .await?;
    Ok(Json(location))
}

/// GET /api/gyms?location_id=
pub async fn list_gyms(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<GymFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let gyms = state
        .list_gyms_handler()
        .handle(ListGymsQuery {
            location_id: params.location_id,
            include_inactive: false,
        })
        .await?;
    Ok(Json(gyms))
}

/// GET /api/gyms/:id
pub async fn get_gym(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    let gym = state
        .get_gym_handler()
        .handle(GetGymQuery {
            id,
            include_inactive: false,
        })
        .await?;
    Ok(Json(gym))
}

/// GET /api/class-types
pub async fn list_class_types(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.list_class_types_handler().handle(false).await?))
}

/// GET /api/class-types/:id
pub async fn get_class_type(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ClassTypeId>,
) -> Result<impl IntoResponse, ApiError> {
    let class_type = state
        .get_class_type_handler()
        .handle(GetClassTypeQuery {
            id,
            include_inactive: false,
        })
        .await?;
    Ok(Json(class_type))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/locations
pub async fn admin_list_locations(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let locations = state
        .list_locations_handler()
        .handle(params.include_inactive())
        .await?;
    Ok(Json(locations))
}

/// POST /api/admin/locations
pub async fn create_location(
    State(state): State<AppState>,
    Json(input): Json<LocationInput>,
) -> Result<impl IntoResponse, ApiError> {
    let location = state.create_location_handler().handle(input).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// PUT /api/admin/locations/:id
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<LocationId>,
    Json(input): Json<LocationInput>,
) -> Result<impl IntoResponse, ApiError> {
    let location = state
        .update_location_handler()
        .handle(UpdateLocationCommand { id, input })
        .await?;
    Ok(Json(location))
}

/// DELETE /api/admin/locations/:id
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<LocationId>,
) -> Result<impl IntoResponse, ApiError> {
    state.delete_location_handler().handle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/gyms
pub async fn admin_list_gyms(
    State(state): State<AppState>,
    Query(params): Query<GymFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let gyms = state
        .list_gyms_handler()
        .handle(ListGymsQuery {
            location_id: params.location_id,
            include_inactive: params.include_inactive.unwrap_or(true),
        })
        .await?;
    Ok(Json(gyms))
}

/// POST /api/admin/gyms
pub async fn create_gym(
    State(state): State<AppState>,
    Json(input): Json<GymInput>,
) -> Result<impl IntoResponse, ApiError> {
    let gym = state.create_gym_handler().handle(input).await?;
    Ok((StatusCode::CREATED, Json(gym)))
}

/// PUT /api/admin/gyms/:id
pub async fn update_gym(
    State(state): State<AppState>,
    Path(id): Path<GymId>,
    Json(input): Json<GymInput>,
) -> Result<impl IntoResponse, ApiError> {
    let gym = state
        .update_gym_handler()
        .handle(UpdateGymCommand { id, input })
        .await?;
    Ok(Json(gym))
}

/// DELETE /api/admin/gyms/:id
pub async fn delete_gym(
    State(state): State<AppState>,
    Path(id): Path<GymId>,
) -> Result<impl IntoResponse, ApiError> {
    state.delete_gym_handler().handle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/class-types
pub async fn admin_list_class_types(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let class_types = state
        .list_class_types_handler()
        .handle(params.include_inactive())
        .await?;
    Ok(Json(class_types))
}

/// POST /api/admin/class-types
pub async fn create_class_type(
    State(state): State<AppState>,
    Json(input): Json<ClassTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let class_type = state.create_class_type_handler().handle(input).await?;
    Ok((StatusCode::CREATED, Json(class_type)))
}

/// PUT /api/admin/class-types/:id
pub async fn update_class_type(
    State(state): State<AppState>,
    Path(id): Path<ClassTypeId>,
    Json(input): Json<ClassTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let class_type = state
        .update_class_type_handler()
        .handle(UpdateClassTypeCommand { id, input })
        .await?;
    Ok(Json(class_type))
}

/// DELETE /api/admin/class-types/:id
pub async fn delete_class_type(
    State(state): State<AppState>,
    Path(id): Path<ClassTypeId>,
) -> Result<impl IntoResponse, ApiError> {
    state.delete_class_type_handler().handle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
