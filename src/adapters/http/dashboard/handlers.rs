//! HTTP handlers for dashboard endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::dashboard::GetMemberDashboardQuery;

/// GET /api/dashboard
pub async fn member_dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = state
        .member_dashboard_handler()
        .handle(GetMemberDashboardQuery {
            profile_id: user.id,
            email: user.email,
        })
        .await?;
    Ok(Json(dashboard))
}

/// GET /api/admin/stats
pub async fn admin_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.admin_stats_handler().handle().await?))
}
