//! HTTP handlers for billing endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{CancelResponse, CheckoutRequest, PaymentsParams, SubscriptionResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::billing::{StartCheckoutCommand, UpdatePlanCommand};
use crate::domain::billing::PlanInput;
use crate::domain::foundation::PlanId;

// ════════════════════════════════════════════════════════════════════════════════
// Public
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/plans
pub async fn list_plans(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.list_plans_handler().handle(false).await?))
}

// ════════════════════════════════════════════════════════════════════════════════
// Member
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/billing/subscription
pub async fn get_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state.my_subscription_handler().handle(user.id).await?;
    Ok(Json(SubscriptionResponse { subscription }))
}

/// GET /api/billing/payments
pub async fn list_payments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PaymentsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .my_payments_handler()
        .handle(user.id, params.limit())
        .await?;
    Ok(Json(payments))
}

/// POST /api/billing/checkout
pub async fn start_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .start_checkout_handler()
        .handle(StartCheckoutCommand {
            profile_id: user.id,
            plan_id: req.plan_id,
        })
        .await?;
    Ok(Json(session))
}

/// POST /api/billing/portal
pub async fn open_portal(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.billing_portal_handler().handle(user.id).await?;
    Ok(Json(session))
}

/// POST /api/billing/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state.cancel_subscription_handler().handle(user.id).await?;
    Ok(Json(CancelResponse { subscription }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/plans
pub async fn admin_list_plans(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.list_plans_handler().handle(true).await?))
}

/// POST /api/admin/plans
pub async fn create_plan(
    State(state): State<AppState>,
    Json(input): Json<PlanInput>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state.create_plan_handler().handle(input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /api/admin/plans/:id
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<PlanId>,
    Json(input): Json<PlanInput>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .update_plan_handler()
        .handle(UpdatePlanCommand { id, input })
        .await?;
    Ok(Json(plan))
}
