//! Top-level router: mounts every feature router and applies the shared
//! tower-http layers.
//!
//! The bearer-token middleware wraps the member and admin API only. Webhook
//! and cron endpoints carry their own credentials and sit outside it.

use std::time::Duration;

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use axum::{middleware, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::billing::{admin_plan_routes, billing_routes, plan_routes};
use super::catalog::{admin_catalog_routes, catalog_routes};
use super::dashboard::{admin_stats_routes, dashboard_routes};
use super::middleware::{auth_middleware, require_admin, AuthState};
use super::ops::{cron_routes, health_routes, webhook_routes};
use super::profile::{admin_profile_routes, profile_routes};
use super::state::AppState;
use crate::config::ServerConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Routes under `/api/admin`, all behind the admin guard.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(admin_catalog_routes())
        .nest("/plans", admin_plan_routes())
        .nest("/profiles", admin_profile_routes())
        .nest("/stats", admin_stats_routes())
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

/// Routes that identify the caller by bearer token.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let validator: AuthState = state.session_validator.clone();

    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/profile", profile_routes())
        .nest("/api/dashboard", dashboard_routes())
        .nest("/api/plans", plan_routes())
        .nest("/api/billing", billing_routes())
        .nest("/api", catalog_routes())
        .nest("/api/admin", admin_routes(state))
        .layer(middleware::from_fn_with_state(validator, auth_middleware))
}

/// Builds the full application with state and layers applied.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(api_routes(state.clone()))
        .merge(health_routes())
        .nest("/api/webhooks", webhook_routes())
        .nest("/api/cron", cron_routes())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// CORS for the member site. Unparseable origins are skipped with a warning;
/// an empty list allows no cross-origin callers.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_origins_are_dropped() {
        let origins = vec![
            "https://academy.example.com".to_string(),
            String::new(),
            "bad\norigin".to_string(),
        ];
        // Constructing the layer must not panic on bad input.
        let _ = cors_layer(&origins);
    }
}
