//! Admin role guard.
//!
//! Layered on the `/api/admin` router with `route_layer`, after
//! `auth_middleware` has injected the `AuthenticatedUser`. The admin's
//! profile is placed in request extensions for handlers that need the actor.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::auth::AuthRejection;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::profile::AuthorizeAdminHandler;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::profile::Profile;

/// Profile of the admin making the request.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Profile);

/// Rejects requests from anyone who is not an admin.
///
/// No authenticated user is 401; a member, instructor or unknown profile
/// is 403.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>().cloned() else {
        return AuthRejection::Unauthenticated.into_response();
    };

    match AuthorizeAdminHandler::new(state.profiles.clone())
        .handle(user.id)
        .await
    {
        Ok(profile) => {
            request.extensions_mut().insert(AdminUser(profile));
            next.run(request).await
        }
        Err(err) => {
            ApiError(err).into_response()
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AdminUser>()
                .cloned()
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}
