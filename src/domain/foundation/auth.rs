//! Authentication types for the domain layer.
//!
//! These types represent a caller whose access token was accepted by the
//! `SessionValidator` port. They carry no provider types, so the BaaS JWT
//! adapter and the test mock populate them the same way.

use super::ProfileId;
use thiserror::Error;

/// Authenticated user extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Auth service user id; doubles as the profile id.
    pub id: ProfileId,

    /// Email address from the token claims.
    pub email: String,

    /// The raw bearer token, forwarded when calling the auth service on the
    /// user's behalf (password update).
    pub access_token: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: ProfileId, email: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            access_token: access_token.into(),
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the user no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// User exists but lacks required permissions for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// The authentication service is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound
        )
    }
}
