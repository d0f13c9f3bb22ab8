//! Identity provider port: account flows owned by the hosted auth service.
//!
//! Passwords, reset tokens and session issuing never touch this service;
//! implementations forward the request and translate the answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ProfileId};

/// User as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: ProfileId,
    pub email: String,
}

/// Tokens issued at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    AlreadyRegistered,

    /// The auth service refused the request (weak password, bad email...).
    #[error("{0}")]
    Rejected(String),

    #[error("Auth service unavailable: {0}")]
    Unavailable(String),
}

impl From<IdentityError> for DomainError {
    fn from(err: IdentityError) -> Self {
        let code = match &err {
            IdentityError::InvalidCredentials => ErrorCode::Unauthorized,
            IdentityError::AlreadyRegistered => ErrorCode::Conflict,
            IdentityError::Rejected(_) => ErrorCode::ValidationFailed,
            IdentityError::Unavailable(_) => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.to_string())
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register an account. `full_name` is stored as user metadata.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<IdentityUser, IdentityError>;

    /// Password grant. Returns the session plus the user it belongs to.
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthSession, IdentityUser), IdentityError>;

    /// Ask the auth service to email a reset link pointing at `redirect_to`.
    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), IdentityError>;

    /// Change the password of the user owning `access_token`.
    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn IdentityProvider) {}
    }

    #[test]
    fn identity_errors_map_to_domain_codes() {
        let cases = [
            (IdentityError::InvalidCredentials, ErrorCode::Unauthorized),
            (IdentityError::AlreadyRegistered, ErrorCode::Conflict),
            (IdentityError::Rejected("weak".into()), ErrorCode::ValidationFailed),
            (IdentityError::Unavailable("timeout".into()), ErrorCode::ExternalServiceError),
        ];
        for (err, code) in cases {
            assert_eq!(DomainError::from(err).code, code);
        }
    }
}
