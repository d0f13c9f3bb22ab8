//! Password reset and password change handlers.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::ports::IdentityProvider;

use super::sign_up::{check_email, check_password};

/// Asks the auth service to email a reset link.
///
/// Always succeeds once the email is well-formed so callers cannot probe
/// which addresses have accounts; failures are only logged.
pub struct RequestPasswordResetHandler {
    identity: Arc<dyn IdentityProvider>,
    /// Page on the member site the reset link lands on.
    redirect_to: String,
}

impl RequestPasswordResetHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>, redirect_to: impl Into<String>) -> Self {
        Self {
            identity,
            redirect_to: redirect_to.into(),
        }
    }

    pub async fn handle(&self, email: &str) -> Result<(), DomainError> {
        let email = check_email(email)?;
        if let Err(e) = self
            .identity
            .request_password_reset(&email, &self.redirect_to)
            .await
        {
            tracing::warn!(error = %e, "Password reset request failed");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePasswordCommand {
    pub user: AuthenticatedUser,
    pub new_password: String,
}

/// Changes the caller's password using their own access token.
pub struct UpdatePasswordHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl UpdatePasswordHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub async fn handle(&self, cmd: UpdatePasswordCommand) -> Result<(), DomainError> {
        check_password(&cmd.new_password)?;
        self.identity
            .update_password(&cmd.user.access_token, &cmd.new_password)
            .await?;
        tracing::info!(profile_id = %cmd.user.id, "Password updated");
        Ok(())
    }
}
