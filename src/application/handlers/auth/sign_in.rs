//! SignInHandler - Password sign-in passed through to the auth service.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{AuthSession, IdentityProvider};

use super::sign_up::check_email;

#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub email: String,
    pub password: String,
}

pub struct SignInHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl SignInHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<AuthSession, DomainError> {
        let email = check_email(&cmd.email)?;
        let (session, user) = self.identity.sign_in(&email, &cmd.password).await?;
        tracing::debug!(profile_id = %user.id, "Member signed in");
        Ok(session)
    }
}
