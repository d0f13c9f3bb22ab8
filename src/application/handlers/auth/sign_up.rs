//! SignUpHandler - Registers an account with the auth service and creates
//! the member profile.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::profile::Profile;
use crate::ports::{IdentityProvider, ProfileRepository};

/// Passwords shorter than this are rejected before calling the auth service.
pub const MIN_PASSWORD_CHARS: usize = 8;

pub(super) fn check_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_CHARS {
        return Err(ValidationError::invalid_format(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_CHARS),
        ));
    }
    Ok(())
}

pub(super) fn check_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(email.to_ascii_lowercase())
        }
        _ => Err(ValidationError::invalid_format("email", "not an email address")),
    }
}

#[derive(Debug, Clone)]
pub struct SignUpCommand {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

pub struct SignUpHandler {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
}

impl SignUpHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { identity, profiles }
    }

    pub async fn handle(&self, cmd: SignUpCommand) -> Result<Profile, DomainError> {
        let email = check_email(&cmd.email)?;
        check_password(&cmd.password)?;

        let user = self
            .identity
            .sign_up(&email, &cmd.password, cmd.full_name.as_deref())
            .await?;

        let profile = Profile::create(user.id, user.email, cmd.full_name);
        match self.profiles.create(&profile).await {
            Ok(()) => {}
            // A database trigger may already have inserted the row.
            Err(e) if e.code == ErrorCode::Conflict => {
                tracing::debug!(profile_id = %profile.id, "Profile already present after sign-up");
            }
            Err(e) => return Err(e),
        }

        tracing::info!(profile_id = %profile.id, "Member signed up");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::profile::Role;

    fn cmd(email: &str, password: &str) -> SignUpCommand {
        SignUpCommand {
            email: email.to_string(),
            password: password.to_string(),
            full_name: Some("Ana Silva".to_string()),
        }
    }

    #[tokio::test]
    async fn creates_member_profile() {
        let identity = Arc::new(MockIdentityProvider::new());
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let handler = SignUpHandler::new(identity.clone(), profiles.clone());

        let profile = handler.handle(cmd(" Ana@Example.com ", "hunter2222")).await.unwrap();

        assert_eq!(profile.role, Role::Member);
        assert_eq!(profile.email, "ana@example.com");
        assert_eq!(identity.account_id("ana@example.com"), Some(profile.id));
        assert!(profiles.find_by_id(&profile.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn short_password_never_reaches_auth_service() {
        let identity = Arc::new(MockIdentityProvider::new());
        let handler = SignUpHandler::new(identity.clone(), Arc::new(InMemoryProfileRepository::new()));

        let err = handler.handle(cmd("a@example.com", "short")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(identity.account_id("a@example.com").is_none());
    }

    #[tokio::test]
    async fn existing_account_conflicts() {
        let identity =
            Arc::new(MockIdentityProvider::new().with_account("a@example.com", "password1"));
        let handler = SignUpHandler::new(identity, Arc::new(InMemoryProfileRepository::new()));

        let err = handler.handle(cmd("a@example.com", "password2")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(check_email("no-at-sign").is_err());
        assert!(check_email("a@localhost").is_err());
        assert_eq!(check_email("A@B.io").unwrap(), "a@b.io");
    }
}
