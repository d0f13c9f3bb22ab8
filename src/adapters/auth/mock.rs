//! Mock authentication adapters for testing.
//!
//! These adapters implement the `SessionValidator` and `IdentityProvider`
//! ports for use in tests, avoiding the need for a live auth service.
//!
//! # Example
//!
//! ```ignore
//! use academy_hub::adapters::auth::MockSessionValidator;
//! use academy_hub::domain::foundation::{AuthenticatedUser, ProfileId};
//!
//! let validator = MockSessionValidator::new()
//!     .with_user("valid-token", AuthenticatedUser::new(
//!         ProfileId::new(),
//!         "test@example.com",
//!         "valid-token",
//!     ));
//!
//! let result = validator.validate("valid-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, ProfileId};
use crate::ports::{AuthSession, IdentityError, IdentityProvider, IdentityUser, SessionValidator};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock session validator for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a token for a fresh user id; returns the validator and that id.
    pub fn with_test_user(self, token: impl Into<String>) -> (Self, ProfileId) {
        let token = token.into();
        let id = ProfileId::new();
        let user = AuthenticatedUser::new(id, format!("{}@test.example.com", token), &token);
        (self.with_user(token, user), id)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *write(&self.force_error) = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        write(&self.tokens).insert(token.into(), user);
    }

    pub fn remove_token(&self, token: &str) {
        write(&self.tokens).remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = read(&self.force_error).clone() {
            return Err(error);
        }

        read(&self.tokens)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone)]
struct MockAccount {
    id: ProfileId,
    password: String,
}

/// Mock identity provider backed by a map of accounts.
///
/// Issued access tokens have the form `token-<profile id>`; password reset
/// requests are recorded instead of sent.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    accounts: RwLock<HashMap<String, MockAccount>>,
    reset_requests: RwLock<Vec<String>>,
    force_error: RwLock<Option<IdentityError>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-registers an account.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        write(&self.accounts).insert(
            email.to_ascii_lowercase(),
            MockAccount {
                id: ProfileId::new(),
                password: password.to_string(),
            },
        );
        self
    }

    pub fn with_error(self, error: IdentityError) -> Self {
        *write(&self.force_error) = Some(error);
        self
    }

    /// Emails for which a reset was requested, in order.
    pub fn reset_requests(&self) -> Vec<String> {
        read(&self.reset_requests).clone()
    }

    pub fn account_id(&self, email: &str) -> Option<ProfileId> {
        read(&self.accounts)
            .get(&email.to_ascii_lowercase())
            .map(|a| a.id)
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        read(&self.accounts)
            .get(&email.to_ascii_lowercase())
            .map(|a| a.password.clone())
    }

    fn check_forced(&self) -> Result<(), IdentityError> {
        match read(&self.force_error).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _full_name: Option<&str>,
    ) -> Result<IdentityUser, IdentityError> {
        self.check_forced()?;
        let key = email.to_ascii_lowercase();
        let mut accounts = write(&self.accounts);
        if accounts.contains_key(&key) {
            return Err(IdentityError::AlreadyRegistered);
        }
        let id = ProfileId::new();
        accounts.insert(
            key,
            MockAccount {
                id,
                password: password.to_string(),
            },
        );
        Ok(IdentityUser {
            id,
            email: email.to_string(),
        })
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthSession, IdentityUser), IdentityError> {
        self.check_forced()?;
        let account = read(&self.accounts)
            .get(&email.to_ascii_lowercase())
            .cloned()
            .filter(|a| a.password == password)
            .ok_or(IdentityError::InvalidCredentials)?;

        let session = AuthSession {
            access_token: format!("token-{}", account.id),
            refresh_token: format!("refresh-{}", account.id),
            expires_in: 3600,
            token_type: "bearer".to_string(),
        };
        Ok((
            session,
            IdentityUser {
                id: account.id,
                email: email.to_string(),
            },
        ))
    }

    async fn request_password_reset(
        &self,
        email: &str,
        _redirect_to: &str,
    ) -> Result<(), IdentityError> {
        self.check_forced()?;
        write(&self.reset_requests).push(email.to_string());
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        self.check_forced()?;
        let mut accounts = write(&self.accounts);
        let account = accounts
            .values_mut()
            .find(|a| format!("token-{}", a.id) == access_token)
            .ok_or(IdentityError::InvalidCredentials)?;
        account.password = new_password.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ════════════════════════════════════════════════════════════════════════════
    // MockSessionValidator Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn mock_validator_returns_user_for_registered_token() {
        let (validator, id) = MockSessionValidator::new().with_test_user("valid-token");

        let user = validator.validate("valid-token").await.unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.access_token, "valid-token");
    }

    #[tokio::test]
    async fn mock_validator_returns_invalid_token_for_unknown() {
        let validator = MockSessionValidator::new();
        assert!(matches!(
            validator.validate("unknown-token").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn mock_validator_with_error_forces_error() {
        let (validator, _) = MockSessionValidator::new().with_test_user("valid-token");
        let validator = validator.with_error(AuthError::service_unavailable("down"));

        assert!(matches!(
            validator.validate("valid-token").await,
            Err(AuthError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn mock_validator_remove_token_invalidates() {
        let (validator, _) = MockSessionValidator::new().with_test_user("token");
        assert!(validator.validate("token").await.is_ok());

        validator.remove_token("token");

        assert!(validator.validate("token").await.is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // MockIdentityProvider Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let provider = MockIdentityProvider::new();
        let user = provider
            .sign_up("New@Example.com", "hunter22", None)
            .await
            .unwrap();

        let (session, signed_in) = provider.sign_in("new@example.com", "hunter22").await.unwrap();

        assert_eq!(signed_in.id, user.id);
        assert_eq!(session.access_token, format!("token-{}", user.id));
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_already_registered() {
        let provider = MockIdentityProvider::new().with_account("a@example.com", "password1");
        assert!(matches!(
            provider.sign_up("a@example.com", "password2", None).await,
            Err(IdentityError::AlreadyRegistered)
        ));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let provider = MockIdentityProvider::new().with_account("a@example.com", "password1");
        assert!(matches!(
            provider.sign_in("a@example.com", "nope").await,
            Err(IdentityError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn update_password_uses_access_token() {
        let provider = MockIdentityProvider::new().with_account("a@example.com", "password1");
        let id = provider.account_id("a@example.com").unwrap();

        provider
            .update_password(&format!("token-{}", id), "password2")
            .await
            .unwrap();

        assert_eq!(provider.password_of("a@example.com").as_deref(), Some("password2"));
    }
}
