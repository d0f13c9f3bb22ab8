//! Authorization result type.
//!
//! Role checks follow one pattern: load the caller's profile, decide, log the
//! decision, then convert into `Result<(), DomainError>`. This type makes the
//! last two steps uniform across handlers.

use super::{DomainError, ErrorCode};

/// Result of an authorization check.
///
/// Contains both the decision and context for logging.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    /// Whether access was granted.
    pub granted: bool,

    /// The resource type being accessed (e.g., "Catalog", "Profile").
    pub resource_type: &'static str,

    /// The user who requested access.
    pub user_id: String,

    /// Reason for denial (if denied).
    pub denial_reason: Option<String>,
}

impl AuthorizationResult {
    /// Creates a successful authorization result.
    pub fn granted(resource_type: &'static str, user_id: impl Into<String>) -> Self {
        Self {
            granted: true,
            resource_type,
            user_id: user_id.into(),
            denial_reason: None,
        }
    }

    /// Creates a denied authorization result.
    pub fn denied(
        resource_type: &'static str,
        user_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            granted: false,
            resource_type,
            user_id: user_id.into(),
            denial_reason: Some(reason.into()),
        }
    }

    /// Converts this result to a `Result<(), DomainError>`.
    ///
    /// Returns `Ok(())` if granted, `Err(Forbidden)` if denied.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.granted {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                self.denial_reason
                    .unwrap_or_else(|| "Access denied".to_string()),
            )
            .with_detail("resource_type", self.resource_type)
            .with_detail("user_id", self.user_id))
        }
    }

    /// Returns true if access was granted.
    pub fn is_granted(&self) -> bool {
        self.granted
    }
}
