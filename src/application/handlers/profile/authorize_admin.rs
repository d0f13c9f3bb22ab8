//! AuthorizeAdminHandler - Role check guarding admin routes.

use std::sync::Arc;

use crate::domain::foundation::{AuthorizationResult, DomainError, ProfileId};
use crate::domain::profile::Profile;
use crate::ports::ProfileRepository;

/// Loads the caller's profile and grants access only to admins.
///
/// A caller without a profile row is denied, not reported missing.
pub struct AuthorizeAdminHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl AuthorizeAdminHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, profile_id: ProfileId) -> Result<Profile, DomainError> {
        let profile = self.profiles.find_by_id(&profile_id).await?;

        let decision = match &profile {
            Some(p) if p.role.can_manage_catalog() => {
                AuthorizationResult::granted("admin", profile_id.to_string())
            }
            Some(p) => AuthorizationResult::denied(
                "admin",
                profile_id.to_string(),
                format!("Role '{}' cannot access admin routes", p.role),
            ),
            None => AuthorizationResult::denied("admin", profile_id.to_string(), "No profile"),
        };
        if !decision.is_granted() {
            tracing::debug!(profile_id = %profile_id, reason = ?decision.denial_reason, "Admin access denied");
        }
        decision.into_result()?;

        profile.ok_or_else(|| DomainError::not_found("profile", profile_id))
    }
}
