//! ChangeRoleHandler - Admin command promoting or demoting a profile.

use std::sync::Arc;

use crate::domain::foundation::{AuthorizationResult, DomainError, ProfileId};
use crate::domain::profile::{Profile, Role};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct ChangeRoleCommand {
    /// The admin making the change.
    pub actor_id: ProfileId,
    pub profile_id: ProfileId,
    pub role: Role,
}

pub struct ChangeRoleHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl ChangeRoleHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, cmd: ChangeRoleCommand) -> Result<Profile, DomainError> {
        // At least one admin must remain able to undo mistakes.
        if cmd.actor_id == cmd.profile_id && cmd.role != Role::Admin {
            AuthorizationResult::denied(
                "profile",
                cmd.actor_id.to_string(),
                "Admins cannot remove their own admin role",
            )
            .into_result()?;
        }

        let mut profile = self
            .profiles
            .find_by_id(&cmd.profile_id)
            .await?
            .ok_or_else(|| DomainError::not_found("profile", cmd.profile_id))?;

        let previous = profile.role;
        profile.change_role(cmd.role);
        self.profiles.update(&profile).await?;

        tracing::info!(
            actor_id = %cmd.actor_id,
            profile_id = %profile.id,
            from = %previous,
            to = %profile.role,
            "Profile role changed"
        );
        Ok(profile)
    }
}
