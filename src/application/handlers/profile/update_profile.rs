//! UpdateProfileHandler - Command handler for a member editing their details.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::profile::Profile;
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub profile_id: ProfileId,
    pub full_name: String,
    pub phone: Option<String>,
}

pub struct UpdateProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl UpdateProfileHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<Profile, DomainError> {
        let mut profile = self
            .profiles
            .find_by_id(&cmd.profile_id)
            .await?
            .ok_or_else(|| DomainError::not_found("profile", cmd.profile_id))?;

        profile.update_details(&cmd.full_name, cmd.phone.as_deref())?;
        self.profiles.update(&profile).await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::foundation::ErrorCode;

    async fn setup() -> (UpdateProfileHandler, Arc<InMemoryProfileRepository>, ProfileId) {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let profile = Profile::create(ProfileId::new(), "a@example.com", None);
        let id = profile.id;
        repo.insert(profile).await;
        (UpdateProfileHandler::new(repo.clone()), repo, id)
    }

    #[tokio::test]
    async fn updates_name_and_phone() {
        let (handler, repo, id) = setup().await;

        let updated = handler
            .handle(UpdateProfileCommand {
                profile_id: id,
                full_name: "  Ana Silva ".to_string(),
                phone: Some("+1 (555) 010-2000".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.full_name.as_deref(), Some("Ana Silva"));
        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("+1 (555) 010-2000"));
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let (handler, _, id) = setup().await;

        let err = handler
            .handle(UpdateProfileCommand {
                profile_id: id,
                full_name: "   ".to_string(),
                phone: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let (handler, _, _) = setup().await;

        let err = handler
            .handle(UpdateProfileCommand {
                profile_id: ProfileId::new(),
                full_name: "Ana".to_string(),
                phone: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
