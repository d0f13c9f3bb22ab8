//! In-memory profile repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::profile::Profile;
use crate::ports::ProfileRepository;

#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile, replacing any with the same id.
    pub async fn insert(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.id, profile);
    }

    pub(crate) async fn all(&self) -> Vec<Profile> {
        self.profiles.read().await.values().cloned().collect()
    }
}

fn customer_taken(profiles: &HashMap<ProfileId, Profile>, profile: &Profile) -> bool {
    match &profile.stripe_customer_id {
        Some(customer) => profiles
            .values()
            .any(|p| p.id != profile.id && p.stripe_customer_id.as_ref() == Some(customer)),
        None => false,
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.id)
            || profiles
                .values()
                .any(|p| p.email.eq_ignore_ascii_case(&profile.email))
        {
            return Err(DomainError::conflict("Profile already exists"));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id) {
            return Err(DomainError::not_found("Profile", profile.id));
        }
        if customer_taken(&profiles, profile) {
            return Err(DomainError::conflict(
                "Stripe customer is linked to another profile",
            ));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, DomainError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Profile>, DomainError> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|p| p.stripe_customer_id.as_deref() == Some(customer_id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, DomainError> {
        let mut profiles = self.all().await;
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = InMemoryProfileRepository::new();
        repo.create(&Profile::create(ProfileId::new(), "a@example.com", None))
            .await
            .unwrap();

        let err = repo
            .create(&Profile::create(ProfileId::new(), "A@example.com", None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn finds_by_customer_id() {
        let repo = InMemoryProfileRepository::new();
        let mut profile = Profile::create(ProfileId::new(), "a@example.com", None);
        repo.create(&profile).await.unwrap();
        profile.stripe_customer_id = Some("cus_1".to_string());
        repo.update(&profile).await.unwrap();

        let found = repo.find_by_stripe_customer_id("cus_1").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(profile.id));
    }

    #[tokio::test]
    async fn update_of_missing_profile_is_not_found() {
        let repo = InMemoryProfileRepository::new();
        let profile = Profile::create(ProfileId::new(), "a@example.com", None);
        let err = repo.update(&profile).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
