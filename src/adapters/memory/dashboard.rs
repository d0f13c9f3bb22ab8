//! In-memory dashboard reader computed from the other in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::dashboard::AdminStats;
use crate::domain::foundation::DomainError;
use crate::ports::DashboardReader;

use super::{InMemoryCatalog, InMemoryProfileRepository, InMemorySubscriptionRepository};

pub struct InMemoryDashboardReader {
    profiles: Arc<InMemoryProfileRepository>,
    catalog: Arc<InMemoryCatalog>,
    subscriptions: Arc<InMemorySubscriptionRepository>,
}

impl InMemoryDashboardReader {
    pub fn new(
        profiles: Arc<InMemoryProfileRepository>,
        catalog: Arc<InMemoryCatalog>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
    ) -> Self {
        Self {
            profiles,
            catalog,
            subscriptions,
        }
    }
}

#[async_trait]
impl DashboardReader for InMemoryDashboardReader {
    async fn admin_stats(&self) -> Result<AdminStats, DomainError> {
        let mut stats = AdminStats::empty();

        for profile in self.profiles.all().await {
            *stats
                .profiles_by_role
                .entry(profile.role.as_str().to_string())
                .or_insert(0) += 1;
        }
        for subscription in self.subscriptions.all().await {
            *stats
                .subscriptions_by_status
                .entry(subscription.status.as_str().to_string())
                .or_insert(0) += 1;
        }
        let (locations, gyms, class_types) = self.catalog.active_counts().await;
        stats.active_locations = locations;
        stats.active_gyms = gyms;
        stats.active_class_types = class_types;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ProfileId;
    use crate::domain::profile::{Profile, Role};
    use crate::ports::ProfileRepository;

    #[tokio::test]
    async fn counts_profiles_by_role() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let mut admin = Profile::create(ProfileId::new(), "admin@example.com", None);
        admin.change_role(Role::Admin);
        profiles.create(&admin).await.unwrap();
        profiles
            .create(&Profile::create(ProfileId::new(), "m1@example.com", None))
            .await
            .unwrap();
        profiles
            .create(&Profile::create(ProfileId::new(), "m2@example.com", None))
            .await
            .unwrap();

        let reader = InMemoryDashboardReader::new(
            profiles,
            Arc::new(InMemoryCatalog::new()),
            Arc::new(InMemorySubscriptionRepository::new()),
        );
        let stats = reader.admin_stats().await.unwrap();

        assert_eq!(stats.profiles_by_role.get("admin"), Some(&1));
        assert_eq!(stats.profiles_by_role.get("member"), Some(&2));
        assert_eq!(stats.profiles_by_role.get("instructor"), Some(&0));
        assert!(!stats.subscriptions_by_status.is_empty());
        assert!(stats.subscriptions_by_status.values().all(|&n| n == 0));
        assert_eq!(stats.active_locations, 0);
    }
}
