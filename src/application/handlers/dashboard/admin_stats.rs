//! GetAdminStatsHandler - Query handler for the admin overview counts.

use std::sync::Arc;

use crate::domain::dashboard::AdminStats;
use crate::domain::foundation::DomainError;
use crate::ports::DashboardReader;

pub struct GetAdminStatsHandler {
    reader: Arc<dyn DashboardReader>,
}

impl GetAdminStatsHandler {
    pub fn new(reader: Arc<dyn DashboardReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self) -> Result<AdminStats, DomainError> {
        self.reader.admin_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryCatalog, InMemoryDashboardReader, InMemoryProfileRepository,
        InMemorySubscriptionRepository,
    };
    use crate::domain::catalog::{Location, LocationInput};
    use crate::domain::foundation::ProfileId;
    use crate::domain::profile::{Profile, Role};
    use crate::ports::LocationRepository;

    #[tokio::test]
    async fn counts_roles_and_active_locations() {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());

        let mut admin = Profile::create(ProfileId::new(), "admin@example.com", None);
        admin.change_role(Role::Admin);
        profiles.insert(admin).await;
        profiles
            .insert(Profile::create(ProfileId::new(), "m@example.com", None))
            .await;

        let location = Location::create(LocationInput {
            name: "Downtown".to_string(),
            address: "1 Main St".to_string(),
            city: "Lisbon".to_string(),
            phone: None,
            is_active: true,
        })
        .unwrap();
        LocationRepository::create(catalog.as_ref(), &location)
            .await
            .unwrap();

        let handler = GetAdminStatsHandler::new(Arc::new(InMemoryDashboardReader::new(
            profiles,
            catalog,
            subscriptions,
        )));
        let stats = handler.handle().await.unwrap();

        assert_eq!(stats.profiles_by_role["admin"], 1);
        assert_eq!(stats.profiles_by_role["member"], 1);
        assert_eq!(stats.active_locations, 1);
        assert_eq!(stats.subscriptions_by_status["active"], 0);
    }
}
