//! ListProfilesHandler - Admin query over all profiles.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::profile::Profile;
use crate::ports::ProfileRepository;

/// Lists every profile, oldest first.
pub struct ListProfilesHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl ListProfilesHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self) -> Result<Vec<Profile>, DomainError> {
        self.profiles.list().await
    }
}
