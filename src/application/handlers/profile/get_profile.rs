//! GetProfileHandler - Query handler for the caller's own profile.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, ProfileId};
use crate::domain::profile::Profile;
use crate::ports::ProfileRepository;

/// Query for the caller's profile.
#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub profile_id: ProfileId,
    /// Email from the access token, used when the row has to be created.
    pub email: String,
}

/// Returns the profile, creating it on first access.
///
/// Accounts created directly in the auth service (invites, dashboard) have
/// no profile row until the member first calls the API.
pub struct GetProfileHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl GetProfileHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<Profile, DomainError> {
        if let Some(profile) = self.profiles.find_by_id(&query.profile_id).await? {
            return Ok(profile);
        }

        let profile = Profile::create(query.profile_id, query.email, None);
        match self.profiles.create(&profile).await {
            Ok(()) => {
                tracing::info!(profile_id = %profile.id, "Profile created on first access");
                Ok(profile)
            }
            // A concurrent request created it first
            Err(e) if e.code == ErrorCode::Conflict => self
                .profiles
                .find_by_id(&query.profile_id)
                .await?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }
}
