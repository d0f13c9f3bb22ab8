//! ProfileRepository port for profile persistence operations

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::profile::Profile;

/// Repository for the `profiles` table.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a new profile. `Conflict` if the id or email already exists.
    async fn create(&self, profile: &Profile) -> Result<(), DomainError>;

    /// Update name, phone, role and customer id. `NotFound` if missing.
    async fn update(&self, profile: &Profile) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, DomainError>;

    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Profile>, DomainError>;

    /// All profiles, oldest first.
    async fn list(&self) -> Result<Vec<Profile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProfileRepository) {}
    }
}
