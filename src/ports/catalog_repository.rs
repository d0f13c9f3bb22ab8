//! Catalog repository ports: locations, gyms and class types.
//!
//! `list` returns active rows only unless `include_inactive` is set.
//! Unique and foreign-key violations surface as `ErrorCode::Conflict`.

use async_trait::async_trait;

use crate::domain::catalog::{ClassType, Gym, Location};
use crate::domain::foundation::{ClassTypeId, DomainError, GymId, LocationId};

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn create(&self, location: &Location) -> Result<(), DomainError>;

    async fn update(&self, location: &Location) -> Result<(), DomainError>;

    /// `Conflict` while gyms still reference the location.
    async fn delete(&self, id: &LocationId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, DomainError>;

    /// Ordered by name.
    async fn list(&self, include_inactive: bool) -> Result<Vec<Location>, DomainError>;
}

#[async_trait]
pub trait GymRepository: Send + Sync {
    async fn create(&self, gym: &Gym) -> Result<(), DomainError>;

    async fn update(&self, gym: &Gym) -> Result<(), DomainError>;

    async fn delete(&self, id: &GymId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &GymId) -> Result<Option<Gym>, DomainError>;

    /// Ordered by name, optionally restricted to one location.
    async fn list(
        &self,
        location_id: Option<&LocationId>,
        include_inactive: bool,
    ) -> Result<Vec<Gym>, DomainError>;
}

#[async_trait]
pub trait ClassTypeRepository: Send + Sync {
    /// `Conflict` on a duplicate name.
    async fn create(&self, class_type: &ClassType) -> Result<(), DomainError>;

    async fn update(&self, class_type: &ClassType) -> Result<(), DomainError>;

    async fn delete(&self, id: &ClassTypeId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ClassTypeId) -> Result<Option<ClassType>, DomainError>;

    /// Ordered by name.
    async fn list(&self, include_inactive: bool) -> Result<Vec<ClassType>, DomainError>;
}
