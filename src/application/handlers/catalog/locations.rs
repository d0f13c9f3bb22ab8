//! Location handlers - admin CRUD plus member reads.

use std::sync::Arc;

use crate::domain::catalog::{Location, LocationInput};
use crate::domain::foundation::{DomainError, LocationId};
use crate::ports::LocationRepository;

#[derive(Debug, Clone)]
pub struct UpdateLocationCommand {
    pub id: LocationId,
    pub input: LocationInput,
}

/// Lookup by id; inactive rows are hidden unless `include_inactive`.
#[derive(Debug, Clone, Copy)]
pub struct GetLocationQuery {
    pub id: LocationId,
    pub include_inactive: bool,
}

pub struct CreateLocationHandler {
    locations: Arc<dyn LocationRepository>,
}

impl CreateLocationHandler {
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    pub async fn handle(&self, input: LocationInput) -> Result<Location, DomainError> {
        let location = Location::create(input)?;
        self.locations.create(&location).await?;
        tracing::info!(location_id = %location.id, name = %location.name, "Location created");
        Ok(location)
    }
}

pub struct UpdateLocationHandler {
    locations: Arc<dyn LocationRepository>,
}

impl UpdateLocationHandler {
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    pub async fn handle(&self, cmd: UpdateLocationCommand) -> Result<Location, DomainError> {
        let mut location = self
            .locations
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| DomainError::not_found("location", cmd.id))?;

        location.update(cmd.input)?;
        self.locations.update(&location).await?;
        Ok(location)
    }
}

/// Deleting a location that still has gyms is a conflict.
pub struct DeleteLocationHandler {
    locations: Arc<dyn LocationRepository>,
}

impl DeleteLocationHandler {
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    pub async fn handle(&self, id: LocationId) -> Result<(), DomainError> {
        self.locations.delete(&id).await?;
        tracing::info!(location_id = %id, "Location deleted");
        Ok(())
    }
}

pub struct GetLocationHandler {
    locations: Arc<dyn LocationRepository>,
}

impl GetLocationHandler {
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    pub async fn handle(&self, query: GetLocationQuery) -> Result<Location, DomainError> {
        self.locations
            .find_by_id(&query.id)
            .await?
            .filter(|l| query.include_inactive || l.is_active)
            .ok_or_else(|| DomainError::not_found("location", query.id))
    }
}

pub struct ListLocationsHandler {
    locations: Arc<dyn LocationRepository>,
}

impl ListLocationsHandler {
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    pub async fn handle(&self, include_inactive: bool) -> Result<Vec<Location>, DomainError> {
        self.locations.list(include_inactive).await
    }
}
