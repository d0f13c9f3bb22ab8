//! Gym handlers - admin CRUD plus member reads.

use std::sync::Arc;

use crate::domain::catalog::{Gym, GymInput};
use crate::domain::foundation::{DomainError, GymId, LocationId};
use crate::ports::{GymRepository, LocationRepository};

#[derive(Debug, Clone)]
pub struct UpdateGymCommand {
    pub id: GymId,
    pub input: GymInput,
}

#[derive(Debug, Clone, Copy)]
pub struct GetGymQuery {
    pub id: GymId,
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListGymsQuery {
    pub location_id: Option<LocationId>,
    pub include_inactive: bool,
}

/// Fails with a field error when the referenced location does not exist.
async fn ensure_location(
    locations: &dyn LocationRepository,
    id: &LocationId,
) -> Result<(), DomainError> {
    match locations.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::validation(
            "location_id",
            format!("Location {} does not exist", id),
        )),
    }
}

pub struct CreateGymHandler {
    gyms: Arc<dyn GymRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl CreateGymHandler {
    pub fn new(gyms: Arc<dyn GymRepository>, locations: Arc<dyn LocationRepository>) -> Self {
        Self { gyms, locations }
    }

    pub async fn handle(&self, input: GymInput) -> Result<Gym, DomainError> {
        let gym = Gym::create(input)?;
        ensure_location(self.locations.as_ref(), &gym.location_id).await?;
        self.gyms.create(&gym).await?;
        tracing::info!(gym_id = %gym.id, location_id = %gym.location_id, "Gym created");
        Ok(gym)
    }
}

pub struct UpdateGymHandler {
    gyms: Arc<dyn GymRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl UpdateGymHandler {
    pub fn new(gyms: Arc<dyn GymRepository>, locations: Arc<dyn LocationRepository>) -> Self {
        Self { gyms, locations }
    }

    pub async fn handle(&self, cmd: UpdateGymCommand) -> Result<Gym, DomainError> {
        let mut gym = self
            .gyms
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| DomainError::not_found("gym", cmd.id))?;

        if cmd.input.location_id != gym.location_id {
            ensure_location(self.locations.as_ref(), &cmd.input.location_id).await?;
        }
        gym.update(cmd.input)?;
        self.gyms.update(&gym).await?;
        Ok(gym)
    }
}

pub struct DeleteGymHandler {
    gyms: Arc<dyn GymRepository>,
}

impl DeleteGymHandler {
    pub fn new(gyms: Arc<dyn GymRepository>) -> Self {
        Self { gyms }
    }

    pub async fn handle(&self, id: GymId) -> Result<(), DomainError> {
        self.gyms.delete(&id).await?;
        tracing::info!(gym_id = %id, "Gym deleted");
        Ok(())
    }
}

pub struct GetGymHandler {
    gyms: Arc<dyn GymRepository>,
}

impl GetGymHandler {
    pub fn new(gyms: Arc<dyn GymRepository>) -> Self {
        Self { gyms }
    }

    pub async fn handle(&self, query: GetGymQuery) -> Result<Gym, DomainError> {
        self.gyms
            .find_by_id(&query.id)
            .await?
            .filter(|g| query.include_inactive || g.is_active)
            .ok_or_else(|| DomainError::not_found("gym", query.id))
    }
}

pub struct ListGymsHandler {
    gyms: Arc<dyn GymRepository>,
}

impl ListGymsHandler {
    pub fn new(gyms: Arc<dyn GymRepository>) -> Self {
        Self { gyms }
    }

    pub async fn handle(&self, query: ListGymsQuery) -> Result<Vec<Gym>, DomainError> {
        self.gyms
            .list(query.location_id.as_ref(), query.include_inactive)
            .await
    }
}
