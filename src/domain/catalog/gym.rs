//! Gyms: training floors or rooms inside a location.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::validate::{in_range, optional_text, required_text};
use crate::domain::foundation::{GymId, LocationId, Timestamp, ValidationError};

use super::location::default_active;

pub const MAX_GYM_CAPACITY: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GymInput {
    pub location_id: LocationId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gym {
    pub id: GymId,
    pub location_id: LocationId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Gym {
    /// Validates field shapes only; the location's existence is checked by
    /// the handler and enforced by the foreign key.
    pub fn create(input: GymInput) -> Result<Self, ValidationError> {
        let now = Timestamp::now();
        let mut gym = Self {
            id: GymId::new(),
            location_id: input.location_id,
            name: String::new(),
            description: None,
            capacity: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        gym.update(input)?;
        gym.updated_at = now;
        Ok(gym)
    }

    pub fn update(&mut self, input: GymInput) -> Result<(), ValidationError> {
        let name = required_text("name", &input.name, 120)?;
        let description = optional_text("description", input.description.as_deref(), 2000)?;
        if let Some(capacity) = input.capacity {
            in_range("capacity", capacity.into(), 1, MAX_GYM_CAPACITY.into())?;
        }

        self.location_id = input.location_id;
        self.name = name;
        self.description = description;
        self.capacity = input.capacity;
        self.is_active = input.is_active;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> GymInput {
        GymInput {
            location_id: LocationId::new(),
            name: "Mat Room A".into(),
            description: Some("Main mat".into()),
            capacity: Some(40),
            is_active: true,
        }
    }

    #[test]
    fn create_accepts_valid_input() {
        let gym = Gym::create(input()).unwrap();
        assert_eq!(gym.name, "Mat Room A");
        assert_eq!(gym.capacity, Some(40));
    }

    #[test]
    fn capacity_must_be_within_bounds() {
        for bad in [0, -3, 10_001] {
            let mut i = input();
            i.capacity = Some(bad);
            assert!(matches!(
                Gym::create(i),
                Err(ValidationError::OutOfRange { .. })
            ));
        }
        let mut i = input();
        i.capacity = None;
        assert!(Gym::create(i).is_ok());
    }

    #[test]
    fn update_can_move_gym_to_another_location() {
        let mut gym = Gym::create(input()).unwrap();
        let mut i = input();
        let target = LocationId::new();
        i.location_id = target;
        gym.update(i).unwrap();
        assert_eq!(gym.location_id, target);
    }

    #[test]
    fn name_is_required() {
        let mut i = input();
        i.name = "".into();
        assert_eq!(Gym::create(i).unwrap_err(), ValidationError::empty_field("name"));
    }
}
