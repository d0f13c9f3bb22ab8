//! Physical academy locations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::validate::{optional_phone, required_text};
use crate::domain::foundation::{LocationId, Timestamp, ValidationError};

/// Editable fields of a location, as submitted by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationInput {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

pub(super) fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Location {
    pub fn create(input: LocationInput) -> Result<Self, ValidationError> {
        let now = Timestamp::now();
        let mut location = Self {
            id: LocationId::new(),
            name: String::new(),
            address: String::new(),
            city: String::new(),
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        location.update(input)?;
        location.updated_at = now;
        Ok(location)
    }

    /// Replaces every editable field. Nothing changes if validation fails.
    pub fn update(&mut self, input: LocationInput) -> Result<(), ValidationError> {
        let name = required_text("name", &input.name, 120)?;
        let address = required_text("address", &input.address, 255)?;
        let city = required_text("city", &input.city, 120)?;
        let phone = optional_phone(input.phone.as_deref())?;

        self.name = name;
        self.address = address;
        self.city = city;
        self.phone = phone;
        self.is_active = input.is_active;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
