//! Profile entity: one row per auth user.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::validate::{optional_phone, required_text};
use crate::domain::foundation::{ProfileId, Timestamp, ValidationError};

use super::Role;

/// Maximum length of a display name.
pub const MAX_FULL_NAME_CHARS: usize = 120;

/// Profile of an academy user.
///
/// # Invariants
///
/// - `id` equals the auth service user id
/// - `full_name`, when present, is trimmed and at most 120 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    /// Payments provider customer, created at the first checkout.
    #[serde(default, skip_serializing)]
    pub stripe_customer_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// New profiles always start as members; promotion is an admin action.
    pub fn create(id: ProfileId, email: impl Into<String>, full_name: Option<String>) -> Self {
        let now = Timestamp::now();
        let full_name = full_name
            .map(|n| n.trim().chars().take(MAX_FULL_NAME_CHARS).collect::<String>())
            .filter(|n| !n.is_empty());
        Self {
            id,
            email: email.into(),
            full_name,
            phone: None,
            role: Role::Member,
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces name and phone after validating both.
    pub fn update_details(
        &mut self,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<(), ValidationError> {
        let full_name = required_text("full_name", full_name, MAX_FULL_NAME_CHARS)?;
        let phone = optional_phone(phone)?;
        self.full_name = Some(full_name);
        self.phone = phone;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn change_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Timestamp::now();
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
