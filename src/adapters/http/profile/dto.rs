//! Request bodies for profile endpoints.

use serde::Deserialize;

use crate::domain::profile::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}
