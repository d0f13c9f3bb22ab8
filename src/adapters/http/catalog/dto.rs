//! Query strings for catalog listings.
//!
//! Create and update bodies deserialize straight into the domain input types.

use serde::Deserialize;

use crate::domain::foundation::LocationId;

/// `?include_inactive=` on admin listings; defaults to showing everything.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AdminListParams {
    #[serde(default)]
    pub include_inactive: Option<bool>,
}

impl AdminListParams {
    pub fn include_inactive(&self) -> bool {
        self.include_inactive.unwrap_or(true)
    }
}

/// `?location_id=` on gym listings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GymFilterParams {
    #[serde(default)]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub include_inactive: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_listing_includes_inactive_by_default() {
        assert!(AdminListParams::default().include_inactive());
        let params = AdminListParams {
            include_inactive: Some(false),
        };
        assert!(!params.include_inactive());
    }
}
