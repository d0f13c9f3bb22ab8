//! Class types offered by the academy (e.g. "Kids Judo", "Open Mat").

use serde::{Deserialize, Serialize};

use crate::domain::foundation::validate::{in_range, optional_text, required_text};
use crate::domain::foundation::{ClassTypeId, Timestamp, ValidationError};

use super::location::default_active;

pub const MAX_CLASS_DURATION_MINUTES: i32 = 480;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassTypeInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Name uniqueness is enforced by the database and surfaces as a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    pub id: ClassTypeId,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClassType {
    pub fn create(input: ClassTypeInput) -> Result<Self, ValidationError> {
        let now = Timestamp::now();
        let mut class_type = Self {
            id: ClassTypeId::new(),
            name: String::new(),
            description: None,
            duration_minutes: 0,
            color: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        class_type.update(input)?;
        class_type.updated_at = now;
        Ok(class_type)
    }

    pub fn update(&mut self, input: ClassTypeInput) -> Result<(), ValidationError> {
        let name = required_text("name", &input.name, 120)?;
        let description = optional_text("description", input.description.as_deref(), 2000)?;
        in_range(
            "duration_minutes",
            input.duration_minutes.into(),
            1,
            MAX_CLASS_DURATION_MINUTES.into(),
        )?;
        let color = optional_text("color", input.color.as_deref(), 7)?
            .map(normalize_color)
            .transpose()?;

        self.name = name;
        self.description = description;
        self.duration_minutes = input.duration_minutes;
        self.color = color;
        self.is_active = input.is_active;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// Accepts `#rrggbb` in any case and stores it lowercased.
fn normalize_color(color: String) -> Result<String, ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(ValidationError::invalid_format("color", "expected #rrggbb"));
    }
    Ok(color.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input() -> ClassTypeInput {
        ClassTypeInput {
            name: "Fundamentals".into(),
            description: None,
            duration_minutes: 60,
            color: Some("#1A2b3C".into()),
            is_active: true,
        }
    }

    #[test]
    fn create_normalizes_color() {
        let ct = ClassType::create(input()).unwrap();
        assert_eq!(ct.color.as_deref(), Some("#1a2b3c"));
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        for ok in [1, 480] {
            let mut i = input();
            i.duration_minutes = ok;
            assert!(ClassType::create(i).is_ok());
        }
        for bad in [0, 481] {
            let mut i = input();
            i.duration_minutes = bad;
            assert!(ClassType::create(i).is_err());
        }
    }

    #[test]
    fn malformed_colors_are_rejected() {
        for bad in ["red", "#12345", "#12345g", "123456"] {
            let mut i = input();
            i.color = Some(bad.into());
            assert!(ClassType::create(i).is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn blank_color_is_none() {
        let mut i = input();
        i.color = Some("".into());
        assert!(ClassType::create(i).unwrap().color.is_none());
    }

    proptest! {
        #[test]
        fn any_hex_color_is_accepted(hex in "[0-9a-fA-F]{6}") {
            let mut i = input();
            i.color = Some(format!("#{}", hex));
            let ct = ClassType::create(i).unwrap();
            prop_assert_eq!(ct.color, Some(format!("#{}", hex.to_ascii_lowercase())));
        }
    }
}
