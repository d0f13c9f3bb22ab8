//! Field validation helpers shared by entities.

use super::ValidationError;

/// Trims `value` and checks it is non-empty and at most `max_chars` long.
pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    check_length(field, trimmed, max_chars)?;
    Ok(trimmed.to_string())
}

/// Trims an optional value; blank input becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_length(field, trimmed, max_chars)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

/// Checks an integer lies in `min..=max`.
pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::out_of_range(field, min, max, value));
    }
    Ok(())
}

/// Phone numbers: digits, spaces, `+`, `-`, `(`, `)`, at most 32 chars.
pub fn optional_phone(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let phone = optional_text("phone", value, 32)?;
    if let Some(p) = &phone {
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
        if !p.chars().all(allowed) || !p.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "phone",
                "only digits, spaces and + - ( ) are allowed",
            ));
        }
    }
    Ok(phone)
}

fn check_length(field: &str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max_chars {
        return Err(ValidationError::invalid_format(
            field,
            format!("must be at most {} characters", max_chars),
        ));
    }
    Ok(())
}
