//! sqlx error translation shared by the Postgres repositories.

use crate::domain::foundation::{DomainError, ErrorCode};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a sqlx error to a `DomainError`.
///
/// Unique and foreign-key violations become `Conflict` and carry the
/// constraint name; anything else is a `DatabaseError`.
pub(crate) fn db_error(action: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or_default().to_string();
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return DomainError::conflict(format!("Failed to {}: duplicate value", action))
                    .with_detail("constraint", constraint);
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return DomainError::conflict(format!(
                    "Failed to {}: row is referenced or references a missing row",
                    action
                ))
                .with_detail("constraint", constraint);
            }
            _ => {}
        }
    }
    tracing::error!(action, error = %err, "Database query failed");
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}", action))
}

/// Decode a stored enum column, reporting bad values as `DatabaseError`.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}': {}", column, value, e),
        )
    })
}
