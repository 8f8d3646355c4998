//! Mapping from sqlx failures to domain errors.

use crate::domain::foundation::{DomainError, ErrorCode};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Translates a storage error raised while `context` was running.
///
/// Unique and foreign-key violations map to the same conflicts the
/// aggregate raises.
pub(crate) fn db_error(context: &str, error: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        let constraint = db.constraint().unwrap_or_default().to_string();
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return DomainError::duplicate_name("Name is already in use")
                    .with_detail("constraint", constraint);
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return DomainError::has_dependents("Entity is still referenced")
                    .with_detail("constraint", constraint);
            }
            _ => {}
        }
    }
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", context, error),
    )
}

/// Turns a stored enum string back into its domain value.
pub(crate) fn decode<T>(column: &str, raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Corrupt value in column {}: {}", column, e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Multiplicity;

    #[test]
    fn non_database_errors_become_database_error() {
        let err = db_error("load model", sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to load model"));
    }

    #[test]
    fn decode_reports_the_column() {
        let err = decode::<Multiplicity>("source_multiplicity", "lots").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("source_multiplicity"));
        assert_eq!(
            decode::<Multiplicity>("source_multiplicity", "one-or-more").unwrap(),
            Multiplicity::OneOrMore
        );
    }
}
