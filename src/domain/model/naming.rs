//! Text normalisation shared by every model entity.

use crate::domain::foundation::ValidationError;

/// Maximum length for class, attribute, identity and relation names.
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum length for descriptions and roles.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Trims a required name and enforces the length limit.
///
/// # Errors
///
/// - `EmptyField` if the name is blank
/// - `TooLong` if it exceeds [`MAX_NAME_LENGTH`] characters
pub fn required_name(field: &str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    check_length(field, trimmed, MAX_NAME_LENGTH)?;
    Ok(trimmed.to_string())
}

/// Trims optional text; blank collapses to `None`.
pub fn optional_text(
    field: &str,
    raw: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            check_length(field, trimmed, max)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

/// Comparison key for attribute names: trimmed and lower-cased.
pub fn attribute_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::too_long(field, max, actual));
    }
    Ok(())
}
