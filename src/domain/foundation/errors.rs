//! Error types for the domain layer.
//!
//! `DomainError` is the single error type that crosses port boundaries.
//! Every `ErrorCode` belongs to exactly one `ErrorKind`, which is what the
//! outer layers (HTTP, callers deciding on retries) switch on.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' has unsupported value '{value}'")]
    UnsupportedValue { field: String, value: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unsupported enum value error.
    pub fn unsupported_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::UnsupportedValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::UnsupportedValue { field, .. } => field,
        }
    }
}

/// Coarse error taxonomy exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Actor lacks the required project role.
    Forbidden,
    /// Referenced entity is absent or not part of the project.
    NotFound,
    /// Input is malformed or violates a field rule.
    BadRequest,
    /// Operation collides with existing state (duplicates, dependents).
    Conflict,
    /// Storage or other infrastructure failure; safe to retry as a whole.
    Internal,
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    InvalidFormat,
    UnsupportedValue,
    InvalidStateTransition,

    // Not found errors
    ProjectNotFound,
    ClassNotFound,
    AttributeNotFound,
    IdentityNotFound,
    RelationNotFound,
    FindingNotFound,

    // Conflict errors
    DuplicateName,
    HasDependents,
    ConcurrentModification,

    // Authorization errors
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// Returns the taxonomy bucket this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::InvalidFormat
            | ErrorCode::UnsupportedValue
            | ErrorCode::InvalidStateTransition => ErrorKind::BadRequest,
            ErrorCode::ProjectNotFound
            | ErrorCode::ClassNotFound
            | ErrorCode::AttributeNotFound
            | ErrorCode::IdentityNotFound
            | ErrorCode::RelationNotFound
            | ErrorCode::FindingNotFound => ErrorKind::NotFound,
            ErrorCode::DuplicateName
            | ErrorCode::HasDependents
            | ErrorCode::ConcurrentModification => ErrorKind::Conflict,
            ErrorCode::Forbidden => ErrorKind::Forbidden,
            ErrorCode::DatabaseError | ErrorCode::InternalError => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::UnsupportedValue => "UNSUPPORTED_VALUE",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ProjectNotFound => "PROJECT_NOT_FOUND",
            ErrorCode::ClassNotFound => "CLASS_NOT_FOUND",
            ErrorCode::AttributeNotFound => "ATTRIBUTE_NOT_FOUND",
            ErrorCode::IdentityNotFound => "IDENTITY_NOT_FOUND",
            ErrorCode::RelationNotFound => "RELATION_NOT_FOUND",
            ErrorCode::FindingNotFound => "FINDING_NOT_FOUND",
            ErrorCode::DuplicateName => "DUPLICATE_NAME",
            ErrorCode::HasDependents => "HAS_DEPENDENTS",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates a duplicate-name conflict.
    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateName, message)
    }

    /// Creates a delete-blocked-by-dependents conflict.
    pub fn has_dependents(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::HasDependents, message)
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Creates a database error, wrapping the underlying cause.
    pub fn database(context: &str, cause: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, format!("{}: {}", context, cause))
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::TooLong { .. } => ErrorCode::ValidationFailed,
            ValidationError::InvalidFormat { field, .. } if field == "state_transition" => {
                ErrorCode::InvalidStateTransition
            }
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::UnsupportedValue { .. } => ErrorCode::UnsupportedValue,
        };
        let field = err.field().to_string();
        DomainError::new(code, err.to_string()).with_detail("field", field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("name");
        assert_eq!(format!("{}", err), "Field 'name' cannot be empty");
    }

    #[test]
    fn validation_error_too_long_displays_correctly() {
        let err = ValidationError::too_long("name", 150, 151);
        assert_eq!(
            format!("{}", err),
            "Field 'name' must be at most 150 characters, got 151"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::ClassNotFound, "Class not found");
        assert_eq!(format!("{}", err), "[CLASS_NOT_FOUND] Class not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::validation("pattern", "must not be blank")
            .with_detail("reason", "blank");

        assert_eq!(err.details.get("field"), Some(&"pattern".to_string()));
        assert_eq!(err.details.get("reason"), Some(&"blank".to_string()));
    }

    #[test]
    fn every_code_maps_to_expected_kind() {
        assert_eq!(ErrorCode::Forbidden.kind(), ErrorKind::Forbidden);
        assert_eq!(ErrorCode::FindingNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ErrorCode::DuplicateName.kind(), ErrorKind::Conflict);
        assert_eq!(ErrorCode::HasDependents.kind(), ErrorKind::Conflict);
        assert_eq!(ErrorCode::UnsupportedValue.kind(), ErrorKind::BadRequest);
        assert_eq!(ErrorCode::DatabaseError.kind(), ErrorKind::Internal);
    }

    #[test]
    fn validation_error_converts_to_bad_request() {
        let err: DomainError = ValidationError::unsupported_value("type", "BLOB").into();
        assert_eq!(err.code, ErrorCode::UnsupportedValue);
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.details.get("field"), Some(&"type".to_string()));
    }

    #[test]
    fn state_transition_error_converts_to_invalid_transition() {
        let err: DomainError =
            ValidationError::invalid_format("state_transition", "Cannot go").into();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::HasDependents), "HAS_DEPENDENTS");
        assert_eq!(format!("{}", ErrorCode::InternalError), "INTERNAL_ERROR");
    }
}
