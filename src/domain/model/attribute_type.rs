//! Data types an attribute can take.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The closed set of attribute data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Uuid,
    LongText,
}

impl AttributeType {
    /// All variants, in declaration order.
    pub const ALL: [AttributeType; 8] = [
        AttributeType::String,
        AttributeType::Integer,
        AttributeType::Decimal,
        AttributeType::Boolean,
        AttributeType::Date,
        AttributeType::DateTime,
        AttributeType::Uuid,
        AttributeType::LongText,
    ];

    /// Stable wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Decimal => "decimal",
            AttributeType::Boolean => "boolean",
            AttributeType::Date => "date",
            AttributeType::DateTime => "datetime",
            AttributeType::Uuid => "uuid",
            AttributeType::LongText => "long-text",
        }
    }

    /// Returns true for types that hold free text.
    pub fn is_textual(&self) -> bool {
        match self {
            AttributeType::String | AttributeType::LongText => true,
            AttributeType::Integer
            | AttributeType::Decimal
            | AttributeType::Boolean
            | AttributeType::Date
            | AttributeType::DateTime
            | AttributeType::Uuid => false,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeType {
    type Err = ValidationError;

    /// Parses case-insensitively; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("type"));
        }
        AttributeType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ValidationError::unsupported_value("type", s.trim()))
    }
}
