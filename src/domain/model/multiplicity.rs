//! Relation end multiplicities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How many instances may sit at one end of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Multiplicity {
    ExactlyOne,
    ZeroOrOne,
    OneOrMore,
    ZeroOrMore,
}

impl Multiplicity {
    pub const ALL: [Multiplicity; 4] = [
        Multiplicity::ExactlyOne,
        Multiplicity::ZeroOrOne,
        Multiplicity::OneOrMore,
        Multiplicity::ZeroOrMore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Multiplicity::ExactlyOne => "exactly-one",
            Multiplicity::ZeroOrOne => "zero-or-one",
            Multiplicity::OneOrMore => "one-or-more",
            Multiplicity::ZeroOrMore => "zero-or-more",
        }
    }

    /// True when the end admits more than one instance.
    pub fn is_many(&self) -> bool {
        match self {
            Multiplicity::OneOrMore | Multiplicity::ZeroOrMore => true,
            Multiplicity::ExactlyOne | Multiplicity::ZeroOrOne => false,
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Multiplicity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("multiplicity"));
        }
        Multiplicity::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| ValidationError::unsupported_value("multiplicity", s.trim()))
    }
}
