//! What a finding is about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{AttributeId, ClassId, IdentityId, RelationId, ValidationError};

/// Kind of model element a finding points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    Class,
    Attribute,
    Identity,
    Relation,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Class => "CLASS",
            ElementType::Attribute => "ATTRIBUTE",
            ElementType::Identity => "IDENTITY",
            ElementType::Relation => "RELATION",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLASS" => Ok(ElementType::Class),
            "ATTRIBUTE" => Ok(ElementType::Attribute),
            "IDENTITY" => Ok(ElementType::Identity),
            "RELATION" => Ok(ElementType::Relation),
            _ => Err(ValidationError::unsupported_value("element_type", s)),
        }
    }
}

/// Stable compound key of a model element, e.g. `CLASS:<id>` or
/// `CLASS:<classId>:ATTRIBUTE:<attrId>`.
///
/// Independent of the run that produced a finding; together with the rule
/// code it is the merge key of the finding ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementPath(String);

impl ElementPath {
    pub fn class(class_id: &ClassId) -> Self {
        Self(format!("CLASS:{}", class_id))
    }

    pub fn attribute(class_id: &ClassId, attribute_id: &AttributeId) -> Self {
        Self(format!("CLASS:{}:ATTRIBUTE:{}", class_id, attribute_id))
    }

    pub fn identity(class_id: &ClassId, identity_id: &IdentityId) -> Self {
        Self(format!("CLASS:{}:IDENTITY:{}", class_id, identity_id))
    }

    pub fn relation(relation_id: &RelationId) -> Self {
        Self(format!("RELATION:{}", relation_id))
    }

    /// Wraps a path read back from storage.
    pub fn from_stored(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
