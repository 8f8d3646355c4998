//! Write requests accepted by the [`DomainModel`](super::DomainModel).
//!
//! Text fields arrive raw; the aggregate trims them and enforces length
//! limits (see [`naming`](super::naming)) before checking its invariants.

use crate::domain::foundation::{AttributeId, ClassId, IdentityId};

use super::{AttributeType, ConstraintConfig, Multiplicity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub name: String,
    pub description: Option<String>,
}

/// Partial class update. `None` leaves the field untouched; for nullable
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl ClassChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttribute {
    pub class_id: ClassId,
    pub name: String,
    pub attribute_type: AttributeType,
    pub required: bool,
    pub config: Option<ConstraintConfig>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeChanges {
    pub name: Option<String>,
    pub attribute_type: Option<AttributeType>,
    pub required: Option<bool>,
    pub config: Option<Option<ConstraintConfig>>,
}

impl AttributeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.attribute_type.is_none()
            && self.required.is_none()
            && self.config.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelation {
    pub source_class_id: ClassId,
    pub target_class_id: ClassId,
    pub name: Option<String>,
    pub source_role: Option<String>,
    pub target_role: Option<String>,
    pub source_multiplicity: Multiplicity,
    pub target_multiplicity: Multiplicity,
}

/// Partial relation update. Endpoints are fixed once created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationChanges {
    pub name: Option<Option<String>>,
    pub source_role: Option<Option<String>>,
    pub target_role: Option<Option<String>>,
    pub source_multiplicity: Option<Multiplicity>,
    pub target_multiplicity: Option<Multiplicity>,
}

impl RelationChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.source_role.is_none()
            && self.target_role.is_none()
            && self.source_multiplicity.is_none()
            && self.target_multiplicity.is_none()
    }
}

/// Creates an identity, or replaces one when `identity_id` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDefinition {
    pub class_id: ClassId,
    pub identity_id: Option<IdentityId>,
    pub name: String,
    pub description: Option<String>,
    pub attribute_ids: Vec<AttributeId>,
}
