//! Outcome of an accepted write against the domain model.

use crate::domain::foundation::{DomainError, ErrorCode};

use super::{DomainAttribute, DomainClass, DomainIdentity, DomainRelation};

/// Describes exactly one accepted write.
///
/// Adapters match on this exhaustively to persist the write and derive
/// its audit record, so a new kind of write is a compile error in every
/// adapter until handled.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelChange {
    ClassCreated(DomainClass),
    ClassUpdated(DomainClass),
    /// Carries the class as it was, including cascaded attributes and identities.
    ClassDeleted(DomainClass),
    AttributeCreated(DomainAttribute),
    AttributeUpdated(DomainAttribute),
    AttributeDeleted(DomainAttribute),
    RelationCreated(DomainRelation),
    RelationUpdated(DomainRelation),
    RelationDeleted(DomainRelation),
    IdentityDefined {
        identity: DomainIdentity,
        replaced: bool,
    },
    IdentityRemoved(DomainIdentity),
}

impl ModelChange {
    /// The class carried by a class change.
    ///
    /// # Errors
    ///
    /// - `InternalError` for any other kind of change
    pub fn into_class(self) -> Result<DomainClass, DomainError> {
        match self {
            ModelChange::ClassCreated(c)
            | ModelChange::ClassUpdated(c)
            | ModelChange::ClassDeleted(c) => Ok(c),
            other => Err(unexpected("class", &other)),
        }
    }

    pub fn into_attribute(self) -> Result<DomainAttribute, DomainError> {
        match self {
            ModelChange::AttributeCreated(a)
            | ModelChange::AttributeUpdated(a)
            | ModelChange::AttributeDeleted(a) => Ok(a),
            other => Err(unexpected("attribute", &other)),
        }
    }

    pub fn into_relation(self) -> Result<DomainRelation, DomainError> {
        match self {
            ModelChange::RelationCreated(r)
            | ModelChange::RelationUpdated(r)
            | ModelChange::RelationDeleted(r) => Ok(r),
            other => Err(unexpected("relation", &other)),
        }
    }

    pub fn into_identity(self) -> Result<DomainIdentity, DomainError> {
        match self {
            ModelChange::IdentityDefined { identity, .. } | ModelChange::IdentityRemoved(identity) => {
                Ok(identity)
            }
            other => Err(unexpected("identity", &other)),
        }
    }
}

fn unexpected(expected: &str, change: &ModelChange) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Expected a {} change, got {:?}", expected, change),
    )
}
