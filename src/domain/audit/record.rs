use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::foundation::{ActorId, AuditRecordId, ProjectId, Timestamp, ValidationError};
use crate::domain::model::ModelChange;

/// Kind of write an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ClassCreated,
    ClassUpdated,
    ClassDeleted,
    AttributeCreated,
    AttributeUpdated,
    AttributeDeleted,
    RelationCreated,
    RelationUpdated,
    RelationDeleted,
    IdentityDefined,
    IdentityRemoved,
}

impl AuditAction {
    pub const ALL: [AuditAction; 11] = [
        AuditAction::ClassCreated,
        AuditAction::ClassUpdated,
        AuditAction::ClassDeleted,
        AuditAction::AttributeCreated,
        AuditAction::AttributeUpdated,
        AuditAction::AttributeDeleted,
        AuditAction::RelationCreated,
        AuditAction::RelationUpdated,
        AuditAction::RelationDeleted,
        AuditAction::IdentityDefined,
        AuditAction::IdentityRemoved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ClassCreated => "CLASS_CREATED",
            AuditAction::ClassUpdated => "CLASS_UPDATED",
            AuditAction::ClassDeleted => "CLASS_DELETED",
            AuditAction::AttributeCreated => "ATTRIBUTE_CREATED",
            AuditAction::AttributeUpdated => "ATTRIBUTE_UPDATED",
            AuditAction::AttributeDeleted => "ATTRIBUTE_DELETED",
            AuditAction::RelationCreated => "RELATION_CREATED",
            AuditAction::RelationUpdated => "RELATION_UPDATED",
            AuditAction::RelationDeleted => "RELATION_DELETED",
            AuditAction::IdentityDefined => "IDENTITY_DEFINED",
            AuditAction::IdentityRemoved => "IDENTITY_REMOVED",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::unsupported_value("action", s))
    }
}

/// Kind of entity an audit record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEntity {
    Class,
    Attribute,
    Relation,
    Identity,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntity::Class => "CLASS",
            AuditEntity::Attribute => "ATTRIBUTE",
            AuditEntity::Relation => "RELATION",
            AuditEntity::Identity => "IDENTITY",
        }
    }
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEntity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLASS" => Ok(AuditEntity::Class),
            "ATTRIBUTE" => Ok(AuditEntity::Attribute),
            "RELATION" => Ok(AuditEntity::Relation),
            "IDENTITY" => Ok(AuditEntity::Identity),
            _ => Err(ValidationError::unsupported_value("entity", s)),
        }
    }
}

/// One immutable audit entry. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditRecordId,
    pub project_id: ProjectId,
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: Uuid,
    pub actor_id: ActorId,
    pub detail: Value,
    pub created_at: Timestamp,
}

impl AuditRecord {
    /// Derives the audit entry for an accepted write.
    pub fn for_change(project_id: ProjectId, actor_id: ActorId, change: &ModelChange) -> Self {
        let (action, entity, entity_id, detail) = match change {
            ModelChange::ClassCreated(c) => (
                AuditAction::ClassCreated,
                AuditEntity::Class,
                *c.id.as_uuid(),
                json!({ "class_id": c.id, "name": c.name }),
            ),
            ModelChange::ClassUpdated(c) => (
                AuditAction::ClassUpdated,
                AuditEntity::Class,
                *c.id.as_uuid(),
                json!({ "class_id": c.id, "name": c.name }),
            ),
            ModelChange::ClassDeleted(c) => (
                AuditAction::ClassDeleted,
                AuditEntity::Class,
                *c.id.as_uuid(),
                json!({
                    "class_id": c.id,
                    "name": c.name,
                    "attributes": c.attributes.len(),
                    "identities": c.identities.len(),
                }),
            ),
            ModelChange::AttributeCreated(a) => (
                AuditAction::AttributeCreated,
                AuditEntity::Attribute,
                *a.id.as_uuid(),
                json!({ "class_id": a.class_id, "attribute_id": a.id, "name": a.name }),
            ),
            ModelChange::AttributeUpdated(a) => (
                AuditAction::AttributeUpdated,
                AuditEntity::Attribute,
                *a.id.as_uuid(),
                json!({ "class_id": a.class_id, "attribute_id": a.id }),
            ),
            ModelChange::AttributeDeleted(a) => (
                AuditAction::AttributeDeleted,
                AuditEntity::Attribute,
                *a.id.as_uuid(),
                json!({ "class_id": a.class_id, "attribute_id": a.id }),
            ),
            ModelChange::RelationCreated(r) => (
                AuditAction::RelationCreated,
                AuditEntity::Relation,
                *r.id.as_uuid(),
                json!({
                    "relation_id": r.id,
                    "source_class_id": r.source_class_id,
                    "target_class_id": r.target_class_id,
                }),
            ),
            ModelChange::RelationUpdated(r) => (
                AuditAction::RelationUpdated,
                AuditEntity::Relation,
                *r.id.as_uuid(),
                json!({ "relation_id": r.id }),
            ),
            ModelChange::RelationDeleted(r) => (
                AuditAction::RelationDeleted,
                AuditEntity::Relation,
                *r.id.as_uuid(),
                json!({ "relation_id": r.id }),
            ),
            ModelChange::IdentityDefined { identity, replaced } => (
                AuditAction::IdentityDefined,
                AuditEntity::Identity,
                *identity.id.as_uuid(),
                json!({
                    "class_id": identity.class_id,
                    "identity_id": identity.id,
                    "name": identity.name,
                    "attribute_ids": identity.attribute_ids,
                    "replaced": replaced,
                }),
            ),
            ModelChange::IdentityRemoved(identity) => (
                AuditAction::IdentityRemoved,
                AuditEntity::Identity,
                *identity.id.as_uuid(),
                json!({ "class_id": identity.class_id, "identity_id": identity.id }),
            ),
        };

        Self {
            id: AuditRecordId::new(),
            project_id,
            action,
            entity,
            entity_id,
            actor_id,
            detail,
            created_at: Timestamp::now(),
        }
    }
}
