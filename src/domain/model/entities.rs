//! Entities of the domain model: classes, attributes, identities, relations.
//!
//! These are plain records. They are only ever mutated through
//! [`DomainModel`](super::DomainModel), which owns the invariants that span
//! more than one record (name uniqueness, referential integrity, dependents).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AttributeId, ClassId, IdentityId, ProjectId, RelationId, Timestamp};

use super::{AttributeType, ConstraintConfig, Multiplicity};

/// A class of the business domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainClass {
    pub id: ClassId,
    pub project_id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    /// Attributes in creation order.
    pub attributes: Vec<DomainAttribute>,
    /// Identities in creation order.
    pub identities: Vec<DomainIdentity>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DomainClass {
    pub fn attribute(&self, id: &AttributeId) -> Option<&DomainAttribute> {
        self.attributes.iter().find(|a| &a.id == id)
    }

    pub fn identity(&self, id: &IdentityId) -> Option<&DomainIdentity> {
        self.identities.iter().find(|i| &i.id == id)
    }

    /// Identities whose key includes the given attribute.
    pub fn identities_using(&self, attribute_id: &AttributeId) -> impl Iterator<Item = &DomainIdentity> {
        let attribute_id = *attribute_id;
        self.identities
            .iter()
            .filter(move |i| i.attribute_ids.contains(&attribute_id))
    }
}

/// A typed attribute belonging to a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAttribute {
    pub id: AttributeId,
    pub class_id: ClassId,
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub required: bool,
    pub config: Option<ConstraintConfig>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A candidate key: an ordered set of the owning class's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainIdentity {
    pub id: IdentityId,
    pub class_id: ClassId,
    pub name: String,
    pub description: Option<String>,
    pub attribute_ids: Vec<AttributeId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A directed association between two classes of the same project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRelation {
    pub id: RelationId,
    pub project_id: ProjectId,
    pub source_class_id: ClassId,
    pub target_class_id: ClassId,
    pub name: Option<String>,
    pub source_role: Option<String>,
    pub target_role: Option<String>,
    pub source_multiplicity: Multiplicity,
    pub target_multiplicity: Multiplicity,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DomainRelation {
    /// True if the class sits at either end of the relation.
    pub fn references(&self, class_id: &ClassId) -> bool {
        &self.source_class_id == class_id || &self.target_class_id == class_id
    }

    /// True if the relation joins the two classes, in either direction.
    pub fn connects(&self, a: &ClassId, b: &ClassId) -> bool {
        (&self.source_class_id == a && &self.target_class_id == b)
            || (&self.source_class_id == b && &self.target_class_id == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(source: ClassId, target: ClassId) -> DomainRelation {
        let now = Timestamp::now();
        DomainRelation {
            id: RelationId::new(),
            project_id: ProjectId::new(),
            source_class_id: source,
            target_class_id: target,
            name: None,
            source_role: None,
            target_role: None,
            source_multiplicity: Multiplicity::ExactlyOne,
            target_multiplicity: Multiplicity::ZeroOrMore,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn relation_connects_in_both_directions() {
        let (a, b, c) = (ClassId::new(), ClassId::new(), ClassId::new());
        let rel = relation(a, b);
        assert!(rel.connects(&a, &b));
        assert!(rel.connects(&b, &a));
        assert!(!rel.connects(&a, &c));
    }

    #[test]
    fn relation_references_either_end() {
        let (a, b) = (ClassId::new(), ClassId::new());
        let rel = relation(a, b);
        assert!(rel.references(&a));
        assert!(rel.references(&b));
        assert!(!rel.references(&ClassId::new()));
    }

    #[test]
    fn attribute_type_serializes_under_type_key() {
        let now = Timestamp::now();
        let attribute = DomainAttribute {
            id: AttributeId::new(),
            class_id: ClassId::new(),
            name: "id".to_string(),
            attribute_type: AttributeType::Uuid,
            required: true,
            config: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&attribute).unwrap();
        assert_eq!(json["type"], "uuid");
    }
}
