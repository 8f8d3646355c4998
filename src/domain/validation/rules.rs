//! Pure rule evaluators. Each maps a snapshot to zero or more findings and
//! knows nothing about the other rules.

use std::collections::HashSet;

use crate::domain::model::{naming, DomainRelation, ModelSnapshot};

use super::{ElementPath, ElementType, RuleDefinition, ValidationFinding};

fn finding(
    definition: &RuleDefinition,
    element_type: ElementType,
    element_id: uuid::Uuid,
    element_name: Option<&str>,
    element_path: ElementPath,
    message: String,
    suggestion: &str,
) -> ValidationFinding {
    ValidationFinding {
        rule_code: definition.code,
        rule_name: definition.name.to_string(),
        category: definition.category,
        severity: definition.severity,
        message,
        element_type,
        element_id: Some(element_id),
        element_name: element_name.map(str::to_string),
        element_path,
        suggestion: Some(suggestion.to_string()),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

pub(super) fn class_without_identity(
    definition: &RuleDefinition,
    snapshot: &ModelSnapshot,
) -> Vec<ValidationFinding> {
    snapshot
        .classes
        .iter()
        .filter(|class| class.identities.is_empty())
        .map(|class| {
            finding(
                definition,
                ElementType::Class,
                *class.id.as_uuid(),
                Some(&class.name),
                ElementPath::class(&class.id),
                format!("Class \"{}\" has no identity defined.", class.name),
                "Create an identity that represents the primary key of the class.",
            )
        })
        .collect()
}

pub(super) fn many_to_many_relation(
    definition: &RuleDefinition,
    snapshot: &ModelSnapshot,
) -> Vec<ValidationFinding> {
    snapshot
        .relations
        .iter()
        .filter(|r| r.source_multiplicity.is_many() && r.target_multiplicity.is_many())
        .map(|relation| {
            relation_finding(
                definition,
                relation,
                "The relation allows many elements at both ends. Consider whether it needs a bridge entity.",
                "Create an entity that represents the relation and move its attributes there.",
            )
        })
        .collect()
}

pub(super) fn ambiguous_relation_role(
    definition: &RuleDefinition,
    snapshot: &ModelSnapshot,
) -> Vec<ValidationFinding> {
    snapshot
        .relations
        .iter()
        .filter(|r| is_blank(&r.name) && is_blank(&r.source_role) && is_blank(&r.target_role))
        .map(|relation| {
            relation_finding(
                definition,
                relation,
                "Give the relation a name or roles to clarify its purpose in the model.",
                "Define relation roles or a meaningful name.",
            )
        })
        .collect()
}

fn relation_finding(
    definition: &RuleDefinition,
    relation: &DomainRelation,
    message: &str,
    suggestion: &str,
) -> ValidationFinding {
    finding(
        definition,
        ElementType::Relation,
        *relation.id.as_uuid(),
        relation.name.as_deref(),
        ElementPath::relation(&relation.id),
        message.to_string(),
        suggestion,
    )
}

/// Second and later attributes whose normalised name was already seen in
/// the same class, in encounter order.
pub(super) fn duplicated_attribute_name(
    definition: &RuleDefinition,
    snapshot: &ModelSnapshot,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    for class in &snapshot.classes {
        let mut seen = HashSet::new();
        for attribute in &class.attributes {
            if seen.insert(naming::attribute_name_key(&attribute.name)) {
                continue;
            }
            findings.push(finding(
                definition,
                ElementType::Attribute,
                *attribute.id.as_uuid(),
                Some(&attribute.name),
                ElementPath::attribute(&class.id, &attribute.id),
                format!(
                    "Attribute \"{}\" is duplicated in class \"{}\".",
                    attribute.name, class.name
                ),
                "Make sure attribute names are unique within the class.",
            ));
        }
    }
    findings
}

pub(super) fn identity_without_attributes(
    definition: &RuleDefinition,
    snapshot: &ModelSnapshot,
) -> Vec<ValidationFinding> {
    snapshot
        .classes
        .iter()
        .flat_map(|class| {
            class
                .identities
                .iter()
                .filter(|identity| identity.attribute_ids.is_empty())
                .map(move |identity| {
                    finding(
                        definition,
                        ElementType::Identity,
                        *identity.id.as_uuid(),
                        Some(&identity.name),
                        ElementPath::identity(&class.id, &identity.id),
                        format!(
                            "Identity \"{}\" in class \"{}\" has no attributes assigned.",
                            identity.name, class.name
                        ),
                        "Select the attributes that make up the identity or remove it.",
                    )
                })
        })
        .collect()
}

/// Textual attributes whose name looks plural or like a list.
pub(super) fn suspect_multivalue_attribute(
    definition: &RuleDefinition,
    snapshot: &ModelSnapshot,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    for class in &snapshot.classes {
        for attribute in &class.attributes {
            let lower = attribute.name.to_lowercase();
            let looks_plural = lower.ends_with('s') || lower.contains("list");
            if !(looks_plural && attribute.attribute_type.is_textual()) {
                continue;
            }
            findings.push(finding(
                definition,
                ElementType::Attribute,
                *attribute.id.as_uuid(),
                Some(&attribute.name),
                ElementPath::attribute(&class.id, &attribute.id),
                format!(
                    "Attribute \"{}\" of class \"{}\" may hold multiple values.",
                    attribute.name, class.name
                ),
                "Consider moving the repeated values to a related entity.",
            ));
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use crate::domain::foundation::{
        AttributeId, ClassId, IdentityId, ProjectId, RelationId, Timestamp,
    };
    use crate::domain::model::{
        AttributeType, DomainAttribute, DomainClass, DomainIdentity, DomainRelation,
        ModelSnapshot, Multiplicity,
    };
    use crate::domain::validation::{ElementPath, RuleCode};

    fn class(name: &str) -> DomainClass {
        let now = Timestamp::now();
        DomainClass {
            id: ClassId::new(),
            project_id: ProjectId::new(),
            name: name.to_string(),
            description: None,
            attributes: Vec::new(),
            identities: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn with_attribute(mut class: DomainClass, name: &str, attribute_type: AttributeType) -> DomainClass {
        let now = Timestamp::now();
        class.attributes.push(DomainAttribute {
            id: AttributeId::new(),
            class_id: class.id,
            name: name.to_string(),
            attribute_type,
            required: false,
            config: None,
            created_at: now,
            updated_at: now,
        });
        class
    }

    fn with_identity(mut class: DomainClass, attribute_ids: Vec<AttributeId>) -> DomainClass {
        let now = Timestamp::now();
        class.identities.push(DomainIdentity {
            id: IdentityId::new(),
            class_id: class.id,
            name: "pk".to_string(),
            description: None,
            attribute_ids,
            created_at: now,
            updated_at: now,
        });
        class
    }

    fn relation(
        source: &DomainClass,
        target: &DomainClass,
        name: Option<&str>,
        multiplicities: (Multiplicity, Multiplicity),
    ) -> DomainRelation {
        let now = Timestamp::now();
        DomainRelation {
            id: RelationId::new(),
            project_id: source.project_id,
            source_class_id: source.id,
            target_class_id: target.id,
            name: name.map(str::to_string),
            source_role: None,
            target_role: None,
            source_multiplicity: multiplicities.0,
            target_multiplicity: multiplicities.1,
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot(classes: Vec<DomainClass>, relations: Vec<DomainRelation>) -> ModelSnapshot {
        ModelSnapshot {
            project_id: ProjectId::new(),
            classes,
            relations,
        }
    }

    #[test]
    fn class_without_identity_fires_per_class() {
        let cliente = with_attribute(class("Cliente"), "id", AttributeType::Uuid);
        let attr_id = cliente.attributes[0].id;
        let pedido = with_identity(class("Pedido"), vec![attr_id]);
        let snap = snapshot(vec![cliente.clone(), pedido], vec![]);

        let findings = RuleCode::ClassWithoutIdentity.evaluate(&snap);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].element_path, ElementPath::class(&cliente.id));
        assert_eq!(findings[0].element_name.as_deref(), Some("Cliente"));
    }

    #[test]
    fn many_to_many_needs_both_ends_many() {
        let a = class("A");
        let b = class("B");
        let both = relation(&a, &b, Some("r1"), (Multiplicity::OneOrMore, Multiplicity::ZeroOrMore));
        let one_side = relation(&a, &b, Some("r2"), (Multiplicity::ExactlyOne, Multiplicity::ZeroOrMore));
        let snap = snapshot(vec![a, b], vec![both.clone(), one_side]);

        let findings = RuleCode::ManyToManyRelation.evaluate(&snap);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].element_path, ElementPath::relation(&both.id));
    }

    #[test]
    fn ambiguous_role_requires_no_name_and_no_roles() {
        let a = class("A");
        let b = class("B");
        let bare = relation(&a, &b, None, (Multiplicity::ExactlyOne, Multiplicity::ExactlyOne));
        let named = relation(&a, &b, Some("has"), (Multiplicity::ExactlyOne, Multiplicity::ExactlyOne));
        let mut with_role = relation(&a, &b, None, (Multiplicity::ExactlyOne, Multiplicity::ExactlyOne));
        with_role.target_role = Some("buyer".to_string());
        let snap = snapshot(vec![a, b], vec![bare.clone(), named, with_role]);

        let findings = RuleCode::AmbiguousRelationRole.evaluate(&snap);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].element_path, ElementPath::relation(&bare.id));
    }

    #[test]
    fn duplicated_attribute_flags_second_occurrence_only() {
        let c = with_attribute(class("Cliente"), " Id ", AttributeType::Uuid);
        let c = with_attribute(c, "id", AttributeType::Uuid);
        let second = c.attributes[1].clone();
        let snap = snapshot(vec![c.clone()], vec![]);

        let findings = RuleCode::DuplicatedAttributeName.evaluate(&snap);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].element_path,
            ElementPath::attribute(&c.id, &second.id)
        );
    }

    #[test]
    fn duplicated_attribute_is_scoped_per_class() {
        let a = with_attribute(class("A"), "id", AttributeType::Uuid);
        let b = with_attribute(class("B"), "id", AttributeType::Uuid);
        let snap = snapshot(vec![a, b], vec![]);
        assert!(RuleCode::DuplicatedAttributeName.evaluate(&snap).is_empty());
    }

    #[test]
    fn identity_without_attributes_fires_on_empty_list() {
        let c = with_identity(class("Cliente"), vec![]);
        let identity_id = c.identities[0].id;
        let snap = snapshot(vec![c.clone()], vec![]);

        let findings = RuleCode::IdentityWithoutAttributes.evaluate(&snap);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].element_path,
            ElementPath::identity(&c.id, &identity_id)
        );
    }

    #[test]
    fn suspect_multivalue_only_for_textual_plural_names() {
        let c = with_attribute(class("Pedido"), "productos", AttributeType::String);
        let c = with_attribute(c, "telefonoLista", AttributeType::LongText);
        let c = with_attribute(c, "items", AttributeType::Integer);
        let c = with_attribute(c, "nombre", AttributeType::String);
        let snap = snapshot(vec![c], vec![]);

        let names: Vec<_> = RuleCode::SuspectMultivalueAttribute
            .evaluate(&snap)
            .into_iter()
            .filter_map(|f| f.element_name)
            .collect();
        assert_eq!(names, vec!["productos", "telefonoLista"]);
    }

    #[test]
    fn every_finding_carries_rule_metadata() {
        let c = with_attribute(class("Pedido"), "productos", AttributeType::String);
        let snap = snapshot(vec![c], vec![]);
        for code in RuleCode::ALL {
            let definition = code.definition();
            for finding in code.evaluate(&snap) {
                assert_eq!(finding.rule_code, code);
                assert_eq!(finding.rule_name, definition.name);
                assert_eq!(finding.category, definition.category);
                assert_eq!(finding.severity, definition.severity);
            }
        }
    }
}
