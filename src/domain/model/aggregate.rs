//! DomainModel aggregate.
//!
//! One `DomainModel` holds every class and relation of a project. All
//! write-time invariants live here:
//!
//! - class names unique per project (compared trimmed)
//! - attribute names unique per class (trimmed, case-insensitive)
//! - identity names unique per class; attribute list non-empty, free of
//!   repeats, and drawn from the owning class
//! - relation endpoints resolve to classes of the project; a relation name,
//!   when present, is unique among relations joining the same two classes
//! - a class referenced by a relation cannot be deleted
//! - an attribute used by an identity cannot be deleted
//!
//! Every mutation validates first and only then touches state, so a
//! rejected write leaves the aggregate exactly as it was.

use std::collections::HashSet;

use crate::domain::foundation::{
    AttributeId, ClassId, DomainError, ErrorCode, IdentityId, ProjectId, RelationId, Timestamp,
    ValidationError,
};

use super::naming::{self, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};
use super::{
    AttributeChanges, ClassChanges, ConstraintConfig, DomainAttribute, DomainClass,
    DomainIdentity, DomainRelation, IdentityDefinition, ModelChange, ModelSnapshot, NewAttribute,
    NewClass, NewRelation, RelationChanges,
};

/// Per-project domain model aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainModel {
    project_id: ProjectId,
    classes: Vec<DomainClass>,
    relations: Vec<DomainRelation>,
}

impl DomainModel {
    /// Creates a model with no classes or relations.
    pub fn empty(project_id: ProjectId) -> Self {
        Self {
            project_id,
            classes: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Reconstitutes a model from persistence (no validation).
    pub fn reconstitute(
        project_id: ProjectId,
        classes: Vec<DomainClass>,
        relations: Vec<DomainRelation>,
    ) -> Self {
        let mut model = Self {
            project_id,
            classes,
            relations,
        };
        model.sort_classes();
        model.sort_relations();
        model
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Classes ordered by name.
    pub fn classes(&self) -> &[DomainClass] {
        &self.classes
    }

    /// Relations ordered by creation time.
    pub fn relations(&self) -> &[DomainRelation] {
        &self.relations
    }

    pub fn class(&self, id: &ClassId) -> Option<&DomainClass> {
        self.classes.iter().find(|c| &c.id == id)
    }

    /// Finds a class by name, ignoring surrounding whitespace.
    pub fn class_by_name(&self, name: &str) -> Option<&DomainClass> {
        let name = name.trim();
        self.classes.iter().find(|c| c.name.trim() == name)
    }

    pub fn attribute(&self, id: &AttributeId) -> Option<&DomainAttribute> {
        self.classes.iter().find_map(|c| c.attribute(id))
    }

    pub fn identity(&self, id: &IdentityId) -> Option<&DomainIdentity> {
        self.classes.iter().find_map(|c| c.identity(id))
    }

    pub fn relation(&self, id: &RelationId) -> Option<&DomainRelation> {
        self.relations.iter().find(|r| &r.id == id)
    }

    /// Returns an owned, ordered snapshot for rule evaluation.
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            project_id: self.project_id,
            classes: self.classes.clone(),
            relations: self.relations.clone(),
        }
    }

    pub fn into_snapshot(self) -> ModelSnapshot {
        ModelSnapshot {
            project_id: self.project_id,
            classes: self.classes,
            relations: self.relations,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Classes
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a class.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `ValidationFailed` for a blank or oversized name
    /// - `DuplicateName` if another class already uses the name
    pub fn create_class(&mut self, input: NewClass) -> Result<ModelChange, DomainError> {
        let name = naming::required_name("name", &input.name)?;
        let description =
            naming::optional_text("description", input.description, MAX_DESCRIPTION_LENGTH)?;
        self.ensure_class_name_free(&name, None)?;

        let now = Timestamp::now();
        let class = DomainClass {
            id: ClassId::new(),
            project_id: self.project_id,
            name,
            description,
            attributes: Vec::new(),
            identities: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.classes.push(class.clone());
        self.sort_classes();
        Ok(ModelChange::ClassCreated(class))
    }

    /// Applies a partial update. Returns `None` when no supplied field
    /// differs from the stored value after normalisation.
    ///
    /// # Errors
    ///
    /// - `ClassNotFound` if the class is not part of the project
    /// - `DuplicateName` if the new name is taken by another class
    pub fn update_class(
        &mut self,
        class_id: &ClassId,
        changes: ClassChanges,
    ) -> Result<Option<ModelChange>, DomainError> {
        let idx = self.class_index(class_id)?;
        if changes.is_empty() {
            return Ok(None);
        }

        let name = changes
            .name
            .map(|n| naming::required_name("name", &n))
            .transpose()?;
        let description = changes
            .description
            .map(|d| naming::optional_text("description", d, MAX_DESCRIPTION_LENGTH))
            .transpose()?;

        let current = &self.classes[idx];
        let name = name.filter(|n| *n != current.name);
        let description = description.filter(|d| *d != current.description);
        if name.is_none() && description.is_none() {
            return Ok(None);
        }
        if let Some(name) = &name {
            self.ensure_class_name_free(name, Some(class_id))?;
        }

        let class = &mut self.classes[idx];
        if let Some(name) = name {
            class.name = name;
        }
        if let Some(description) = description {
            class.description = description;
        }
        class.updated_at = Timestamp::now();
        let updated = class.clone();
        self.sort_classes();
        Ok(Some(ModelChange::ClassUpdated(updated)))
    }

    /// Removes a class together with its attributes and identities.
    ///
    /// # Errors
    ///
    /// - `ClassNotFound` if the class is not part of the project
    /// - `HasDependents` if any relation starts or ends at the class
    pub fn delete_class(&mut self, class_id: &ClassId) -> Result<ModelChange, DomainError> {
        let idx = self.class_index(class_id)?;
        let referencing = self
            .relations
            .iter()
            .filter(|r| r.references(class_id))
            .count();
        if referencing > 0 {
            return Err(DomainError::has_dependents(format!(
                "Class is referenced by {} relation(s); delete them first",
                referencing
            ))
            .with_detail("class_id", class_id.to_string()));
        }

        let removed = self.classes.remove(idx);
        Ok(ModelChange::ClassDeleted(removed))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends an attribute to a class.
    ///
    /// # Errors
    ///
    /// - `ClassNotFound` if the class is not part of the project
    /// - `DuplicateName` if the class has an attribute with the same name,
    ///   ignoring case and padding
    /// - `InvalidFormat` / `EmptyField` for an inconsistent constraint config
    pub fn create_attribute(&mut self, input: NewAttribute) -> Result<ModelChange, DomainError> {
        let ci = self.class_index(&input.class_id)?;
        let name = naming::required_name("name", &input.name)?;
        let config = normalize_config(input.config)?;
        self.ensure_attribute_name_free(ci, &name, None)?;

        let now = Timestamp::now();
        let attribute = DomainAttribute {
            id: AttributeId::new(),
            class_id: input.class_id,
            name,
            attribute_type: input.attribute_type,
            required: input.required,
            config,
            created_at: now,
            updated_at: now,
        };
        self.classes[ci].attributes.push(attribute.clone());
        Ok(ModelChange::AttributeCreated(attribute))
    }

    /// Applies a partial update. Returns `None` when no supplied field
    /// differs from the stored value after normalisation.
    ///
    /// # Errors
    ///
    /// - `AttributeNotFound` if the attribute is not part of the project
    /// - `DuplicateName` if the new name collides within the class
    pub fn update_attribute(
        &mut self,
        attribute_id: &AttributeId,
        changes: AttributeChanges,
    ) -> Result<Option<ModelChange>, DomainError> {
        let (ci, ai) = self.locate_attribute(attribute_id)?;
        if changes.is_empty() {
            return Ok(None);
        }

        let name = changes
            .name
            .map(|n| naming::required_name("name", &n))
            .transpose()?;
        let config = changes.config.map(normalize_config).transpose()?;

        let current = &self.classes[ci].attributes[ai];
        let name = name.filter(|n| *n != current.name);
        let attribute_type = changes.attribute_type.filter(|t| *t != current.attribute_type);
        let required = changes.required.filter(|r| *r != current.required);
        let config = config.filter(|c| *c != current.config);
        if name.is_none() && attribute_type.is_none() && required.is_none() && config.is_none() {
            return Ok(None);
        }
        if let Some(name) = &name {
            self.ensure_attribute_name_free(ci, name, Some(attribute_id))?;
        }

        let attribute = &mut self.classes[ci].attributes[ai];
        if let Some(name) = name {
            attribute.name = name;
        }
        if let Some(attribute_type) = attribute_type {
            attribute.attribute_type = attribute_type;
        }
        if let Some(required) = required {
            attribute.required = required;
        }
        if let Some(config) = config {
            attribute.config = config;
        }
        attribute.updated_at = Timestamp::now();
        Ok(Some(ModelChange::AttributeUpdated(attribute.clone())))
    }

    /// Removes an attribute.
    ///
    /// # Errors
    ///
    /// - `AttributeNotFound` if the attribute is not part of the project
    /// - `HasDependents` if an identity of the class uses it
    pub fn delete_attribute(
        &mut self,
        attribute_id: &AttributeId,
    ) -> Result<ModelChange, DomainError> {
        let (ci, ai) = self.locate_attribute(attribute_id)?;
        let class = &self.classes[ci];
        let used_by: Vec<&str> = class
            .identities_using(attribute_id)
            .map(|i| i.name.as_str())
            .collect();
        if !used_by.is_empty() {
            return Err(DomainError::has_dependents(format!(
                "Attribute is part of identity {}; remove it from the identity first",
                used_by.join(", ")
            ))
            .with_detail("attribute_id", attribute_id.to_string()));
        }

        let removed = self.classes[ci].attributes.remove(ai);
        Ok(ModelChange::AttributeDeleted(removed))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Relations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a relation between two classes of the project.
    ///
    /// # Errors
    ///
    /// - `ClassNotFound` if either endpoint is not part of the project
    /// - `DuplicateName` if a relation joining the same classes has the name
    pub fn create_relation(&mut self, input: NewRelation) -> Result<ModelChange, DomainError> {
        self.class_index(&input.source_class_id)
            .map_err(|e| e.with_detail("end", "source"))?;
        self.class_index(&input.target_class_id)
            .map_err(|e| e.with_detail("end", "target"))?;

        let name = naming::optional_text("name", input.name, MAX_NAME_LENGTH)?;
        let source_role = naming::optional_text("source_role", input.source_role, MAX_NAME_LENGTH)?;
        let target_role = naming::optional_text("target_role", input.target_role, MAX_NAME_LENGTH)?;
        if let Some(name) = &name {
            self.ensure_relation_name_free(
                &input.source_class_id,
                &input.target_class_id,
                name,
                None,
            )?;
        }

        let now = Timestamp::now();
        let relation = DomainRelation {
            id: RelationId::new(),
            project_id: self.project_id,
            source_class_id: input.source_class_id,
            target_class_id: input.target_class_id,
            name,
            source_role,
            target_role,
            source_multiplicity: input.source_multiplicity,
            target_multiplicity: input.target_multiplicity,
            created_at: now,
            updated_at: now,
        };
        self.relations.push(relation.clone());
        self.sort_relations();
        Ok(ModelChange::RelationCreated(relation))
    }

    /// Applies a partial update. Returns `None` when no supplied field
    /// differs from the stored value after normalisation.
    ///
    /// # Errors
    ///
    /// - `RelationNotFound` if the relation is not part of the project
    /// - `DuplicateName` if the new name collides between the same classes
    pub fn update_relation(
        &mut self,
        relation_id: &RelationId,
        changes: RelationChanges,
    ) -> Result<Option<ModelChange>, DomainError> {
        let idx = self.relation_index(relation_id)?;
        if changes.is_empty() {
            return Ok(None);
        }

        let name = changes
            .name
            .map(|n| naming::optional_text("name", n, MAX_NAME_LENGTH))
            .transpose()?;
        let source_role = changes
            .source_role
            .map(|r| naming::optional_text("source_role", r, MAX_NAME_LENGTH))
            .transpose()?;
        let target_role = changes
            .target_role
            .map(|r| naming::optional_text("target_role", r, MAX_NAME_LENGTH))
            .transpose()?;

        let current = &self.relations[idx];
        let name = name.filter(|n| *n != current.name);
        let source_role = source_role.filter(|r| *r != current.source_role);
        let target_role = target_role.filter(|r| *r != current.target_role);
        let source_multiplicity = changes
            .source_multiplicity
            .filter(|m| *m != current.source_multiplicity);
        let target_multiplicity = changes
            .target_multiplicity
            .filter(|m| *m != current.target_multiplicity);
        if name.is_none()
            && source_role.is_none()
            && target_role.is_none()
            && source_multiplicity.is_none()
            && target_multiplicity.is_none()
        {
            return Ok(None);
        }
        if let Some(Some(name)) = &name {
            let current = &self.relations[idx];
            self.ensure_relation_name_free(
                &current.source_class_id,
                &current.target_class_id,
                name,
                Some(relation_id),
            )?;
        }

        let relation = &mut self.relations[idx];
        if let Some(name) = name {
            relation.name = name;
        }
        if let Some(source_role) = source_role {
            relation.source_role = source_role;
        }
        if let Some(target_role) = target_role {
            relation.target_role = target_role;
        }
        if let Some(multiplicity) = source_multiplicity {
            relation.source_multiplicity = multiplicity;
        }
        if let Some(multiplicity) = target_multiplicity {
            relation.target_multiplicity = multiplicity;
        }
        relation.updated_at = Timestamp::now();
        Ok(Some(ModelChange::RelationUpdated(relation.clone())))
    }

    /// Removes a relation.
    ///
    /// # Errors
    ///
    /// - `RelationNotFound` if the relation is not part of the project
    pub fn delete_relation(&mut self, relation_id: &RelationId) -> Result<ModelChange, DomainError> {
        let idx = self.relation_index(relation_id)?;
        let removed = self.relations.remove(idx);
        Ok(ModelChange::RelationDeleted(removed))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identities
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates an identity, or replaces name, description and attribute
    /// list of an existing one when `identity_id` is supplied.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the attribute list is empty, repeats an
    ///   attribute, or names attributes outside the class
    /// - `ClassNotFound` if the class is not part of the project
    /// - `DuplicateName` if another identity of the class has the name
    /// - `IdentityNotFound` if `identity_id` is not an identity of the class
    pub fn define_identity(
        &mut self,
        input: IdentityDefinition,
    ) -> Result<ModelChange, DomainError> {
        if input.attribute_ids.is_empty() {
            return Err(DomainError::validation(
                "attribute_ids",
                "An identity needs at least one attribute",
            ));
        }
        let ci = self.class_index(&input.class_id)?;
        let class = &self.classes[ci];

        let mut seen = HashSet::with_capacity(input.attribute_ids.len());
        for attribute_id in &input.attribute_ids {
            if !seen.insert(*attribute_id) {
                return Err(DomainError::validation(
                    "attribute_ids",
                    "An identity cannot list the same attribute twice",
                )
                .with_detail("attribute_id", attribute_id.to_string()));
            }
            if class.attribute(attribute_id).is_none() {
                return Err(DomainError::validation(
                    "attribute_ids",
                    "Some attributes do not belong to the class",
                )
                .with_detail("attribute_id", attribute_id.to_string()));
            }
        }

        let name = naming::required_name("name", &input.name)?;
        let description =
            naming::optional_text("description", input.description, MAX_DESCRIPTION_LENGTH)?;
        self.ensure_identity_name_free(ci, &name, input.identity_id.as_ref())?;

        let now = Timestamp::now();
        match input.identity_id {
            Some(identity_id) => {
                let ii = self.classes[ci]
                    .identities
                    .iter()
                    .position(|i| i.id == identity_id)
                    .ok_or_else(|| {
                        DomainError::new(ErrorCode::IdentityNotFound, "Identity not found")
                            .with_detail("identity_id", identity_id.to_string())
                    })?;
                let identity = &mut self.classes[ci].identities[ii];
                identity.name = name;
                identity.description = description;
                identity.attribute_ids = input.attribute_ids;
                identity.updated_at = now;
                Ok(ModelChange::IdentityDefined {
                    identity: identity.clone(),
                    replaced: true,
                })
            }
            None => {
                let identity = DomainIdentity {
                    id: IdentityId::new(),
                    class_id: input.class_id,
                    name,
                    description,
                    attribute_ids: input.attribute_ids,
                    created_at: now,
                    updated_at: now,
                };
                self.classes[ci].identities.push(identity.clone());
                Ok(ModelChange::IdentityDefined {
                    identity,
                    replaced: false,
                })
            }
        }
    }

    /// Removes an identity.
    ///
    /// # Errors
    ///
    /// - `IdentityNotFound` if the identity is not part of the project
    pub fn remove_identity(&mut self, identity_id: &IdentityId) -> Result<ModelChange, DomainError> {
        let (ci, ii) = self
            .classes
            .iter()
            .enumerate()
            .find_map(|(ci, c)| {
                c.identities
                    .iter()
                    .position(|i| &i.id == identity_id)
                    .map(|ii| (ci, ii))
            })
            .ok_or_else(|| {
                DomainError::new(ErrorCode::IdentityNotFound, "Identity not found")
                    .with_detail("identity_id", identity_id.to_string())
            })?;
        let removed = self.classes[ci].identities.remove(ii);
        Ok(ModelChange::IdentityRemoved(removed))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn class_index(&self, class_id: &ClassId) -> Result<usize, DomainError> {
        self.classes
            .iter()
            .position(|c| &c.id == class_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ClassNotFound, "Class not found")
                    .with_detail("class_id", class_id.to_string())
            })
    }

    fn relation_index(&self, relation_id: &RelationId) -> Result<usize, DomainError> {
        self.relations
            .iter()
            .position(|r| &r.id == relation_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::RelationNotFound, "Relation not found")
                    .with_detail("relation_id", relation_id.to_string())
            })
    }

    fn locate_attribute(&self, attribute_id: &AttributeId) -> Result<(usize, usize), DomainError> {
        self.classes
            .iter()
            .enumerate()
            .find_map(|(ci, c)| {
                c.attributes
                    .iter()
                    .position(|a| &a.id == attribute_id)
                    .map(|ai| (ci, ai))
            })
            .ok_or_else(|| {
                DomainError::new(ErrorCode::AttributeNotFound, "Attribute not found")
                    .with_detail("attribute_id", attribute_id.to_string())
            })
    }

    fn ensure_class_name_free(
        &self,
        name: &str,
        except: Option<&ClassId>,
    ) -> Result<(), DomainError> {
        let taken = self
            .classes
            .iter()
            .any(|c| Some(&c.id) != except && c.name.trim() == name);
        if taken {
            return Err(DomainError::duplicate_name(format!(
                "A class named '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn ensure_attribute_name_free(
        &self,
        class_index: usize,
        name: &str,
        except: Option<&AttributeId>,
    ) -> Result<(), DomainError> {
        let key = naming::attribute_name_key(name);
        let taken = self.classes[class_index]
            .attributes
            .iter()
            .any(|a| Some(&a.id) != except && naming::attribute_name_key(&a.name) == key);
        if taken {
            return Err(DomainError::duplicate_name(format!(
                "An attribute named '{}' already exists in this class",
                name
            )));
        }
        Ok(())
    }

    fn ensure_identity_name_free(
        &self,
        class_index: usize,
        name: &str,
        except: Option<&IdentityId>,
    ) -> Result<(), DomainError> {
        let taken = self.classes[class_index]
            .identities
            .iter()
            .any(|i| Some(&i.id) != except && i.name.trim() == name);
        if taken {
            return Err(DomainError::duplicate_name(format!(
                "An identity named '{}' already exists in this class",
                name
            )));
        }
        Ok(())
    }

    fn ensure_relation_name_free(
        &self,
        a: &ClassId,
        b: &ClassId,
        name: &str,
        except: Option<&RelationId>,
    ) -> Result<(), DomainError> {
        let taken = self.relations.iter().any(|r| {
            Some(&r.id) != except
                && r.connects(a, b)
                && r.name.as_deref().map(str::trim) == Some(name)
        });
        if taken {
            return Err(DomainError::duplicate_name(format!(
                "A relation named '{}' already joins these classes",
                name
            )));
        }
        Ok(())
    }

    fn sort_classes(&mut self) {
        self.classes
            .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    }

    fn sort_relations(&mut self) {
        self.relations.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

fn normalize_config(
    config: Option<ConstraintConfig>,
) -> Result<Option<ConstraintConfig>, ValidationError> {
    Ok(config.map(ConstraintConfig::normalize).transpose()?.flatten())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorKind;
    use crate::domain::model::{AttributeType, Multiplicity};

    fn model() -> DomainModel {
        DomainModel::empty(ProjectId::new())
    }

    fn add_class(model: &mut DomainModel, name: &str) -> DomainClass {
        match model
            .create_class(NewClass {
                name: name.to_string(),
                description: None,
            })
            .unwrap()
        {
            ModelChange::ClassCreated(class) => class,
            other => panic!("unexpected change {:?}", other),
        }
    }

    fn add_attribute(model: &mut DomainModel, class_id: ClassId, name: &str) -> DomainAttribute {
        match model
            .create_attribute(NewAttribute {
                class_id,
                name: name.to_string(),
                attribute_type: AttributeType::String,
                required: false,
                config: None,
            })
            .unwrap()
        {
            ModelChange::AttributeCreated(attribute) => attribute,
            other => panic!("unexpected change {:?}", other),
        }
    }

    fn new_relation(source: ClassId, target: ClassId, name: Option<&str>) -> NewRelation {
        NewRelation {
            source_class_id: source,
            target_class_id: target,
            name: name.map(str::to_string),
            source_role: None,
            target_role: None,
            source_multiplicity: Multiplicity::ExactlyOne,
            target_multiplicity: Multiplicity::ZeroOrMore,
        }
    }

    fn identity_of(class_id: ClassId, name: &str, attrs: Vec<AttributeId>) -> IdentityDefinition {
        IdentityDefinition {
            class_id,
            identity_id: None,
            name: name.to_string(),
            description: None,
            attribute_ids: attrs,
        }
    }

    // Class tests

    #[test]
    fn create_class_trims_name_and_blank_description() {
        let mut m = model();
        let change = m
            .create_class(NewClass {
                name: "  Cliente  ".to_string(),
                description: Some("   ".to_string()),
            })
            .unwrap();
        let ModelChange::ClassCreated(class) = change else {
            panic!("expected ClassCreated");
        };
        assert_eq!(class.name, "Cliente");
        assert_eq!(class.description, None);
        assert_eq!(class.project_id, *m.project_id());
    }

    #[test]
    fn rejects_duplicate_class_name_compared_trimmed() {
        let mut m = model();
        add_class(&mut m, "Cliente");
        let err = m
            .create_class(NewClass {
                name: " Cliente ".to_string(),
                description: None,
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateName);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(m.classes().len(), 1);
    }

    #[test]
    fn class_names_are_case_sensitive() {
        let mut m = model();
        add_class(&mut m, "Cliente");
        assert!(m
            .create_class(NewClass {
                name: "cliente".to_string(),
                description: None,
            })
            .is_ok());
    }

    #[test]
    fn rejects_blank_class_name() {
        let mut m = model();
        let err = m
            .create_class(NewClass {
                name: "   ".to_string(),
                description: None,
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn classes_are_kept_ordered_by_name() {
        let mut m = model();
        add_class(&mut m, "Pedido");
        add_class(&mut m, "Cliente");
        add_class(&mut m, "Producto");
        let names: Vec<_> = m.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cliente", "Pedido", "Producto"]);
    }

    #[test]
    fn update_class_with_no_fields_is_a_no_op() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let before = m.clone();
        assert_eq!(m.update_class(&class.id, ClassChanges::default()), Ok(None));
        assert_eq!(m, before);
    }

    #[test]
    fn update_class_may_keep_its_own_name() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let change = m
            .update_class(
                &class.id,
                ClassChanges {
                    name: Some("Cliente".to_string()),
                    description: Some(Some("Buyer".to_string())),
                },
            )
            .unwrap();
        let Some(ModelChange::ClassUpdated(updated)) = change else {
            panic!("expected ClassUpdated");
        };
        assert_eq!(updated.description.as_deref(), Some("Buyer"));
    }

    #[test]
    fn update_class_to_its_current_values_is_a_no_op() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let before = m.clone();
        let change = m.update_class(
            &class.id,
            ClassChanges {
                name: Some(" Cliente ".to_string()),
                description: Some(Some("   ".to_string())),
            },
        );
        assert_eq!(change, Ok(None));
        assert_eq!(m, before);
    }

    #[test]
    fn update_class_rejects_name_of_another_class() {
        let mut m = model();
        add_class(&mut m, "Cliente");
        let pedido = add_class(&mut m, "Pedido");
        let err = m
            .update_class(
                &pedido.id,
                ClassChanges {
                    name: Some("Cliente".to_string()),
                    description: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateName);
        assert_eq!(m.class(&pedido.id).unwrap().name, "Pedido");
    }

    #[test]
    fn update_unknown_class_is_not_found() {
        let mut m = model();
        let err = m
            .update_class(&ClassId::new(), ClassChanges::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ClassNotFound);
    }

    #[test]
    fn delete_class_blocked_by_relation_as_source_or_target() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let b = add_class(&mut m, "B");
        m.create_relation(new_relation(a.id, b.id, None)).unwrap();

        for id in [a.id, b.id] {
            let err = m.delete_class(&id).unwrap_err();
            assert_eq!(err.code, ErrorCode::HasDependents);
            assert_eq!(err.kind(), ErrorKind::Conflict);
        }
        assert_eq!(m.classes().len(), 2);
    }

    #[test]
    fn delete_class_cascades_attributes_and_identities() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "id");
        m.define_identity(identity_of(class.id, "pk", vec![attr.id]))
            .unwrap();

        let change = m.delete_class(&class.id).unwrap();
        let ModelChange::ClassDeleted(removed) = change else {
            panic!("expected ClassDeleted");
        };
        assert_eq!(removed.attributes.len(), 1);
        assert_eq!(removed.identities.len(), 1);
        assert!(m.attribute(&attr.id).is_none());
    }

    // Attribute tests

    #[test]
    fn rejects_duplicate_attribute_name_ignoring_case_and_padding() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        add_attribute(&mut m, class.id, "Email");
        let err = m
            .create_attribute(NewAttribute {
                class_id: class.id,
                name: " email ".to_string(),
                attribute_type: AttributeType::String,
                required: true,
                config: None,
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateName);
    }

    #[test]
    fn same_attribute_name_allowed_in_different_classes() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let b = add_class(&mut m, "B");
        add_attribute(&mut m, a.id, "id");
        add_attribute(&mut m, b.id, "id");
        assert_eq!(m.class(&b.id).unwrap().attributes.len(), 1);
    }

    #[test]
    fn create_attribute_on_unknown_class_is_not_found() {
        let mut m = model();
        let err = m
            .create_attribute(NewAttribute {
                class_id: ClassId::new(),
                name: "id".to_string(),
                attribute_type: AttributeType::Uuid,
                required: true,
                config: None,
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ClassNotFound);
    }

    #[test]
    fn create_attribute_rejects_inconsistent_config() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let err = m
            .create_attribute(NewAttribute {
                class_id: class.id,
                name: "nombre".to_string(),
                attribute_type: AttributeType::String,
                required: true,
                config: Some(ConstraintConfig {
                    length_min: Some(10),
                    length_max: Some(5),
                    ..Default::default()
                }),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(m.class(&class.id).unwrap().attributes.is_empty());
    }

    #[test]
    fn attributes_keep_creation_order() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        add_attribute(&mut m, class.id, "zeta");
        add_attribute(&mut m, class.id, "alfa");
        let names: Vec<_> = m
            .class(&class.id)
            .unwrap()
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alfa"]);
    }

    #[test]
    fn update_attribute_changes_type_and_clears_config() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "edad");
        let change = m
            .update_attribute(
                &attr.id,
                AttributeChanges {
                    attribute_type: Some(AttributeType::Integer),
                    config: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        let Some(ModelChange::AttributeUpdated(updated)) = change else {
            panic!("expected AttributeUpdated");
        };
        assert_eq!(updated.attribute_type, AttributeType::Integer);
        assert_eq!(updated.config, None);
        assert_eq!(updated.name, "edad");
    }

    #[test]
    fn update_attribute_to_its_current_values_is_a_no_op() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "edad");
        let before = m.clone();
        let change = m.update_attribute(
            &attr.id,
            AttributeChanges {
                name: Some("edad ".to_string()),
                attribute_type: Some(AttributeType::String),
                required: Some(false),
                config: Some(None),
            },
        );
        assert_eq!(change, Ok(None));
        assert_eq!(m, before);
    }

    #[test]
    fn update_attribute_may_change_case_of_its_own_name() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "email");
        assert!(m
            .update_attribute(
                &attr.id,
                AttributeChanges {
                    name: Some("Email".to_string()),
                    ..Default::default()
                },
            )
            .is_ok());
    }

    #[test]
    fn delete_attribute_blocked_while_used_by_identity() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "id");
        m.define_identity(identity_of(class.id, "pk", vec![attr.id]))
            .unwrap();

        let err = m.delete_attribute(&attr.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::HasDependents);
        assert!(m.attribute(&attr.id).is_some());
    }

    #[test]
    fn delete_unused_attribute_succeeds() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "id");
        assert!(matches!(
            m.delete_attribute(&attr.id),
            Ok(ModelChange::AttributeDeleted(_))
        ));
        assert!(m.attribute(&attr.id).is_none());
    }

    // Relation tests

    #[test]
    fn create_relation_requires_both_endpoints() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let err = m
            .create_relation(new_relation(a.id, ClassId::new(), None))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ClassNotFound);
        assert_eq!(err.details.get("end").map(String::as_str), Some("target"));
        assert!(m.relations().is_empty());
    }

    #[test]
    fn self_relation_is_allowed() {
        let mut m = model();
        let a = add_class(&mut m, "Empleado");
        assert!(m.create_relation(new_relation(a.id, a.id, Some("jefe"))).is_ok());
    }

    #[test]
    fn relation_name_unique_between_same_classes_in_either_direction() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let b = add_class(&mut m, "B");
        let c = add_class(&mut m, "C");
        m.create_relation(new_relation(a.id, b.id, Some("owns")))
            .unwrap();

        let err = m
            .create_relation(new_relation(b.id, a.id, Some(" owns ")))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateName);
        assert!(m.create_relation(new_relation(a.id, c.id, Some("owns"))).is_ok());
        assert!(m.create_relation(new_relation(a.id, b.id, None)).is_ok());
        assert!(m.create_relation(new_relation(a.id, b.id, None)).is_ok());
    }

    #[test]
    fn update_relation_to_its_current_values_is_a_no_op() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let b = add_class(&mut m, "B");
        let ModelChange::RelationCreated(rel) = m
            .create_relation(new_relation(a.id, b.id, Some("owns")))
            .unwrap()
        else {
            panic!("expected RelationCreated");
        };
        let before = m.clone();

        let change = m.update_relation(
            &rel.id,
            RelationChanges {
                name: Some(Some(" owns".to_string())),
                source_role: Some(None),
                source_multiplicity: Some(Multiplicity::ExactlyOne),
                target_multiplicity: Some(Multiplicity::ZeroOrMore),
                ..Default::default()
            },
        );
        assert_eq!(change, Ok(None));
        assert_eq!(m, before);
    }

    #[test]
    fn update_relation_clears_name_and_changes_multiplicity() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let b = add_class(&mut m, "B");
        let ModelChange::RelationCreated(rel) = m
            .create_relation(new_relation(a.id, b.id, Some("owns")))
            .unwrap()
        else {
            panic!("expected RelationCreated");
        };

        let change = m
            .update_relation(
                &rel.id,
                RelationChanges {
                    name: Some(Some("  ".to_string())),
                    source_multiplicity: Some(Multiplicity::OneOrMore),
                    ..Default::default()
                },
            )
            .unwrap();
        let Some(ModelChange::RelationUpdated(updated)) = change else {
            panic!("expected RelationUpdated");
        };
        assert_eq!(updated.name, None);
        assert_eq!(updated.source_multiplicity, Multiplicity::OneOrMore);
        assert_eq!(updated.target_multiplicity, Multiplicity::ZeroOrMore);
    }

    #[test]
    fn delete_unknown_relation_is_not_found() {
        let mut m = model();
        assert_eq!(
            m.delete_relation(&RelationId::new()).unwrap_err().code,
            ErrorCode::RelationNotFound
        );
    }

    // Identity tests

    #[test]
    fn define_identity_rejects_empty_attribute_list() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let err = m
            .define_identity(identity_of(class.id, "pk", vec![]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn define_identity_rejects_foreign_attribute() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let b = add_class(&mut m, "B");
        let own = add_attribute(&mut m, a.id, "id");
        let foreign = add_attribute(&mut m, b.id, "id");
        let err = m
            .define_identity(identity_of(a.id, "pk", vec![own.id, foreign.id]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(m.class(&a.id).unwrap().identities.is_empty());
    }

    #[test]
    fn define_identity_rejects_repeated_attribute() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "id");
        assert!(m
            .define_identity(identity_of(class.id, "pk", vec![attr.id, attr.id]))
            .is_err());
    }

    #[test]
    fn define_identity_keeps_attribute_order() {
        let mut m = model();
        let class = add_class(&mut m, "Linea");
        let first = add_attribute(&mut m, class.id, "pedido");
        let second = add_attribute(&mut m, class.id, "numero");
        let ModelChange::IdentityDefined { identity, replaced } = m
            .define_identity(identity_of(class.id, "pk", vec![second.id, first.id]))
            .unwrap()
        else {
            panic!("expected IdentityDefined");
        };
        assert!(!replaced);
        assert_eq!(identity.attribute_ids, vec![second.id, first.id]);
    }

    #[test]
    fn redefining_identity_replaces_name_and_attributes() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let id_attr = add_attribute(&mut m, class.id, "id");
        let email = add_attribute(&mut m, class.id, "email");
        let ModelChange::IdentityDefined { identity, .. } = m
            .define_identity(identity_of(class.id, "pk", vec![id_attr.id]))
            .unwrap()
        else {
            panic!("expected IdentityDefined");
        };

        let mut redefinition = identity_of(class.id, "pk", vec![email.id]);
        redefinition.identity_id = Some(identity.id);
        let ModelChange::IdentityDefined {
            identity: replaced_identity,
            replaced,
        } = m.define_identity(redefinition).unwrap()
        else {
            panic!("expected IdentityDefined");
        };
        assert!(replaced);
        assert_eq!(replaced_identity.id, identity.id);
        assert_eq!(replaced_identity.attribute_ids, vec![email.id]);
        assert_eq!(m.class(&class.id).unwrap().identities.len(), 1);
    }

    #[test]
    fn identity_names_are_unique_per_class() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "id");
        m.define_identity(identity_of(class.id, "pk", vec![attr.id]))
            .unwrap();
        let err = m
            .define_identity(identity_of(class.id, "pk", vec![attr.id]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateName);
    }

    #[test]
    fn redefining_unknown_identity_is_not_found() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "id");
        let mut definition = identity_of(class.id, "pk", vec![attr.id]);
        definition.identity_id = Some(IdentityId::new());
        assert_eq!(
            m.define_identity(definition).unwrap_err().code,
            ErrorCode::IdentityNotFound
        );
    }

    #[test]
    fn remove_identity_unblocks_attribute_delete() {
        let mut m = model();
        let class = add_class(&mut m, "Cliente");
        let attr = add_attribute(&mut m, class.id, "id");
        let ModelChange::IdentityDefined { identity, .. } = m
            .define_identity(identity_of(class.id, "pk", vec![attr.id]))
            .unwrap()
        else {
            panic!("expected IdentityDefined");
        };

        m.remove_identity(&identity.id).unwrap();
        assert!(m.delete_attribute(&attr.id).is_ok());
    }

    #[test]
    fn snapshot_orders_relations_by_creation() {
        let mut m = model();
        let a = add_class(&mut m, "A");
        let b = add_class(&mut m, "B");
        let first = m.create_relation(new_relation(b.id, a.id, Some("z"))).unwrap();
        let second = m.create_relation(new_relation(a.id, b.id, Some("a"))).unwrap();
        let (ModelChange::RelationCreated(r1), ModelChange::RelationCreated(r2)) = (first, second)
        else {
            panic!("expected RelationCreated");
        };

        let snapshot = m.snapshot();
        let ids: Vec<_> = snapshot.relations.iter().map(|r| r.id).collect();
        if r1.created_at == r2.created_at {
            assert_eq!(ids.len(), 2);
        } else {
            assert_eq!(ids, vec![r1.id, r2.id]);
        }
    }
}
