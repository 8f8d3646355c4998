//! Domain model store port.
//!
//! The only writer of domain-model state. Every mutating operation runs as
//! one atomic unit: invariant checks, the write and one audit record
//! either all happen or none do.
//!
//! Callers perform the access check before calling in.

use async_trait::async_trait;

use crate::domain::foundation::{
    ActorId, AttributeId, ClassId, DomainError, IdentityId, ProjectId, RelationId,
};
use crate::domain::model::{
    AttributeChanges, ClassChanges, DomainAttribute, DomainClass, DomainIdentity, DomainRelation,
    IdentityDefinition, ModelSnapshot, NewAttribute, NewClass, NewRelation, RelationChanges,
};

#[async_trait]
pub trait DomainModelStore: Send + Sync {
    /// Full, ordered read of a project's model (classes by name,
    /// relations by creation).
    async fn get_model(&self, project_id: &ProjectId) -> Result<ModelSnapshot, DomainError>;

    async fn find_class_by_id(
        &self,
        project_id: &ProjectId,
        class_id: &ClassId,
    ) -> Result<Option<DomainClass>, DomainError>;

    /// Looks up a class by trimmed name.
    async fn find_class_by_name(
        &self,
        project_id: &ProjectId,
        name: &str,
    ) -> Result<Option<DomainClass>, DomainError>;

    /// # Errors
    ///
    /// - `DuplicateName` if the name is taken in the project
    async fn create_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewClass,
    ) -> Result<DomainClass, DomainError>;

    /// An update with no fields returns the class unchanged and is not audited.
    ///
    /// # Errors
    ///
    /// - `ClassNotFound`, `DuplicateName`
    async fn update_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        class_id: &ClassId,
        changes: ClassChanges,
    ) -> Result<DomainClass, DomainError>;

    /// # Errors
    ///
    /// - `ClassNotFound`
    /// - `HasDependents` while any relation references the class
    async fn delete_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        class_id: &ClassId,
    ) -> Result<(), DomainError>;

    async fn create_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewAttribute,
    ) -> Result<DomainAttribute, DomainError>;

    async fn update_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        attribute_id: &AttributeId,
        changes: AttributeChanges,
    ) -> Result<DomainAttribute, DomainError>;

    /// # Errors
    ///
    /// - `AttributeNotFound`
    /// - `HasDependents` while an identity uses the attribute
    async fn delete_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        attribute_id: &AttributeId,
    ) -> Result<(), DomainError>;

    async fn create_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewRelation,
    ) -> Result<DomainRelation, DomainError>;

    async fn update_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        relation_id: &RelationId,
        changes: RelationChanges,
    ) -> Result<DomainRelation, DomainError>;

    async fn delete_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        relation_id: &RelationId,
    ) -> Result<(), DomainError>;

    /// Creates an identity, or replaces one when `identity_id` is set.
    async fn define_identity(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        definition: IdentityDefinition,
    ) -> Result<DomainIdentity, DomainError>;

    async fn remove_identity(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        identity_id: &IdentityId,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_model_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn DomainModelStore) {}
    }
}
