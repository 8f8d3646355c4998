//! In-memory DomainModelStore and AuditLog.
//!
//! Each project's aggregate and audit trail live behind one tokio
//! `RwLock`. A mutation stages the write on a copy of the aggregate and
//! swaps it in, together with its audit record, only when accepted.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::audit::AuditRecord;
use crate::domain::foundation::{
    ActorId, AttributeId, ClassId, DomainError, ErrorCode, IdentityId, ProjectId, RelationId,
};
use crate::domain::model::{
    AttributeChanges, ClassChanges, DomainAttribute, DomainClass, DomainIdentity, DomainModel,
    DomainRelation, IdentityDefinition, ModelChange, ModelSnapshot, NewAttribute, NewClass,
    NewRelation, RelationChanges,
};
use crate::ports::{AuditLog, DomainModelStore};

struct ProjectState {
    model: DomainModel,
    audit: Vec<AuditRecord>,
}

impl ProjectState {
    fn new(project_id: ProjectId) -> Self {
        Self {
            model: DomainModel::empty(project_id),
            audit: Vec::new(),
        }
    }
}

/// In-memory store of every project's domain model.
#[derive(Default)]
pub struct InMemoryDomainModelStore {
    projects: RwLock<HashMap<ProjectId, ProjectState>>,
}

impl InMemoryDomainModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one write against a staged copy of the project's aggregate.
    ///
    /// `None` from `op` means nothing changed: no swap, no audit record.
    async fn mutate<F>(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        op: F,
    ) -> Result<Option<ModelChange>, DomainError>
    where
        F: FnOnce(&mut DomainModel) -> Result<Option<ModelChange>, DomainError> + Send,
    {
        let mut projects = self.projects.write().await;
        let state = projects
            .entry(*project_id)
            .or_insert_with(|| ProjectState::new(*project_id));

        let mut staged = state.model.clone();
        let change = op(&mut staged)?;
        if let Some(change) = &change {
            state
                .audit
                .push(AuditRecord::for_change(*project_id, *actor_id, change));
            state.model = staged;
        }
        Ok(change)
    }

    async fn apply<F>(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        op: F,
    ) -> Result<ModelChange, DomainError>
    where
        F: FnOnce(&mut DomainModel) -> Result<ModelChange, DomainError> + Send,
    {
        self.mutate(project_id, actor_id, |m| op(m).map(Some))
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "Write produced no change"))
    }

    async fn read<T>(&self, project_id: &ProjectId, f: impl FnOnce(&DomainModel) -> T) -> Option<T> {
        let projects = self.projects.read().await;
        projects.get(project_id).map(|state| f(&state.model))
    }

    // === Test Helpers ===

    /// Number of audit records written for a project.
    pub async fn audit_count(&self, project_id: &ProjectId) -> usize {
        self.projects
            .read()
            .await
            .get(project_id)
            .map_or(0, |state| state.audit.len())
    }
}

fn not_found(code: ErrorCode, what: &str) -> DomainError {
    DomainError::new(code, format!("{} not found", what))
}

#[async_trait]
impl DomainModelStore for InMemoryDomainModelStore {
    async fn get_model(&self, project_id: &ProjectId) -> Result<ModelSnapshot, DomainError> {
        Ok(self
            .read(project_id, DomainModel::snapshot)
            .await
            .unwrap_or_else(|| DomainModel::empty(*project_id).into_snapshot()))
    }

    async fn find_class_by_id(
        &self,
        project_id: &ProjectId,
        class_id: &ClassId,
    ) -> Result<Option<DomainClass>, DomainError> {
        Ok(self
            .read(project_id, |m| m.class(class_id).cloned())
            .await
            .flatten())
    }

    async fn find_class_by_name(
        &self,
        project_id: &ProjectId,
        name: &str,
    ) -> Result<Option<DomainClass>, DomainError> {
        Ok(self
            .read(project_id, |m| m.class_by_name(name).cloned())
            .await
            .flatten())
    }

    async fn create_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewClass,
    ) -> Result<DomainClass, DomainError> {
        self.apply(project_id, actor_id, |m| m.create_class(input))
            .await?
            .into_class()
    }

    async fn update_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        class_id: &ClassId,
        changes: ClassChanges,
    ) -> Result<DomainClass, DomainError> {
        match self
            .mutate(project_id, actor_id, |m| m.update_class(class_id, changes))
            .await?
        {
            Some(change) => change.into_class(),
            None => self
                .find_class_by_id(project_id, class_id)
                .await?
                .ok_or_else(|| not_found(ErrorCode::ClassNotFound, "Class")),
        }
    }

    async fn delete_class(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        class_id: &ClassId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.delete_class(class_id)).await?;
        Ok(())
    }

    async fn create_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewAttribute,
    ) -> Result<DomainAttribute, DomainError> {
        self.apply(project_id, actor_id, |m| m.create_attribute(input))
            .await?
            .into_attribute()
    }

    async fn update_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        attribute_id: &AttributeId,
        changes: AttributeChanges,
    ) -> Result<DomainAttribute, DomainError> {
        match self
            .mutate(project_id, actor_id, |m| m.update_attribute(attribute_id, changes))
            .await?
        {
            Some(change) => change.into_attribute(),
            None => self
                .read(project_id, |m| m.attribute(attribute_id).cloned())
                .await
                .flatten()
                .ok_or_else(|| not_found(ErrorCode::AttributeNotFound, "Attribute")),
        }
    }

    async fn delete_attribute(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        attribute_id: &AttributeId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.delete_attribute(attribute_id)).await?;
        Ok(())
    }

    async fn create_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        input: NewRelation,
    ) -> Result<DomainRelation, DomainError> {
        self.apply(project_id, actor_id, |m| m.create_relation(input))
            .await?
            .into_relation()
    }

    async fn update_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        relation_id: &RelationId,
        changes: RelationChanges,
    ) -> Result<DomainRelation, DomainError> {
        match self
            .mutate(project_id, actor_id, |m| m.update_relation(relation_id, changes))
            .await?
        {
            Some(change) => change.into_relation(),
            None => self
                .read(project_id, |m| m.relation(relation_id).cloned())
                .await
                .flatten()
                .ok_or_else(|| not_found(ErrorCode::RelationNotFound, "Relation")),
        }
    }

    async fn delete_relation(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        relation_id: &RelationId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.delete_relation(relation_id)).await?;
        Ok(())
    }

    async fn define_identity(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        definition: IdentityDefinition,
    ) -> Result<DomainIdentity, DomainError> {
        self.apply(project_id, actor_id, |m| m.define_identity(definition))
            .await?
            .into_identity()
    }

    async fn remove_identity(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
        identity_id: &IdentityId,
    ) -> Result<(), DomainError> {
        self.apply(project_id, actor_id, |m| m.remove_identity(identity_id)).await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for InMemoryDomainModelStore {
    async fn list_recent(
        &self,
        project_id: &ProjectId,
        limit: u32,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let projects = self.projects.read().await;
        Ok(projects
            .get(project_id)
            .map(|state| {
                state
                    .audit
                    .iter()
                    .rev()
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
