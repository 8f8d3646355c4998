//! Relation command handlers.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{ActorId, ClassId, DomainError, ProjectId, RelationId};
use crate::domain::model::{DomainRelation, Multiplicity, NewRelation, RelationChanges};
use crate::ports::{AccessGuard, DomainModelStore};

use super::super::report_rejection;

/// Command to relate two classes of the same project.
///
/// Multiplicities are parsed from their wire form (`"zero-or-more"`,
/// `"ZERO_OR_MORE"`).
#[derive(Debug, Clone)]
pub struct CreateRelationCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub source_class_id: ClassId,
    pub target_class_id: ClassId,
    pub name: Option<String>,
    pub source_role: Option<String>,
    pub target_role: Option<String>,
    pub source_multiplicity: String,
    pub target_multiplicity: String,
}

/// Partial relation update. Endpoints cannot change.
#[derive(Debug, Clone)]
pub struct UpdateRelationCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub relation_id: RelationId,
    pub name: Option<Option<String>>,
    pub source_role: Option<Option<String>>,
    pub target_role: Option<Option<String>>,
    pub source_multiplicity: Option<String>,
    pub target_multiplicity: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteRelationCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub relation_id: RelationId,
}

fn parse_multiplicity(raw: Option<&str>) -> Result<Option<Multiplicity>, DomainError> {
    Ok(raw.map(str::parse::<Multiplicity>).transpose()?)
}

pub struct CreateRelationHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl CreateRelationHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: CreateRelationCommand) -> Result<DomainRelation, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;
        let source_multiplicity: Multiplicity = cmd.source_multiplicity.parse()?;
        let target_multiplicity: Multiplicity = cmd.target_multiplicity.parse()?;

        let relation = self
            .store
            .create_relation(
                &cmd.project_id,
                &access.actor_id,
                NewRelation {
                    source_class_id: cmd.source_class_id,
                    target_class_id: cmd.target_class_id,
                    name: cmd.name,
                    source_role: cmd.source_role,
                    target_role: cmd.target_role,
                    source_multiplicity,
                    target_multiplicity,
                },
            )
            .await
            .inspect_err(report_rejection("create_relation", cmd.project_id))?;

        info!(
            project_id = %cmd.project_id,
            relation_id = %relation.id,
            source_class_id = %relation.source_class_id,
            target_class_id = %relation.target_class_id,
            "Relation created"
        );
        Ok(relation)
    }
}

pub struct UpdateRelationHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl UpdateRelationHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: UpdateRelationCommand) -> Result<DomainRelation, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;
        let changes = RelationChanges {
            name: cmd.name,
            source_role: cmd.source_role,
            target_role: cmd.target_role,
            source_multiplicity: parse_multiplicity(cmd.source_multiplicity.as_deref())?,
            target_multiplicity: parse_multiplicity(cmd.target_multiplicity.as_deref())?,
        };

        let relation = self
            .store
            .update_relation(&cmd.project_id, &access.actor_id, &cmd.relation_id, changes)
            .await
            .inspect_err(report_rejection("update_relation", cmd.project_id))?;

        info!(project_id = %cmd.project_id, relation_id = %relation.id, "Relation updated");
        Ok(relation)
    }
}

pub struct DeleteRelationHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl DeleteRelationHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: DeleteRelationCommand) -> Result<(), DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;

        self.store
            .delete_relation(&cmd.project_id, &access.actor_id, &cmd.relation_id)
            .await
            .inspect_err(report_rejection("delete_relation", cmd.project_id))?;

        info!(project_id = %cmd.project_id, relation_id = %cmd.relation_id, "Relation deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Fixture;
    use crate::domain::foundation::ErrorCode;

    fn create(fx: &Fixture, source: ClassId, target: ClassId) -> CreateRelationCommand {
        CreateRelationCommand {
            project_id: fx.project_id,
            actor_id: fx.editor,
            source_class_id: source,
            target_class_id: target,
            name: None,
            source_role: None,
            target_role: None,
            source_multiplicity: "exactly-one".to_string(),
            target_multiplicity: "ZERO_OR_MORE".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_relation_between_project_classes() {
        let fx = Fixture::new();
        let (a, b) = (fx.class("A").await, fx.class("B").await);
        let relation = CreateRelationHandler::new(fx.access(), fx.store())
            .handle(create(&fx, a.id, b.id))
            .await
            .unwrap();

        assert_eq!(relation.target_multiplicity, Multiplicity::ZeroOrMore);
        assert_eq!(fx.model().await.relations, vec![relation]);
    }

    #[tokio::test]
    async fn unknown_endpoint_is_not_found() {
        let fx = Fixture::new();
        let a = fx.class("A").await;
        let err = CreateRelationHandler::new(fx.access(), fx.store())
            .handle(create(&fx, a.id, ClassId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ClassNotFound);
    }

    #[tokio::test]
    async fn invalid_multiplicity_is_rejected_before_write() {
        let fx = Fixture::new();
        let (a, b) = (fx.class("A").await, fx.class("B").await);
        let mut cmd = create(&fx, a.id, b.id);
        cmd.source_multiplicity = "many".to_string();

        let err = CreateRelationHandler::new(fx.access(), fx.store())
            .handle(cmd)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedValue);
        assert!(fx.model().await.relations.is_empty());
    }

    #[tokio::test]
    async fn update_sets_and_clears_roles() {
        let fx = Fixture::new();
        let (a, b) = (fx.class("A").await, fx.class("B").await);
        let mut cmd = create(&fx, a.id, b.id);
        cmd.source_role = Some("buyer".to_string());
        let relation = CreateRelationHandler::new(fx.access(), fx.store())
            .handle(cmd)
            .await
            .unwrap();

        let updated = UpdateRelationHandler::new(fx.access(), fx.store())
            .handle(UpdateRelationCommand {
                project_id: fx.project_id,
                actor_id: fx.editor,
                relation_id: relation.id,
                name: Some(Some("places".to_string())),
                source_role: Some(None),
                target_role: None,
                source_multiplicity: Some("zero-or-one".to_string()),
                target_multiplicity: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("places"));
        assert_eq!(updated.source_role, None);
        assert_eq!(updated.source_multiplicity, Multiplicity::ZeroOrOne);
    }

    #[tokio::test]
    async fn delete_unblocks_class_deletion() {
        let fx = Fixture::new();
        let (a, b) = (fx.class("A").await, fx.class("B").await);
        let relation = CreateRelationHandler::new(fx.access(), fx.store())
            .handle(create(&fx, a.id, b.id))
            .await
            .unwrap();

        DeleteRelationHandler::new(fx.access(), fx.store())
            .handle(DeleteRelationCommand {
                project_id: fx.project_id,
                actor_id: fx.editor,
                relation_id: relation.id,
            })
            .await
            .unwrap();
        assert!(fx.store().delete_class(&fx.project_id, &fx.editor, &a.id).await.is_ok());
    }
}
