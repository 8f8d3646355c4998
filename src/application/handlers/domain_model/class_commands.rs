//! Class command handlers: create, update, delete.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{ActorId, ClassId, DomainError, ProjectId};
use crate::domain::model::{ClassChanges, DomainClass, NewClass};
use crate::ports::{AccessGuard, DomainModelStore};

use super::super::report_rejection;

/// Command to create a class.
#[derive(Debug, Clone)]
pub struct CreateClassCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub name: String,
    pub description: Option<String>,
}

/// Command to update a class. Absent fields are left untouched;
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone)]
pub struct UpdateClassCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub class_id: ClassId,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Command to delete a class with its attributes and identities.
#[derive(Debug, Clone)]
pub struct DeleteClassCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub class_id: ClassId,
}

pub struct CreateClassHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl CreateClassHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: CreateClassCommand) -> Result<DomainClass, DomainError> {
        // 1. Authorize
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;

        // 2. Write
        let class = self
            .store
            .create_class(
                &cmd.project_id,
                &access.actor_id,
                NewClass {
                    name: cmd.name,
                    description: cmd.description,
                },
            )
            .await
            .inspect_err(report_rejection("create_class", cmd.project_id))?;

        info!(
            project_id = %cmd.project_id,
            actor_id = %access.actor_id,
            class_id = %class.id,
            "Class created"
        );
        Ok(class)
    }
}

pub struct UpdateClassHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl UpdateClassHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: UpdateClassCommand) -> Result<DomainClass, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;

        let class = self
            .store
            .update_class(
                &cmd.project_id,
                &access.actor_id,
                &cmd.class_id,
                ClassChanges {
                    name: cmd.name,
                    description: cmd.description,
                },
            )
            .await
            .inspect_err(report_rejection("update_class", cmd.project_id))?;

        info!(project_id = %cmd.project_id, class_id = %class.id, "Class updated");
        Ok(class)
    }
}

pub struct DeleteClassHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl DeleteClassHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: DeleteClassCommand) -> Result<(), DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;

        self.store
            .delete_class(&cmd.project_id, &access.actor_id, &cmd.class_id)
            .await
            .inspect_err(report_rejection("delete_class", cmd.project_id))?;

        info!(project_id = %cmd.project_id, class_id = %cmd.class_id, "Class deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Fixture;
    use crate::domain::foundation::ErrorCode;

    fn create(fx: &Fixture, name: &str) -> CreateClassCommand {
        CreateClassCommand {
            project_id: fx.project_id,
            actor_id: fx.editor,
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn creates_class_with_trimmed_name() {
        let fx = Fixture::new();
        let class = CreateClassHandler::new(fx.access(), fx.store())
            .handle(create(&fx, "  Cliente "))
            .await
            .unwrap();

        assert_eq!(class.name, "Cliente");
        assert_eq!(class.project_id, fx.project_id);
    }

    #[tokio::test]
    async fn viewer_cannot_create_class() {
        let fx = Fixture::new();
        let mut cmd = create(&fx, "Cliente");
        cmd.actor_id = fx.viewer;

        let err = CreateClassHandler::new(fx.access(), fx.store())
            .handle(cmd)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(fx.model().await.classes.is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let fx = Fixture::new();
        let err = CreateClassHandler::new(fx.access(), fx.store())
            .handle(create(&fx, "   "))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyField);
    }

    #[tokio::test]
    async fn update_clears_description() {
        let fx = Fixture::new();
        let mut cmd = create(&fx, "Cliente");
        cmd.description = Some("Buyer".to_string());
        let class = CreateClassHandler::new(fx.access(), fx.store())
            .handle(cmd)
            .await
            .unwrap();

        let updated = UpdateClassHandler::new(fx.access(), fx.store())
            .handle(UpdateClassCommand {
                project_id: fx.project_id,
                actor_id: fx.editor,
                class_id: class.id,
                name: None,
                description: Some(None),
            })
            .await
            .unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.name, "Cliente");
    }

    #[tokio::test]
    async fn delete_removes_class() {
        let fx = Fixture::new();
        let class = fx.class("Cliente").await;

        DeleteClassHandler::new(fx.access(), fx.store())
            .handle(DeleteClassCommand {
                project_id: fx.project_id,
                actor_id: fx.editor,
                class_id: class.id,
            })
            .await
            .unwrap();
        assert!(fx.model().await.classes.is_empty());
    }
}
