//! Attribute command handlers.
//!
//! Attribute types arrive as strings and are parsed here, so an unknown
//! type is a `BadRequest` before the store is touched.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{ActorId, AttributeId, ClassId, DomainError, ProjectId};
use crate::domain::model::{
    AttributeChanges, AttributeType, ConstraintConfig, DomainAttribute, NewAttribute,
};
use crate::ports::{AccessGuard, DomainModelStore};

use super::super::report_rejection;

#[derive(Debug, Clone)]
pub struct CreateAttributeCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub class_id: ClassId,
    pub name: String,
    pub attribute_type: String,
    pub required: bool,
    pub config: Option<ConstraintConfig>,
}

/// Partial attribute update. `config: Some(None)` removes the constraints.
#[derive(Debug, Clone)]
pub struct UpdateAttributeCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub attribute_id: AttributeId,
    pub name: Option<String>,
    pub attribute_type: Option<String>,
    pub required: Option<bool>,
    pub config: Option<Option<ConstraintConfig>>,
}

#[derive(Debug, Clone)]
pub struct DeleteAttributeCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub attribute_id: AttributeId,
}

pub struct CreateAttributeHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl CreateAttributeHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: CreateAttributeCommand) -> Result<DomainAttribute, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;
        let attribute_type: AttributeType = cmd.attribute_type.parse()?;

        let attribute = self
            .store
            .create_attribute(
                &cmd.project_id,
                &access.actor_id,
                NewAttribute {
                    class_id: cmd.class_id,
                    name: cmd.name,
                    attribute_type,
                    required: cmd.required,
                    config: cmd.config,
                },
            )
            .await
            .inspect_err(report_rejection("create_attribute", cmd.project_id))?;

        info!(
            project_id = %cmd.project_id,
            class_id = %attribute.class_id,
            attribute_id = %attribute.id,
            "Attribute created"
        );
        Ok(attribute)
    }
}

pub struct UpdateAttributeHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl UpdateAttributeHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: UpdateAttributeCommand) -> Result<DomainAttribute, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;
        let attribute_type = cmd
            .attribute_type
            .as_deref()
            .map(str::parse::<AttributeType>)
            .transpose()?;

        let attribute = self
            .store
            .update_attribute(
                &cmd.project_id,
                &access.actor_id,
                &cmd.attribute_id,
                AttributeChanges {
                    name: cmd.name,
                    attribute_type,
                    required: cmd.required,
                    config: cmd.config,
                },
            )
            .await
            .inspect_err(report_rejection("update_attribute", cmd.project_id))?;

        info!(project_id = %cmd.project_id, attribute_id = %attribute.id, "Attribute updated");
        Ok(attribute)
    }
}

pub struct DeleteAttributeHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl DeleteAttributeHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: DeleteAttributeCommand) -> Result<(), DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;

        self.store
            .delete_attribute(&cmd.project_id, &access.actor_id, &cmd.attribute_id)
            .await
            .inspect_err(report_rejection("delete_attribute", cmd.project_id))?;

        info!(project_id = %cmd.project_id, attribute_id = %cmd.attribute_id, "Attribute deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Fixture;
    use crate::domain::foundation::ErrorCode;

    fn create(fx: &Fixture, class_id: ClassId, name: &str, attribute_type: &str) -> CreateAttributeCommand {
        CreateAttributeCommand {
            project_id: fx.project_id,
            actor_id: fx.editor,
            class_id,
            name: name.to_string(),
            attribute_type: attribute_type.to_string(),
            required: false,
            config: None,
        }
    }

    #[tokio::test]
    async fn parses_type_case_insensitively() {
        let fx = Fixture::new();
        let class = fx.class("Pedido").await;
        let attribute = CreateAttributeHandler::new(fx.access(), fx.store())
            .handle(create(&fx, class.id, "notes", "LONG_TEXT"))
            .await
            .unwrap();
        assert_eq!(attribute.attribute_type, AttributeType::LongText);
    }

    #[tokio::test]
    async fn unknown_type_is_bad_request() {
        let fx = Fixture::new();
        let class = fx.class("Pedido").await;
        let err = CreateAttributeHandler::new(fx.access(), fx.store())
            .handle(create(&fx, class.id, "blob", "binary"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedValue);
        assert!(fx.model().await.classes[0].attributes.is_empty());
    }

    #[tokio::test]
    async fn duplicate_name_ignores_case_and_whitespace() {
        let fx = Fixture::new();
        let class = fx.class("Cliente").await;
        let handler = CreateAttributeHandler::new(fx.access(), fx.store());
        handler.handle(create(&fx, class.id, "Id", "uuid")).await.unwrap();

        let err = handler
            .handle(create(&fx, class.id, " id ", "uuid"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateName);
    }

    #[tokio::test]
    async fn invalid_constraint_config_is_rejected() {
        let fx = Fixture::new();
        let class = fx.class("Cliente").await;
        let mut cmd = create(&fx, class.id, "email", "string");
        cmd.config = Some(ConstraintConfig {
            length_min: Some(10),
            length_max: Some(5),
            ..ConstraintConfig::default()
        });

        let err = CreateAttributeHandler::new(fx.access(), fx.store())
            .handle(cmd)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::domain::foundation::ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn update_changes_type_and_required() {
        let fx = Fixture::new();
        let class = fx.class("Cliente").await;
        let attribute = fx.attribute(&class.id, "edad", "string").await;

        let updated = UpdateAttributeHandler::new(fx.access(), fx.store())
            .handle(UpdateAttributeCommand {
                project_id: fx.project_id,
                actor_id: fx.editor,
                attribute_id: attribute.id,
                name: None,
                attribute_type: Some("integer".to_string()),
                required: Some(true),
                config: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.attribute_type, AttributeType::Integer);
        assert!(updated.required);
    }

    #[tokio::test]
    async fn delete_of_missing_attribute_is_not_found() {
        let fx = Fixture::new();
        let err = DeleteAttributeHandler::new(fx.access(), fx.store())
            .handle(DeleteAttributeCommand {
                project_id: fx.project_id,
                actor_id: fx.editor,
                attribute_id: AttributeId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AttributeNotFound);
    }
}
