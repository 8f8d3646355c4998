//! Identity command handlers.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{ActorId, AttributeId, ClassId, DomainError, IdentityId, ProjectId};
use crate::domain::model::{DomainIdentity, IdentityDefinition};
use crate::ports::{AccessGuard, DomainModelStore};

use super::super::report_rejection;

/// Creates an identity, or replaces `identity_id` when given.
///
/// Replacing renames the identity and swaps its ordered attribute list.
#[derive(Debug, Clone)]
pub struct DefineIdentityCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub class_id: ClassId,
    pub identity_id: Option<IdentityId>,
    pub name: String,
    pub description: Option<String>,
    pub attribute_ids: Vec<AttributeId>,
}

#[derive(Debug, Clone)]
pub struct RemoveIdentityCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub identity_id: IdentityId,
}

pub struct DefineIdentityHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl DefineIdentityHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: DefineIdentityCommand) -> Result<DomainIdentity, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;
        let replacing = cmd.identity_id.is_some();

        let identity = self
            .store
            .define_identity(
                &cmd.project_id,
                &access.actor_id,
                IdentityDefinition {
                    class_id: cmd.class_id,
                    identity_id: cmd.identity_id,
                    name: cmd.name,
                    description: cmd.description,
                    attribute_ids: cmd.attribute_ids,
                },
            )
            .await
            .inspect_err(report_rejection("define_identity", cmd.project_id))?;

        info!(
            project_id = %cmd.project_id,
            identity_id = %identity.id,
            attributes = identity.attribute_ids.len(),
            replaced = replacing,
            "Identity defined"
        );
        Ok(identity)
    }
}

pub struct RemoveIdentityHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl RemoveIdentityHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, cmd: RemoveIdentityCommand) -> Result<(), DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;

        self.store
            .remove_identity(&cmd.project_id, &access.actor_id, &cmd.identity_id)
            .await
            .inspect_err(report_rejection("remove_identity", cmd.project_id))?;

        info!(project_id = %cmd.project_id, identity_id = %cmd.identity_id, "Identity removed");
        Ok(())
    }
}
