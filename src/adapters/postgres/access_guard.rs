//! PostgreSQL implementation of AccessGuard.
//!
//! Reads the `projects` and `project_members` tables, which another
//! service owns. Nothing here writes to them.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::domain::foundation::{ActorId, DomainError, MembershipId, ProjectId};
use crate::ports::{AccessGuard, EditorAccess, ProjectRole};

use super::errors::{db_error, decode};

/// PostgreSQL-backed project access checks.
#[derive(Clone)]
pub struct PostgresAccessGuard {
    pool: PgPool,
}

impl PostgresAccessGuard {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn active_membership(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
    ) -> Result<Option<(MembershipId, ProjectRole)>, DomainError> {
        let row: Option<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT id, role
            FROM project_members
            WHERE project_id = $1 AND actor_id = $2 AND active
            "#,
        )
        .bind(project_id.as_uuid())
        .bind(actor_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("load project membership", e))?;

        row.map(|(id, role)| Ok((MembershipId::from_uuid(id), decode("role", &role)?)))
            .transpose()
    }
}

#[async_trait]
impl AccessGuard for PostgresAccessGuard {
    async fn ensure_editor_access(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
    ) -> Result<EditorAccess, DomainError> {
        match self.active_membership(project_id, actor_id).await? {
            Some((membership_id, role)) if role.can_edit() => Ok(EditorAccess {
                actor_id: *actor_id,
                membership_id,
            }),
            _ => {
                warn!(project_id = %project_id, actor_id = %actor_id, "Editor access denied");
                Err(DomainError::forbidden("Editor access to the project is required"))
            }
        }
    }

    async fn ensure_viewer_access(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
    ) -> Result<(), DomainError> {
        let (allowed,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM project_members
                WHERE project_id = $1 AND actor_id = $2 AND active
            ) OR EXISTS (
                SELECT 1 FROM projects WHERE id = $1 AND owner_id = $2
            )
            "#,
        )
        .bind(project_id.as_uuid())
        .bind(actor_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("check project access", e))?;

        if allowed {
            Ok(())
        } else {
            warn!(project_id = %project_id, actor_id = %actor_id, "Viewer access denied");
            Err(DomainError::forbidden("Access to the project is required"))
        }
    }
}
