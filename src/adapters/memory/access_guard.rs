//! In-memory AccessGuard backed by explicit membership grants.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::foundation::{ActorId, DomainError, MembershipId, ProjectId};
use crate::ports::{AccessGuard, EditorAccess, ProjectRole};

#[derive(Debug, Clone, Copy)]
struct Membership {
    id: MembershipId,
    role: ProjectRole,
    active: bool,
}

/// Membership table held in memory.
#[derive(Default)]
pub struct InMemoryAccessGuard {
    owners: RwLock<HashMap<ProjectId, ActorId>>,
    memberships: RwLock<HashMap<(ProjectId, ActorId), Membership>>,
}

impl InMemoryAccessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an active membership (builder form, for setup).
    pub fn with_member(mut self, project_id: ProjectId, actor_id: ActorId, role: ProjectRole) -> Self {
        self.memberships.get_mut().insert(
            (project_id, actor_id),
            Membership {
                id: MembershipId::new(),
                role,
                active: true,
            },
        );
        self
    }

    /// Records the project owner without a membership row.
    pub fn with_owner(mut self, project_id: ProjectId, actor_id: ActorId) -> Self {
        self.owners.get_mut().insert(project_id, actor_id);
        self
    }

    /// Adds or replaces an active membership.
    pub async fn grant(&self, project_id: ProjectId, actor_id: ActorId, role: ProjectRole) {
        self.memberships.write().await.insert(
            (project_id, actor_id),
            Membership {
                id: MembershipId::new(),
                role,
                active: true,
            },
        );
    }

    /// Deactivates a membership, keeping the row.
    pub async fn revoke(&self, project_id: ProjectId, actor_id: ActorId) {
        if let Some(membership) = self
            .memberships
            .write()
            .await
            .get_mut(&(project_id, actor_id))
        {
            membership.active = false;
        }
    }

    async fn active_membership(&self, project_id: &ProjectId, actor_id: &ActorId) -> Option<Membership> {
        self.memberships
            .read()
            .await
            .get(&(*project_id, *actor_id))
            .copied()
            .filter(|m| m.active)
    }
}

#[async_trait]
impl AccessGuard for InMemoryAccessGuard {
    async fn ensure_editor_access(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
    ) -> Result<EditorAccess, DomainError> {
        match self.active_membership(project_id, actor_id).await {
            Some(membership) if membership.role.can_edit() => Ok(EditorAccess {
                actor_id: *actor_id,
                membership_id: membership.id,
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
        if self.active_membership(project_id, actor_id).await.is_some() {
            return Ok(());
        }
        if self.owners.read().await.get(project_id) == Some(actor_id) {
            return Ok(());
        }
        warn!(project_id = %project_id, actor_id = %actor_id, "Viewer access denied");
        Err(DomainError::forbidden("Access to the project is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn editor_and_owner_members_may_edit() {
        let project = ProjectId::new();
        let (editor, owner) = (ActorId::new(), ActorId::new());
        let guard = InMemoryAccessGuard::new()
            .with_member(project, editor, ProjectRole::Editor)
            .with_member(project, owner, ProjectRole::Owner);

        let access = guard.ensure_editor_access(&project, &editor).await.unwrap();
        assert_eq!(access.actor_id, editor);
        assert!(guard.ensure_editor_access(&project, &owner).await.is_ok());
    }

    #[tokio::test]
    async fn viewer_may_read_but_not_edit() {
        let project = ProjectId::new();
        let viewer = ActorId::new();
        let guard = InMemoryAccessGuard::new().with_member(project, viewer, ProjectRole::Viewer);

        assert!(guard.ensure_viewer_access(&project, &viewer).await.is_ok());
        let err = guard.ensure_editor_access(&project, &viewer).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn owner_without_membership_may_view_only() {
        let project = ProjectId::new();
        let owner = ActorId::new();
        let guard = InMemoryAccessGuard::new().with_owner(project, owner);

        assert!(guard.ensure_viewer_access(&project, &owner).await.is_ok());
        assert!(guard.ensure_editor_access(&project, &owner).await.is_err());
    }

    #[tokio::test]
    async fn revoked_membership_grants_nothing() {
        let project = ProjectId::new();
        let editor = ActorId::new();
        let guard = InMemoryAccessGuard::new();
        guard.grant(project, editor, ProjectRole::Editor).await;
        guard.revoke(project, editor).await;

        assert!(guard.ensure_viewer_access(&project, &editor).await.is_err());
        assert!(guard.ensure_editor_access(&project, &editor).await.is_err());
    }

    #[tokio::test]
    async fn membership_does_not_leak_across_projects() {
        let (p1, p2) = (ProjectId::new(), ProjectId::new());
        let editor = ActorId::new();
        let guard = InMemoryAccessGuard::new().with_member(p1, editor, ProjectRole::Editor);
        assert!(guard.ensure_viewer_access(&p2, &editor).await.is_err());
    }
}
