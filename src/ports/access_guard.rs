//! Access guard port.
//!
//! Answers "may this actor view or edit this project". Project membership
//! is owned elsewhere; this port only consumes it.
//!
//! # Roles
//!
//! - Viewer access: an active membership of any role, or project ownership
//! - Editor access: an active membership with role `owner` or `editor`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ActorId, DomainError, MembershipId, ProjectId, ValidationError};

/// Role of a member within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Owner,
    Editor,
    Viewer,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Editor => "editor",
            ProjectRole::Viewer => "viewer",
        }
    }

    pub fn can_edit(&self) -> bool {
        match self {
            ProjectRole::Owner | ProjectRole::Editor => true,
            ProjectRole::Viewer => false,
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(ProjectRole::Owner),
            "editor" => Ok(ProjectRole::Editor),
            "viewer" => Ok(ProjectRole::Viewer),
            _ => Err(ValidationError::unsupported_value("role", s)),
        }
    }
}

/// Proof of editor access, returned by a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorAccess {
    pub actor_id: ActorId,
    pub membership_id: MembershipId,
}

#[async_trait]
pub trait AccessGuard: Send + Sync {
    /// Requires an active owner/editor membership.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor may not edit the project
    /// - `DatabaseError` on lookup failure
    async fn ensure_editor_access(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
    ) -> Result<EditorAccess, DomainError>;

    /// Requires any active membership or project ownership.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor may not view the project
    /// - `DatabaseError` on lookup failure
    async fn ensure_viewer_access(
        &self,
        project_id: &ProjectId,
        actor_id: &ActorId,
    ) -> Result<(), DomainError>;
}
