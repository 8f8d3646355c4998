//! Read-side handlers: model snapshot, class lookup and audit trail.
//!
//! All of them require viewer access only.

use std::sync::Arc;

use crate::domain::audit::AuditRecord;
use crate::domain::foundation::{ActorId, ClassId, DomainError, ErrorCode, ProjectId};
use crate::domain::model::{DomainClass, ModelSnapshot};
use crate::ports::{AccessGuard, AuditLog, DomainModelStore};

/// Upper bound on audit records returned by one query.
pub const MAX_AUDIT_LIMIT: u32 = 500;

#[derive(Debug, Clone)]
pub struct GetDomainModelQuery {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
}

pub struct GetDomainModelHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl GetDomainModelHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    pub async fn handle(&self, query: GetDomainModelQuery) -> Result<ModelSnapshot, DomainError> {
        self.access
            .ensure_viewer_access(&query.project_id, &query.actor_id)
            .await?;
        self.store.get_model(&query.project_id).await
    }
}

/// How to look a class up.
#[derive(Debug, Clone)]
pub enum ClassLookup {
    ById(ClassId),
    /// Compared after trimming, case-sensitively.
    ByName(String),
}

#[derive(Debug, Clone)]
pub struct FindClassQuery {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub lookup: ClassLookup,
}

pub struct FindClassHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
}

impl FindClassHandler {
    pub fn new(access: Arc<dyn AccessGuard>, store: Arc<dyn DomainModelStore>) -> Self {
        Self { access, store }
    }

    /// # Errors
    ///
    /// - `ClassNotFound` when no class matches
    pub async fn handle(&self, query: FindClassQuery) -> Result<DomainClass, DomainError> {
        self.access
            .ensure_viewer_access(&query.project_id, &query.actor_id)
            .await?;

        let found = match &query.lookup {
            ClassLookup::ById(class_id) => {
                self.store.find_class_by_id(&query.project_id, class_id).await?
            }
            ClassLookup::ByName(name) => {
                self.store.find_class_by_name(&query.project_id, name).await?
            }
        };
        found.ok_or_else(|| {
            let err = DomainError::new(ErrorCode::ClassNotFound, "Class not found");
            match query.lookup {
                ClassLookup::ById(id) => err.with_detail("class_id", id.to_string()),
                ClassLookup::ByName(name) => err.with_detail("name", name),
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct ListAuditQuery {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    /// Clamped to `1..=MAX_AUDIT_LIMIT`.
    pub limit: u32,
}

pub struct ListAuditHandler {
    access: Arc<dyn AccessGuard>,
    audit: Arc<dyn AuditLog>,
}

impl ListAuditHandler {
    pub fn new(access: Arc<dyn AccessGuard>, audit: Arc<dyn AuditLog>) -> Self {
        Self { access, audit }
    }

    pub async fn handle(&self, query: ListAuditQuery) -> Result<Vec<AuditRecord>, DomainError> {
        self.access
            .ensure_viewer_access(&query.project_id, &query.actor_id)
            .await?;
        let limit = query.limit.clamp(1, MAX_AUDIT_LIMIT);
        self.audit.list_recent(&query.project_id, limit).await
    }
}
