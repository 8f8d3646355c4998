//! Audit log port (read side).
//!
//! Records are appended by the `DomainModelStore` inside the same
//! transaction as the write they describe; this port only reads them.

use async_trait::async_trait;

use crate::domain::audit::AuditRecord;
use crate::domain::foundation::{DomainError, ProjectId};

#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Most recent records first, at most `limit`.
    async fn list_recent(
        &self,
        project_id: &ProjectId,
        limit: u32,
    ) -> Result<Vec<AuditRecord>, DomainError>;
}
