//! Read-only finding queries. Viewer access suffices.

use std::sync::Arc;

use crate::domain::foundation::{ActorId, DomainError, ErrorCode, FindingId, ProjectId};
use crate::domain::validation::PersistedFinding;
use crate::ports::{AccessGuard, FindingLedger};

#[derive(Debug, Clone)]
pub struct ListValidationsQuery {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
}

pub struct ListValidationsHandler {
    access: Arc<dyn AccessGuard>,
    ledger: Arc<dyn FindingLedger>,
}

impl ListValidationsHandler {
    pub fn new(access: Arc<dyn AccessGuard>, ledger: Arc<dyn FindingLedger>) -> Self {
        Self { access, ledger }
    }

    /// Every persisted finding of the project, in listing order.
    pub async fn handle(&self, query: ListValidationsQuery) -> Result<Vec<PersistedFinding>, DomainError> {
        self.access
            .ensure_viewer_access(&query.project_id, &query.actor_id)
            .await?;
        self.ledger.list(&query.project_id).await
    }
}

#[derive(Debug, Clone)]
pub struct GetFindingQuery {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
    pub finding_id: FindingId,
}

pub struct GetFindingHandler {
    access: Arc<dyn AccessGuard>,
    ledger: Arc<dyn FindingLedger>,
}

impl GetFindingHandler {
    pub fn new(access: Arc<dyn AccessGuard>, ledger: Arc<dyn FindingLedger>) -> Self {
        Self { access, ledger }
    }

    pub async fn handle(&self, query: GetFindingQuery) -> Result<PersistedFinding, DomainError> {
        self.access
            .ensure_viewer_access(&query.project_id, &query.actor_id)
            .await?;
        load_finding(self.ledger.as_ref(), &query.project_id, &query.finding_id).await
    }
}

pub(super) async fn load_finding(
    ledger: &dyn FindingLedger,
    project_id: &ProjectId,
    finding_id: &FindingId,
) -> Result<PersistedFinding, DomainError> {
    ledger
        .find_by_id(project_id, finding_id)
        .await?
        .ok_or_else(|| {
            DomainError::new(ErrorCode::FindingNotFound, "Finding not found")
                .with_detail("finding_id", finding_id.to_string())
        })
}
