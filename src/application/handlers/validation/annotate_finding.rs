//! User decisions on findings: ignore with justification, reopen.
//!
//! Both take the project's ledger lock so a decision never interleaves
//! with a sync of the same project. Syncs from other processes are caught
//! by the ledger, which only writes the decision over the state it was
//! taken on.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{ActorId, DomainError, FindingId, ProjectId, Timestamp};
use crate::domain::validation::PersistedFinding;
use crate::ports::{AccessGuard, FindingLedger};

use super::super::report_rejection;
use super::list_validations::load_finding;
use super::ProjectLocks;

#[derive(Debug, Clone)]
pub struct IgnoreFindingCommand {
    pub project_id: ProjectId,
    pub finding_id: FindingId,
    pub actor_id: ActorId,
    pub justification: String,
}

#[derive(Debug, Clone)]
pub struct ReopenFindingCommand {
    pub project_id: ProjectId,
    pub finding_id: FindingId,
    pub actor_id: ActorId,
}

pub struct IgnoreFindingHandler {
    access: Arc<dyn AccessGuard>,
    ledger: Arc<dyn FindingLedger>,
    locks: Arc<ProjectLocks>,
}

impl IgnoreFindingHandler {
    pub fn new(
        access: Arc<dyn AccessGuard>,
        ledger: Arc<dyn FindingLedger>,
        locks: Arc<ProjectLocks>,
    ) -> Self {
        Self {
            access,
            ledger,
            locks,
        }
    }

    /// # Errors
    ///
    /// - `FindingNotFound` if the finding is not in the project
    /// - `EmptyField` / `ValidationFailed` for a blank or oversized justification
    /// - `InvalidStateTransition` if the finding is resolved
    /// - `ConcurrentModification` if a sync moved the finding meanwhile
    pub async fn handle(&self, cmd: IgnoreFindingCommand) -> Result<PersistedFinding, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;
        let _lock = self.locks.acquire(cmd.project_id).await;

        let mut finding =
            load_finding(self.ledger.as_ref(), &cmd.project_id, &cmd.finding_id).await?;
        let expected = finding.state;
        finding
            .ignore(&cmd.justification, access.actor_id, Timestamp::now())
            .inspect_err(report_rejection("ignore_finding", cmd.project_id))?;
        self.ledger.save_annotation(&finding, expected).await?;

        info!(
            project_id = %cmd.project_id,
            finding_id = %finding.id,
            rule_code = %finding.finding.rule_code,
            "Finding ignored"
        );
        Ok(finding)
    }
}

pub struct ReopenFindingHandler {
    access: Arc<dyn AccessGuard>,
    ledger: Arc<dyn FindingLedger>,
    locks: Arc<ProjectLocks>,
}

impl ReopenFindingHandler {
    pub fn new(
        access: Arc<dyn AccessGuard>,
        ledger: Arc<dyn FindingLedger>,
        locks: Arc<ProjectLocks>,
    ) -> Self {
        Self {
            access,
            ledger,
            locks,
        }
    }

    /// # Errors
    ///
    /// - `FindingNotFound` if the finding is not in the project
    /// - `InvalidStateTransition` unless the finding is ignored
    /// - `ConcurrentModification` if a sync moved the finding meanwhile
    pub async fn handle(&self, cmd: ReopenFindingCommand) -> Result<PersistedFinding, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;
        let _lock = self.locks.acquire(cmd.project_id).await;

        let mut finding =
            load_finding(self.ledger.as_ref(), &cmd.project_id, &cmd.finding_id).await?;
        let expected = finding.state;
        finding
            .reopen(access.actor_id, Timestamp::now())
            .inspect_err(report_rejection("reopen_finding", cmd.project_id))?;
        self.ledger.save_annotation(&finding, expected).await?;

        info!(project_id = %cmd.project_id, finding_id = %finding.id, "Finding reopened");
        Ok(finding)
    }
}
