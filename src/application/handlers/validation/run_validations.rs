//! RunValidationsHandler - evaluates the rule set and syncs the ledger.

use std::sync::Arc;
use tracing::{error, info};

use crate::domain::foundation::{ActorId, DomainError, ErrorCode, ProjectId};
use crate::domain::validation::{evaluate, PersistedFinding, ReconciliationSummary};
use crate::ports::{AccessGuard, DomainModelStore, FindingLedger};

use super::{FindingReconciler, ProjectLocks};

/// Tuning for validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRunConfig {
    /// A run producing more findings than this is aborted before any write.
    pub max_findings_per_run: usize,
    /// Serialise runs for the same project.
    pub single_flight: bool,
}

impl Default for ValidationRunConfig {
    fn default() -> Self {
        Self {
            max_findings_per_run: 5000,
            single_flight: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunValidationsCommand {
    pub project_id: ProjectId,
    pub actor_id: ActorId,
}

/// The reloaded ledger after a run, in listing order.
#[derive(Debug, Clone)]
pub struct RunValidationsResult {
    pub findings: Vec<PersistedFinding>,
    pub summary: ReconciliationSummary,
}

pub struct RunValidationsHandler {
    access: Arc<dyn AccessGuard>,
    store: Arc<dyn DomainModelStore>,
    ledger: Arc<dyn FindingLedger>,
    reconciler: FindingReconciler,
    locks: Arc<ProjectLocks>,
    config: ValidationRunConfig,
}

impl RunValidationsHandler {
    pub fn new(
        access: Arc<dyn AccessGuard>,
        store: Arc<dyn DomainModelStore>,
        ledger: Arc<dyn FindingLedger>,
        locks: Arc<ProjectLocks>,
        config: ValidationRunConfig,
    ) -> Self {
        Self {
            access,
            store,
            reconciler: FindingReconciler::new(ledger.clone()),
            ledger,
            locks,
            config,
        }
    }

    /// # Errors
    ///
    /// - `Forbidden` without editor access
    /// - `InternalError` if the run exceeds `max_findings_per_run`
    /// - `DatabaseError` if the sync fails; the ledger is unchanged and the
    ///   whole run may be retried
    pub async fn handle(&self, cmd: RunValidationsCommand) -> Result<RunValidationsResult, DomainError> {
        let access = self
            .access
            .ensure_editor_access(&cmd.project_id, &cmd.actor_id)
            .await?;

        let _flight = if self.config.single_flight {
            Some(self.locks.acquire(cmd.project_id).await)
        } else {
            None
        };

        let snapshot = self.store.get_model(&cmd.project_id).await?;
        let evaluation = evaluate(&snapshot);
        if evaluation.findings.len() > self.config.max_findings_per_run {
            error!(
                project_id = %cmd.project_id,
                findings = evaluation.findings.len(),
                limit = self.config.max_findings_per_run,
                "Validation run exceeded finding limit"
            );
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Validation produced more findings than allowed",
            )
            .with_detail("findings", evaluation.findings.len().to_string())
            .with_detail("limit", self.config.max_findings_per_run.to_string()));
        }

        let summary = self
            .reconciler
            .sync(
                &cmd.project_id,
                evaluation.rules,
                evaluation.findings,
                access.actor_id,
            )
            .await?;
        let findings = self.ledger.list(&cmd.project_id).await?;

        info!(
            project_id = %cmd.project_id,
            actor_id = %access.actor_id,
            inserted = summary.inserted,
            refreshed = summary.refreshed,
            resolved = summary.resolved,
            total = findings.len(),
            "Validation run completed"
        );
        Ok(RunValidationsResult { findings, summary })
    }
}
