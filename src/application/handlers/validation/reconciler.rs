//! Drives one ledger sync through a unit of work.

use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::foundation::{ActorId, DomainError, ProjectId, Timestamp};
use crate::domain::validation::{
    ReconciliationPlan, ReconciliationSummary, RuleDefinition, ValidationFinding,
};
use crate::ports::{FindingLedger, LedgerUnitOfWork};

/// Applies a run's findings to the ledger in one transaction.
pub struct FindingReconciler {
    ledger: Arc<dyn FindingLedger>,
}

impl FindingReconciler {
    pub fn new(ledger: Arc<dyn FindingLedger>) -> Self {
        Self { ledger }
    }

    /// Upserts the rule catalogue, merges `computed` into the project's
    /// ledger and commits. On any failure the unit is rolled back and the
    /// ledger is left exactly as it was.
    pub async fn sync(
        &self,
        project_id: &ProjectId,
        rules: &[RuleDefinition],
        computed: Vec<ValidationFinding>,
        actor_id: ActorId,
    ) -> Result<ReconciliationSummary, DomainError> {
        let mut unit = self.ledger.begin(project_id).await?;

        match apply(unit.as_mut(), project_id, rules, computed, actor_id).await {
            Ok(summary) => {
                unit.commit().await.inspect_err(|err| {
                    error!(project_id = %project_id, error = %err, "Ledger sync commit failed");
                })?;
                Ok(summary)
            }
            Err(err) => {
                error!(project_id = %project_id, error = %err, "Ledger sync rolled back");
                if let Err(rollback_err) = unit.rollback().await {
                    error!(
                        project_id = %project_id,
                        error = %rollback_err,
                        "Ledger rollback failed"
                    );
                }
                Err(err)
            }
        }
    }
}

async fn apply(
    unit: &mut dyn LedgerUnitOfWork,
    project_id: &ProjectId,
    rules: &[RuleDefinition],
    computed: Vec<ValidationFinding>,
    actor_id: ActorId,
) -> Result<ReconciliationSummary, DomainError> {
    unit.upsert_rules(rules).await?;
    let existing = unit.load_findings().await?;
    debug!(project_id = %project_id, existing = existing.len(), "Loaded ledger rows");

    let plan = ReconciliationPlan::build(*project_id, existing, computed, actor_id, Timestamp::now());
    for row in &plan.inserts {
        unit.insert_finding(row).await?;
    }
    for row in &plan.updates {
        unit.update_finding(row).await?;
    }
    Ok(plan.summary)
}
