//! Finding ledger port.
//!
//! Persistent, per-project list of findings with the user's decisions.
//! A sync runs through a [`LedgerUnitOfWork`]: open, upsert the rule
//! catalogue, apply the reconciliation plan, commit. Nothing becomes
//! visible before commit, and dropping or rolling back the unit leaves the
//! ledger as it was.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FindingId, ProjectId};
use crate::domain::validation::{FindingState, PersistedFinding, RuleDefinition};

#[async_trait]
pub trait FindingLedger: Send + Sync {
    /// All findings of a project, in listing order.
    async fn list(&self, project_id: &ProjectId) -> Result<Vec<PersistedFinding>, DomainError>;

    /// Returns `None` when the finding does not exist in the project.
    async fn find_by_id(
        &self,
        project_id: &ProjectId,
        finding_id: &FindingId,
    ) -> Result<Option<PersistedFinding>, DomainError>;

    /// Stores a user decision (ignore / reopen) on one finding.
    ///
    /// Only the decision fields (state, justification, last actor, updated
    /// time) are written, and only while the stored row is still in
    /// `expected`, the state the decision was taken on. Implementations
    /// serialise this write with ledger syncs of the same project.
    ///
    /// # Errors
    ///
    /// - `FindingNotFound` if the row no longer exists
    /// - `ConcurrentModification` if the stored state is no longer `expected`
    async fn save_annotation(
        &self,
        finding: &PersistedFinding,
        expected: FindingState,
    ) -> Result<(), DomainError>;

    /// Opens a sync unit of work for one project.
    ///
    /// Implementations serialise units for the same project.
    async fn begin(&self, project_id: &ProjectId) -> Result<Box<dyn LedgerUnitOfWork>, DomainError>;
}

/// One atomic ledger sync.
#[async_trait]
pub trait LedgerUnitOfWork: Send {
    /// Inserts or refreshes rule definitions by code.
    async fn upsert_rules(&mut self, rules: &[RuleDefinition]) -> Result<(), DomainError>;

    /// Every persisted finding of the project, as seen by this unit.
    async fn load_findings(&mut self) -> Result<Vec<PersistedFinding>, DomainError>;

    async fn insert_finding(&mut self, finding: &PersistedFinding) -> Result<(), DomainError>;

    async fn update_finding(&mut self, finding: &PersistedFinding) -> Result<(), DomainError>;

    /// Makes every staged write visible at once.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    /// Discards every staged write.
    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}
