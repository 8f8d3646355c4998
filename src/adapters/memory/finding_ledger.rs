//! In-memory FindingLedger.
//!
//! A unit of work holds the ledger's write lock for its whole lifetime,
//! which serialises syncs the way a row lock would. Writes go to staged
//! copies and are published on commit.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, FindingId, ProjectId};
use crate::domain::validation::{
    sort_for_listing, FindingState, PersistedFinding, RuleCode, RuleDefinition,
};
use crate::ports::{FindingLedger, LedgerUnitOfWork};

fn annotation_conflict(finding: &PersistedFinding, stored: FindingState) -> DomainError {
    DomainError::new(
        ErrorCode::ConcurrentModification,
        "Finding changed while it was being annotated",
    )
    .with_detail("finding_id", finding.id.to_string())
    .with_detail("state", stored.as_str())
}

#[derive(Default)]
struct LedgerState {
    rules: HashMap<RuleCode, RuleDefinition>,
    findings: HashMap<ProjectId, Vec<PersistedFinding>>,
}

/// In-memory implementation of the finding ledger.
#[derive(Clone, Default)]
pub struct InMemoryFindingLedger {
    state: Arc<RwLock<LedgerState>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryFindingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Makes the next commit fail with a database error.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Rule codes stored in the ledger's rule table.
    pub async fn stored_rule_codes(&self) -> Vec<RuleCode> {
        let mut codes: Vec<_> = self.state.read().await.rules.keys().copied().collect();
        codes.sort();
        codes
    }

    /// Raw rows of a project, in insertion order.
    pub async fn rows(&self, project_id: &ProjectId) -> Vec<PersistedFinding> {
        self.state
            .read()
            .await
            .findings
            .get(project_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl FindingLedger for InMemoryFindingLedger {
    async fn list(&self, project_id: &ProjectId) -> Result<Vec<PersistedFinding>, DomainError> {
        let mut rows = self.rows(project_id).await;
        sort_for_listing(&mut rows);
        Ok(rows)
    }

    async fn find_by_id(
        &self,
        project_id: &ProjectId,
        finding_id: &FindingId,
    ) -> Result<Option<PersistedFinding>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .findings
            .get(project_id)
            .and_then(|rows| rows.iter().find(|row| row.id == *finding_id))
            .cloned())
    }

    async fn save_annotation(
        &self,
        finding: &PersistedFinding,
        expected: FindingState,
    ) -> Result<(), DomainError> {
        // Waits for any open unit of work, which holds the same lock.
        let mut state = self.state.write().await;
        let row = state
            .findings
            .get_mut(&finding.project_id)
            .and_then(|rows| rows.iter_mut().find(|row| row.id == finding.id))
            .ok_or_else(|| DomainError::new(ErrorCode::FindingNotFound, "Finding not found"))?;
        if row.state != expected {
            return Err(annotation_conflict(finding, row.state));
        }
        row.state = finding.state;
        row.justification = finding.justification.clone();
        row.last_actor_id = finding.last_actor_id;
        row.updated_at = finding.updated_at;
        Ok(())
    }

    async fn begin(&self, project_id: &ProjectId) -> Result<Box<dyn LedgerUnitOfWork>, DomainError> {
        let guard = self.state.clone().write_owned().await;
        let rules = guard.rules.clone();
        let findings = guard.findings.get(project_id).cloned().unwrap_or_default();
        Ok(Box::new(InMemoryLedgerUnitOfWork {
            guard,
            project_id: *project_id,
            rules,
            findings,
            fail_commit: self.fail_next_commit.swap(false, Ordering::SeqCst),
        }))
    }
}

struct InMemoryLedgerUnitOfWork {
    guard: OwnedRwLockWriteGuard<LedgerState>,
    project_id: ProjectId,
    rules: HashMap<RuleCode, RuleDefinition>,
    findings: Vec<PersistedFinding>,
    fail_commit: bool,
}

#[async_trait]
impl LedgerUnitOfWork for InMemoryLedgerUnitOfWork {
    async fn upsert_rules(&mut self, rules: &[RuleDefinition]) -> Result<(), DomainError> {
        for rule in rules {
            self.rules.insert(rule.code, rule.clone());
        }
        Ok(())
    }

    async fn load_findings(&mut self) -> Result<Vec<PersistedFinding>, DomainError> {
        Ok(self.findings.clone())
    }

    async fn insert_finding(&mut self, finding: &PersistedFinding) -> Result<(), DomainError> {
        let key = finding.key();
        if self.findings.iter().any(|row| row.key() == key) {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                format!("Finding {} already exists", key),
            ));
        }
        self.findings.push(finding.clone());
        Ok(())
    }

    async fn update_finding(&mut self, finding: &PersistedFinding) -> Result<(), DomainError> {
        let row = self
            .findings
            .iter_mut()
            .find(|row| row.id == finding.id)
            .ok_or_else(|| DomainError::new(ErrorCode::FindingNotFound, "Finding not found"))?;
        *row = finding.clone();
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        if self.fail_commit {
            return Err(DomainError::database("commit ledger sync", "simulated failure"));
        }
        let InMemoryLedgerUnitOfWork {
            mut guard,
            project_id,
            rules,
            findings,
            ..
        } = *self;
        guard.rules = rules;
        guard.findings.insert(project_id, findings);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}
