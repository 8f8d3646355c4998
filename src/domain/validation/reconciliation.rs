//! Reconciliation of freshly computed findings against the ledger.
//!
//! The planner is pure: given the persisted rows of a project and the
//! findings of a new run, it decides which rows to insert and how every
//! existing row changes. Storage adapters apply the plan inside one
//! transaction.
//!
//! # Merge policy
//!
//! - A computed finding whose key has no row is inserted as `Open`.
//! - A computed finding whose key has a row refreshes it in place; an
//!   ignored row stays ignored with its justification, any other row
//!   becomes `Open`.
//! - A row whose key is absent from the run and is not yet resolved is
//!   resolved. Its justification is kept.

use std::collections::HashMap;

use crate::domain::foundation::{ActorId, ProjectId, Timestamp};

use super::engine::deduplicate;
use super::{FindingKey, FindingState, PersistedFinding, ValidationFinding};

/// Counts reported after a sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationSummary {
    pub inserted: usize,
    pub refreshed: usize,
    pub resolved: usize,
    /// Resolved rows that stayed resolved.
    pub untouched: usize,
}

/// Writes needed to bring the ledger in line with a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// New rows, in computed order.
    pub inserts: Vec<PersistedFinding>,
    /// Refreshed rows (computed order) followed by resolved rows (key order).
    pub updates: Vec<PersistedFinding>,
    pub summary: ReconciliationSummary,
}

impl ReconciliationPlan {
    /// Builds the plan for one project.
    pub fn build(
        project_id: ProjectId,
        existing: Vec<PersistedFinding>,
        computed: Vec<ValidationFinding>,
        actor_id: ActorId,
        now: Timestamp,
    ) -> Self {
        let mut lookup: HashMap<FindingKey, PersistedFinding> =
            existing.into_iter().map(|row| (row.key(), row)).collect();
        let mut plan = ReconciliationPlan::default();

        for finding in deduplicate(computed) {
            match lookup.remove(&finding.key()) {
                Some(mut row) => {
                    row.refresh(finding, actor_id, now);
                    plan.updates.push(row);
                    plan.summary.refreshed += 1;
                }
                None => {
                    plan.inserts
                        .push(PersistedFinding::open(project_id, finding, actor_id, now));
                    plan.summary.inserted += 1;
                }
            }
        }

        let mut unseen: Vec<_> = lookup.into_values().collect();
        unseen.sort_by(|a, b| a.key().cmp(&b.key()));
        for mut row in unseen {
            if row.state == FindingState::Resolved {
                plan.summary.untouched += 1;
                continue;
            }
            row.resolve(actor_id, now);
            plan.updates.push(row);
            plan.summary.resolved += 1;
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }

    /// Applies the plan to an in-memory copy of the ledger rows.
    ///
    /// Rows are matched by id; the result contains every row exactly once.
    pub fn apply_to(&self, rows: &mut Vec<PersistedFinding>) {
        let positions: HashMap<_, _> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id, i))
            .collect();
        for update in &self.updates {
            if let Some(&i) = positions.get(&update.id) {
                rows[i] = update.clone();
            }
        }
        rows.extend(self.inserts.iter().cloned());
    }
}
