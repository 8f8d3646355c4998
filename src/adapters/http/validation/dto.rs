//! HTTP DTOs for validation endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::validation::{PersistedFinding, ReconciliationSummary};

#[derive(Debug, Clone, Deserialize)]
pub struct IgnoreFindingRequest {
    pub justification: String,
}

/// Counts of what a run changed in the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummaryResponse {
    pub inserted: usize,
    pub refreshed: usize,
    pub resolved: usize,
    pub untouched: usize,
}

impl From<ReconciliationSummary> for SyncSummaryResponse {
    fn from(summary: ReconciliationSummary) -> Self {
        Self {
            inserted: summary.inserted,
            refreshed: summary.refreshed,
            resolved: summary.resolved,
            untouched: summary.untouched,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunValidationsResponse {
    pub findings: Vec<PersistedFinding>,
    pub summary: SyncSummaryResponse,
}
