//! Validation command and query handlers.

mod annotate_finding;
mod list_validations;
mod project_locks;
mod reconciler;
mod run_validations;

pub use annotate_finding::{
    IgnoreFindingCommand, IgnoreFindingHandler, ReopenFindingCommand, ReopenFindingHandler,
};
pub use list_validations::{
    GetFindingHandler, GetFindingQuery, ListValidationsHandler, ListValidationsQuery,
};
pub use project_locks::{ProjectLockGuard, ProjectLocks};
pub use reconciler::FindingReconciler;
pub use run_validations::{
    RunValidationsCommand, RunValidationsHandler, RunValidationsResult, ValidationRunConfig,
};
