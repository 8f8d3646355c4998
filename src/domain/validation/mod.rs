//! Validation - rule set, findings and the reconciliation of findings
//! into a persistent, user-annotatable ledger.
//!
//! Everything here is pure. Storage of the ledger sits behind the
//! `FindingLedger` port.

mod classification;
mod element;
mod engine;
mod finding;
mod finding_state;
mod ordering;
mod reconciliation;
mod rule;
mod rules;

pub use classification::{Category, Severity};
pub use element::{ElementPath, ElementType};
pub use engine::{deduplicate, evaluate, Evaluation};
pub use finding::{FindingKey, PersistedFinding, ValidationFinding, MAX_JUSTIFICATION_LENGTH};
pub use finding_state::FindingState;
pub use ordering::{compare_for_listing, sort_for_listing};
pub use reconciliation::{ReconciliationPlan, ReconciliationSummary};
pub use rule::{catalogue, RuleCode, RuleDefinition};
