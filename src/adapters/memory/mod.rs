//! In-memory adapters.
//!
//! Used by tests and by the server when no database is configured.

mod access_guard;
mod domain_model_store;
mod finding_ledger;

pub use access_guard::InMemoryAccessGuard;
pub use domain_model_store::InMemoryDomainModelStore;
pub use finding_ledger::InMemoryFindingLedger;
