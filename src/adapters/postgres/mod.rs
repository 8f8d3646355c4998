//! PostgreSQL adapters.
//!
//! - `PostgresDomainModelStore` - Domain model writes and the audit trail
//! - `PostgresFindingLedger` - Persisted validation findings
//! - `PostgresAccessGuard` - Project membership checks
//!
//! Schema lives in `migrations/` at the crate root.

mod access_guard;
mod domain_model_store;
mod errors;
mod finding_ledger;

pub use access_guard::PostgresAccessGuard;
pub use domain_model_store::PostgresDomainModelStore;
pub use finding_ledger::{PostgresFindingLedger, PostgresLedgerUnitOfWork};
