//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AccessGuard` - Project role checks (consumed, owned elsewhere)
//! - `DomainModelStore` - Atomic, audited writes to the domain model
//! - `FindingLedger` / `LedgerUnitOfWork` - Persisted findings and the sync unit of work
//! - `AuditLog` - Read side of the audit trail

mod access_guard;
mod audit_log;
mod domain_model_store;
mod finding_ledger;

pub use access_guard::{AccessGuard, EditorAccess, ProjectRole};
pub use audit_log::AuditLog;
pub use domain_model_store::DomainModelStore;
pub use finding_ledger::{FindingLedger, LedgerUnitOfWork};
