//! Audit trail - append-only record of every accepted model write.

mod record;

pub use record::{AuditAction, AuditEntity, AuditRecord};
