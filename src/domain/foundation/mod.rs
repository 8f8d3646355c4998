//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and the error
//! types that form the vocabulary of every other domain module.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ErrorKind, ValidationError};
pub use ids::{
    ActorId, AttributeId, AuditRecordId, ClassId, FindingId, IdentityId, MembershipId,
    ProjectId, RelationId,
};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
