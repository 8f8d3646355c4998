//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `model` - The per-project domain model aggregate and its invariants
//! - `validation` - Rule set, findings and ledger reconciliation
//! - `audit` - Append-only audit records of model writes

pub mod audit;
pub mod foundation;
pub mod model;
pub mod validation;
