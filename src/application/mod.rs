//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Write handlers require editor access, read handlers viewer access.

pub mod handlers;

pub use handlers::domain_model::*;
pub use handlers::validation::*;
