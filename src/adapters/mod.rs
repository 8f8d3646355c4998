//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-process implementations of every port
//! - `postgres` - PostgreSQL-backed store, ledger and access guard
//! - `http` - axum routes over the application handlers

pub mod http;
pub mod memory;
pub mod postgres;
