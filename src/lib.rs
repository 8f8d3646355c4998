//! Domain Workbench - collaborative domain modelling with validation.
//!
//! Stores each project's domain model (classes, attributes, identities and
//! relations) with an audit trail, evaluates a fixed set of modelling rules
//! against it and keeps the resulting findings in a ledger where users can
//! ignore or reopen them across runs.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
