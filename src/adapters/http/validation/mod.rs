//! Validation HTTP adapter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ValidationHandlers;
pub use routes::validation_routes;
