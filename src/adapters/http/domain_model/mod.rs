//! Domain model HTTP adapter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::DomainModelHandlers;
pub use routes::domain_model_routes;
