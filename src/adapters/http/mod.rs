//! HTTP adapters - REST API implementations.
//!
//! Every route lives under `/api/projects/:project_id/domain`. The caller
//! is identified by the `X-Actor-Id` header; domain errors map onto status
//! codes by `ErrorKind` (403/404/400/409/500).

pub mod actor;
pub mod domain_model;
pub mod error;
pub mod validation;

use axum::{routing::get, Router};

pub use actor::RequireActor;
pub use domain_model::{domain_model_routes, DomainModelHandlers};
pub use error::{ApiError, ErrorResponse};
pub use validation::{validation_routes, ValidationHandlers};

/// Full API router.
pub fn api_router(domain_model: DomainModelHandlers, validation: ValidationHandlers) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(domain_model_routes(domain_model))
        .merge(validation_routes(validation))
}
