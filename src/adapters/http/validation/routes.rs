//! HTTP routes for validation endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_finding, ignore_finding, list_validations, reopen_finding, run_validations,
    ValidationHandlers,
};

const BASE: &str = "/api/projects/:project_id/domain/validations";

pub fn validation_routes(handlers: ValidationHandlers) -> Router {
    Router::new()
        .route(BASE, get(list_validations))
        .route(&format!("{BASE}/run"), post(run_validations))
        .route(&format!("{BASE}/:finding_id"), get(get_finding))
        .route(&format!("{BASE}/:finding_id/ignore"), post(ignore_finding))
        .route(&format!("{BASE}/:finding_id/reopen"), post(reopen_finding))
        .with_state(handlers)
}
