//! HTTP routes for domain model endpoints.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::handlers::{
    create_attribute, create_class, create_relation, define_identity, delete_attribute,
    delete_class, delete_relation, find_class_by_name, get_class, get_model, list_audit,
    remove_identity, update_attribute, update_class, update_relation, DomainModelHandlers,
};

const BASE: &str = "/api/projects/:project_id/domain";

/// Creates the domain model router with all endpoints.
pub fn domain_model_routes(handlers: DomainModelHandlers) -> Router {
    Router::new()
        .route(&format!("{BASE}/model"), get(get_model))
        .route(&format!("{BASE}/audit"), get(list_audit))
        .route(&format!("{BASE}/classes"), post(create_class))
        .route(&format!("{BASE}/classes/lookup"), get(find_class_by_name))
        .route(
            &format!("{BASE}/classes/:class_id"),
            get(get_class).patch(update_class).delete(delete_class),
        )
        .route(&format!("{BASE}/attributes"), post(create_attribute))
        .route(
            &format!("{BASE}/attributes/:attribute_id"),
            patch(update_attribute).delete(delete_attribute),
        )
        .route(&format!("{BASE}/relations"), post(create_relation))
        .route(
            &format!("{BASE}/relations/:relation_id"),
            patch(update_relation).delete(delete_relation),
        )
        .route(&format!("{BASE}/identities"), put(define_identity))
        .route(
            &format!("{BASE}/identities/:identity_id"),
            axum::routing::delete(remove_identity),
        )
        .with_state(handlers)
}
