//! HTTP handlers for domain model endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::adapters::http::actor::RequireActor;
use crate::adapters::http::error::{invalid_id, ApiError};
use crate::application::handlers::domain_model::{
    ClassLookup, CreateAttributeCommand, CreateAttributeHandler, CreateClassCommand,
    CreateClassHandler, CreateRelationCommand, CreateRelationHandler, DefineIdentityCommand,
    DefineIdentityHandler, DeleteAttributeCommand, DeleteAttributeHandler, DeleteClassCommand,
    DeleteClassHandler, DeleteRelationCommand, DeleteRelationHandler, FindClassHandler,
    FindClassQuery, GetDomainModelHandler, GetDomainModelQuery, ListAuditHandler, ListAuditQuery,
    RemoveIdentityCommand, RemoveIdentityHandler, UpdateAttributeCommand, UpdateAttributeHandler,
    UpdateClassCommand, UpdateClassHandler, UpdateRelationCommand, UpdateRelationHandler,
};
use crate::domain::foundation::ProjectId;
use crate::ports::{AccessGuard, AuditLog, DomainModelStore};

use super::dto::{
    AuditParams, ClassLookupParams, CreateAttributeRequest, CreateClassRequest,
    CreateRelationRequest, DefineIdentityRequest, UpdateAttributeRequest, UpdateClassRequest,
    UpdateRelationRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DomainModelHandlers {
    get_model: Arc<GetDomainModelHandler>,
    find_class: Arc<FindClassHandler>,
    list_audit: Arc<ListAuditHandler>,
    create_class: Arc<CreateClassHandler>,
    update_class: Arc<UpdateClassHandler>,
    delete_class: Arc<DeleteClassHandler>,
    create_attribute: Arc<CreateAttributeHandler>,
    update_attribute: Arc<UpdateAttributeHandler>,
    delete_attribute: Arc<DeleteAttributeHandler>,
    create_relation: Arc<CreateRelationHandler>,
    update_relation: Arc<UpdateRelationHandler>,
    delete_relation: Arc<DeleteRelationHandler>,
    define_identity: Arc<DefineIdentityHandler>,
    remove_identity: Arc<RemoveIdentityHandler>,
}

impl DomainModelHandlers {
    pub fn new(
        access: Arc<dyn AccessGuard>,
        store: Arc<dyn DomainModelStore>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        let a = || access.clone();
        let s = || store.clone();
        Self {
            get_model: Arc::new(GetDomainModelHandler::new(a(), s())),
            find_class: Arc::new(FindClassHandler::new(a(), s())),
            list_audit: Arc::new(ListAuditHandler::new(a(), audit)),
            create_class: Arc::new(CreateClassHandler::new(a(), s())),
            update_class: Arc::new(UpdateClassHandler::new(a(), s())),
            delete_class: Arc::new(DeleteClassHandler::new(a(), s())),
            create_attribute: Arc::new(CreateAttributeHandler::new(a(), s())),
            update_attribute: Arc::new(UpdateAttributeHandler::new(a(), s())),
            delete_attribute: Arc::new(DeleteAttributeHandler::new(a(), s())),
            create_relation: Arc::new(CreateRelationHandler::new(a(), s())),
            update_relation: Arc::new(UpdateRelationHandler::new(a(), s())),
            delete_relation: Arc::new(DeleteRelationHandler::new(a(), s())),
            define_identity: Arc::new(DefineIdentityHandler::new(a(), s())),
            remove_identity: Arc::new(RemoveIdentityHandler::new(a(), s())),
        }
    }
}

pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.trim().parse().map_err(|_| invalid_id(what))
}

fn ids<T: FromStr>(raw: &(String, String), what: &str) -> Result<(ProjectId, T), ApiError> {
    Ok((parse_id(&raw.0, "project_id")?, parse_id(&raw.1, what)?))
}

// ════════════════════════════════════════════════════════════════════════════
// Reads
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/projects/:project_id/domain/model
pub async fn get_model(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = handlers
        .get_model
        .handle(GetDomainModelQuery {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
        })
        .await?;
    Ok(Json(snapshot))
}

/// GET /api/projects/:project_id/domain/classes/:class_id
pub async fn get_class(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let (project_id, class_id) = ids(&raw, "class_id")?;
    let class = handlers
        .find_class
        .handle(FindClassQuery {
            project_id,
            actor_id,
            lookup: ClassLookup::ById(class_id),
        })
        .await?;
    Ok(Json(class))
}

/// GET /api/projects/:project_id/domain/classes/lookup?name=
pub async fn find_class_by_name(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
    Query(params): Query<ClassLookupParams>,
) -> Result<impl IntoResponse, ApiError> {
    let class = handlers
        .find_class
        .handle(FindClassQuery {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
            lookup: ClassLookup::ByName(params.name),
        })
        .await?;
    Ok(Json(class))
}

/// GET /api/projects/:project_id/domain/audit?limit=
pub async fn list_audit(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
    Query(params): Query<AuditParams>,
) -> Result<impl IntoResponse, ApiError> {
    let records = handlers
        .list_audit
        .handle(ListAuditQuery {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
            limit: params.limit,
        })
        .await?;
    Ok(Json(records))
}

// ════════════════════════════════════════════════════════════════════════════
// Classes
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/projects/:project_id/domain/classes
pub async fn create_class(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
    Json(req): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let class = handlers
        .create_class
        .handle(CreateClassCommand {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// PATCH /api/projects/:project_id/domain/classes/:class_id
pub async fn update_class(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (project_id, class_id) = ids(&raw, "class_id")?;
    let class = handlers
        .update_class
        .handle(UpdateClassCommand {
            project_id,
            actor_id,
            class_id,
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok(Json(class))
}

/// DELETE /api/projects/:project_id/domain/classes/:class_id
pub async fn delete_class(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (project_id, class_id) = ids(&raw, "class_id")?;
    handlers
        .delete_class
        .handle(DeleteClassCommand {
            project_id,
            actor_id,
            class_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════
// Attributes
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/projects/:project_id/domain/attributes
pub async fn create_attribute(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
    Json(req): Json<CreateAttributeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let attribute = handlers
        .create_attribute
        .handle(CreateAttributeCommand {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
            class_id: req.class_id,
            name: req.name,
            attribute_type: req.attribute_type,
            required: req.required,
            config: req.config,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(attribute)))
}

/// PATCH /api/projects/:project_id/domain/attributes/:attribute_id
pub async fn update_attribute(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
    Json(req): Json<UpdateAttributeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (project_id, attribute_id) = ids(&raw, "attribute_id")?;
    let attribute = handlers
        .update_attribute
        .handle(UpdateAttributeCommand {
            project_id,
            actor_id,
            attribute_id,
            name: req.name,
            attribute_type: req.attribute_type,
            required: req.required,
            config: req.config,
        })
        .await?;
    Ok(Json(attribute))
}

/// DELETE /api/projects/:project_id/domain/attributes/:attribute_id
pub async fn delete_attribute(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (project_id, attribute_id) = ids(&raw, "attribute_id")?;
    handlers
        .delete_attribute
        .handle(DeleteAttributeCommand {
            project_id,
            actor_id,
            attribute_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════
// Relations
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/projects/:project_id/domain/relations
pub async fn create_relation(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
    Json(req): Json<CreateRelationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let relation = handlers
        .create_relation
        .handle(CreateRelationCommand {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
            source_class_id: req.source_class_id,
            target_class_id: req.target_class_id,
            name: req.name,
            source_role: req.source_role,
            target_role: req.target_role,
            source_multiplicity: req.source_multiplicity,
            target_multiplicity: req.target_multiplicity,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(relation)))
}

/// PATCH /api/projects/:project_id/domain/relations/:relation_id
pub async fn update_relation(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
    Json(req): Json<UpdateRelationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (project_id, relation_id) = ids(&raw, "relation_id")?;
    let relation = handlers
        .update_relation
        .handle(UpdateRelationCommand {
            project_id,
            actor_id,
            relation_id,
            name: req.name,
            source_role: req.source_role,
            target_role: req.target_role,
            source_multiplicity: req.source_multiplicity,
            target_multiplicity: req.target_multiplicity,
        })
        .await?;
    Ok(Json(relation))
}

/// DELETE /api/projects/:project_id/domain/relations/:relation_id
pub async fn delete_relation(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (project_id, relation_id) = ids(&raw, "relation_id")?;
    handlers
        .delete_relation
        .handle(DeleteRelationCommand {
            project_id,
            actor_id,
            relation_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════
// Identities
// ════════════════════════════════════════════════════════════════════════════

/// PUT /api/projects/:project_id/domain/identities
pub async fn define_identity(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
    Json(req): Json<DefineIdentityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = handlers
        .define_identity
        .handle(DefineIdentityCommand {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
            class_id: req.class_id,
            identity_id: req.identity_id,
            name: req.name,
            description: req.description,
            attribute_ids: req.attribute_ids,
        })
        .await?;
    Ok(Json(identity))
}

/// DELETE /api/projects/:project_id/domain/identities/:identity_id
pub async fn remove_identity(
    State(handlers): State<DomainModelHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(raw): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (project_id, identity_id) = ids(&raw, "identity_id")?;
    handlers
        .remove_identity
        .handle(RemoveIdentityCommand {
            project_id,
            actor_id,
            identity_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
