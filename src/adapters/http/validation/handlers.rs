//! HTTP handlers for validation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::adapters::http::actor::RequireActor;
use crate::adapters::http::domain_model::handlers::parse_id;
use crate::adapters::http::error::ApiError;
use crate::application::handlers::validation::{
    GetFindingHandler, GetFindingQuery, IgnoreFindingCommand, IgnoreFindingHandler,
    ListValidationsHandler, ListValidationsQuery, ProjectLocks, ReopenFindingCommand,
    ReopenFindingHandler, RunValidationsCommand, RunValidationsHandler, ValidationRunConfig,
};
use crate::ports::{AccessGuard, DomainModelStore, FindingLedger};

use super::dto::{IgnoreFindingRequest, RunValidationsResponse};

#[derive(Clone)]
pub struct ValidationHandlers {
    run: Arc<RunValidationsHandler>,
    list: Arc<ListValidationsHandler>,
    get: Arc<GetFindingHandler>,
    ignore: Arc<IgnoreFindingHandler>,
    reopen: Arc<ReopenFindingHandler>,
}

impl ValidationHandlers {
    /// Builds every validation handler over one shared set of project locks.
    pub fn new(
        access: Arc<dyn AccessGuard>,
        store: Arc<dyn DomainModelStore>,
        ledger: Arc<dyn FindingLedger>,
        config: ValidationRunConfig,
    ) -> Self {
        let locks = Arc::new(ProjectLocks::new());
        Self {
            run: Arc::new(RunValidationsHandler::new(
                access.clone(),
                store,
                ledger.clone(),
                locks.clone(),
                config,
            )),
            list: Arc::new(ListValidationsHandler::new(access.clone(), ledger.clone())),
            get: Arc::new(GetFindingHandler::new(access.clone(), ledger.clone())),
            ignore: Arc::new(IgnoreFindingHandler::new(
                access.clone(),
                ledger.clone(),
                locks.clone(),
            )),
            reopen: Arc::new(ReopenFindingHandler::new(access, ledger, locks)),
        }
    }
}

/// POST /api/projects/:project_id/domain/validations/run
pub async fn run_validations(
    State(handlers): State<ValidationHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = handlers
        .run
        .handle(RunValidationsCommand {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
        })
        .await?;
    Ok(Json(RunValidationsResponse {
        findings: result.findings,
        summary: result.summary.into(),
    }))
}

/// GET /api/projects/:project_id/domain/validations
pub async fn list_validations(
    State(handlers): State<ValidationHandlers>,
    RequireActor(actor_id): RequireActor,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let findings = handlers
        .list
        .handle(ListValidationsQuery {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
        })
        .await?;
    Ok(Json(findings))
}

/// GET /api/projects/:project_id/domain/validations/:finding_id
pub async fn get_finding(
    State(handlers): State<ValidationHandlers>,
    RequireActor(actor_id): RequireActor,
    Path((project_id, finding_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let finding = handlers
        .get
        .handle(GetFindingQuery {
            project_id: parse_id(&project_id, "project_id")?,
            actor_id,
            finding_id: parse_id(&finding_id, "finding_id")?,
        })
        .await?;
    Ok(Json(finding))
}

/// POST /api/projects/:project_id/domain/validations/:finding_id/ignore
pub async fn ignore_finding(
    State(handlers): State<ValidationHandlers>,
    RequireActor(actor_id): RequireActor,
    Path((project_id, finding_id)): Path<(String, String)>,
    Json(req): Json<IgnoreFindingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let finding = handlers
        .ignore
        .handle(IgnoreFindingCommand {
            project_id: parse_id(&project_id, "project_id")?,
            finding_id: parse_id(&finding_id, "finding_id")?,
            actor_id,
            justification: req.justification,
        })
        .await?;
    Ok(Json(finding))
}

/// POST /api/projects/:project_id/domain/validations/:finding_id/reopen
pub async fn reopen_finding(
    State(handlers): State<ValidationHandlers>,
    RequireActor(actor_id): RequireActor,
    Path((project_id, finding_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let finding = handlers
        .reopen
        .handle(ReopenFindingCommand {
            project_id: parse_id(&project_id, "project_id")?,
            finding_id: parse_id(&finding_id, "finding_id")?,
            actor_id,
        })
        .await?;
    Ok(Json(finding))
}
