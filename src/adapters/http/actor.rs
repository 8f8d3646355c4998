//! Actor extraction.
//!
//! Authentication happens upstream; the gateway forwards the caller's id
//! in the `X-Actor-Id` header.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::ActorId;

use super::error::ErrorResponse;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor that requires a valid actor id header.
#[derive(Debug, Clone, Copy)]
pub struct RequireActor(pub ActorId);

#[derive(Debug)]
pub enum ActorRejection {
    Missing,
    Malformed,
}

impl IntoResponse for ActorRejection {
    fn into_response(self) -> Response {
        let message = match self {
            ActorRejection::Missing => "Missing X-Actor-Id header",
            ActorRejection::Malformed => "X-Actor-Id must be a UUID",
        };
        (StatusCode::UNAUTHORIZED, Json(ErrorResponse::unauthorized(message))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireActor
where
    S: Send + Sync,
{
    type Rejection = ActorRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or(ActorRejection::Missing)?
            .to_str()
            .map_err(|_| ActorRejection::Malformed)?;
        raw.trim()
            .parse::<ActorId>()
            .map(RequireActor)
            .map_err(|_| ActorRejection::Malformed)
    }
}
