use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use firmq_auth_types::identity::BearerIdentity;
use firmq_domain::id::EntityId;

use crate::domain::types::EntityBody;
use crate::error::FrontendError;
use crate::handlers::{body, caller, ok, parse_id};
use crate::state::AppState;
use crate::usecase::entity::{
    CreateEntityUseCase, GetEntityHistoryUseCase, GetLatestEntityUseCase, ListEntitiesUseCase,
    UpdateEntityUseCase,
};

// ── POST /v1/entity ──────────────────────────────────────────────────────────

pub async fn create_entity(
    identity: BearerIdentity,
    State(state): State<AppState>,
    payload: Result<Json<EntityBody>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let body = body(payload)?;
    let usecase = CreateEntityUseCase {
        repo: state.entity_repo(),
    };
    Ok(ok(usecase.execute(&caller, body).await?))
}

// ── GET /v1/entity ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListEntitiesQuery {
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

pub async fn list_entities(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListEntitiesQuery>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let usecase = ListEntitiesUseCase {
        repo: state.entity_repo(),
    };
    Ok(ok(usecase
        .execute(&caller, query.entity_type.as_deref())
        .await?))
}

// ── GET /v1/entity/{id} ──────────────────────────────────────────────────────

pub async fn get_entity(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let id: EntityId = parse_id(&id)?;
    let usecase = GetLatestEntityUseCase {
        repo: state.entity_repo(),
    };
    Ok(ok(usecase.execute(&caller, id).await?))
}

// ── POST /v1/entity/{id} ─────────────────────────────────────────────────────

pub async fn update_entity(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EntityBody>, JsonRejection>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let id: EntityId = parse_id(&id)?;
    let body = body(payload)?;
    let usecase = UpdateEntityUseCase {
        repo: state.entity_repo(),
    };
    Ok(ok(usecase.execute(&caller, id, body).await?))
}

// ── GET /v1/entity/{id}/revisions ────────────────────────────────────────────

pub async fn get_entity_revisions(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, FrontendError> {
    let caller = caller(&state, identity).await?;
    let id: EntityId = parse_id(&id)?;
    let usecase = GetEntityHistoryUseCase {
        repo: state.entity_repo(),
    };
    Ok(ok(usecase.execute(&caller, id).await?))
}
