//! # Entity Routes — Canonical Records and Readiness
//!
//! Routes:
//! - GET /api/entities — list entities (filter by `kind`)
//! - GET /api/entities/{id} — one entity with its derived readiness
//!
//! Readiness is never stored. The detail route recomputes it from the
//! entity's mapping status, quarantine count, conflict count, and
//! missing fields on every read.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use edl_core::{EntityId, Readiness};
use edl_state::CanonicalEntity;

use crate::routes::{tenant_param, TenantQuery};
use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/entities", get(list_entities))
        .route("/api/entities/{id}", get(get_entity))
}

/// Query parameters for the entity list.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EntityListQuery {
    /// Tenant slug. Required.
    #[serde(default)]
    pub tenant_id: String,
    /// Filter by entity kind, e.g. `SUPPLIER`.
    pub kind: Option<String>,
}

/// An entity with its derived readiness attached.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntityDetail {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub entity: CanonicalEntity,
    /// Export readiness, recomputed on this read.
    #[schema(value_type = String, example = "READY_WITH_GAPS")]
    pub readiness: Readiness,
}

#[utoipa::path(
    get,
    path = "/api/entities",
    params(EntityListQuery),
    responses(
        (status = 200, description = "Canonical entities for the tenant"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "entities"
)]
pub async fn list_entities(
    State(state): State<AppState>,
    Query(query): Query<EntityListQuery>,
) -> Result<Json<Vec<CanonicalEntity>>, AppError> {
    let tenant = tenant_param(&query.tenant_id)?;
    let mut entities = state.service.list_entities(&tenant)?;
    entities.retain(|entity| {
        query
            .kind
            .as_deref()
            .map_or(true, |k| entity.kind.as_str() == k)
    });
    Ok(Json(entities))
}

#[utoipa::path(
    get,
    path = "/api/entities/{id}",
    params(("id" = Uuid, Path, description = "Entity id"), TenantQuery),
    responses(
        (status = 200, description = "The entity with derived readiness", body = EntityDetail),
        (status = 404, description = "No such entity in the tenant"),
    ),
    tag = "entities"
)]
pub async fn get_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<EntityDetail>, AppError> {
    let tenant = query.tenant()?;
    let entity = state.service.entity(&tenant, &EntityId(id))?;
    let readiness = entity.readiness();
    Ok(Json(EntityDetail { entity, readiness }))
}
