//! # Evidence Routes — Intake Through Seal
//!
//! Routes:
//! - GET  /api/evidence — list records (filter by `status`, `dataset_type`)
//! - GET  /api/evidence/drafts — pre-seal records only
//! - GET  /api/evidence/{record_id} — fetch one record
//! - POST /api/evidence — ingest a draft
//! - POST /api/evidence/{record_id}/validate — run validation
//! - POST /api/evidence/{record_id}/seal — seal a READY_TO_SEAL record
//! - POST /api/evidence/{record_id}/quarantine — quarantine with a reason

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use edl_core::{DatasetType, EvidenceId, IngestionMethod};
use edl_service::EvidenceSubmission;
use edl_state::{DynEvidence, EntityRef};

use crate::routes::{tenant_param, TenantQuery};
use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/evidence", get(list_evidence).post(ingest_evidence))
        .route("/api/evidence/drafts", get(list_drafts))
        .route("/api/evidence/{record_id}", get(get_evidence))
        .route("/api/evidence/{record_id}/validate", post(validate_evidence))
        .route("/api/evidence/{record_id}/seal", post(seal_evidence))
        .route(
            "/api/evidence/{record_id}/quarantine",
            post(quarantine_evidence),
        )
}

/// Query parameters for the evidence list.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EvidenceListQuery {
    /// Tenant slug. Required.
    #[serde(default)]
    pub tenant_id: String,
    /// Filter by status name, e.g. `SEALED`.
    pub status: Option<String>,
    /// Filter by dataset, e.g. `SUPPLIER_MASTER`.
    pub dataset_type: Option<String>,
}

/// Body for ingesting a new evidence draft.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestEvidenceBody {
    /// Dataset the record belongs to, e.g. `SUPPLIER_MASTER`.
    #[schema(value_type = String, example = "SUPPLIER_MASTER")]
    pub dataset: DatasetType,
    /// How the record entered the system, e.g. `UPLOAD`.
    #[schema(value_type = String, example = "API")]
    pub ingestion_method: IngestionMethod,
    /// Source system the payload came from.
    pub source_system: String,
    /// Actor performing the ingestion.
    pub ingested_by: String,
    /// The raw payload to be validated and sealed.
    #[schema(value_type = Object)]
    pub payload: Value,
    /// Entity to pre-bind the draft to, when known.
    #[schema(value_type = Option<Object>)]
    pub entity: Option<EntityRef>,
}

/// Body for sealing a record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SealBody {
    /// Actor recorded as the sealer.
    pub sealed_by: String,
}

/// Body for quarantining a record.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuarantineBody {
    /// Why the record is being pulled from the flow.
    pub reason: String,
    /// Actor performing the quarantine.
    pub actor: String,
}

/// All evidence for the tenant, sealed and pre-seal alike.
#[utoipa::path(
    get,
    path = "/api/evidence",
    params(EvidenceListQuery),
    responses(
        (status = 200, description = "Evidence records for the tenant"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "evidence"
)]
pub async fn list_evidence(
    State(state): State<AppState>,
    Query(query): Query<EvidenceListQuery>,
) -> Result<Json<Vec<DynEvidence>>, AppError> {
    let tenant = tenant_param(&query.tenant_id)?;
    let mut records = state.service.list_sealed_evidence(&tenant)?;
    records.extend(state.service.list_evidence_drafts(&tenant)?);
    records.retain(|record| {
        query
            .status
            .as_deref()
            .map_or(true, |s| record.status.name() == s)
            && query
                .dataset_type
                .as_deref()
                .map_or(true, |d| record.dataset.as_str() == d)
    });
    Ok(Json(records))
}

/// Pre-seal records only: drafts, failed validations, quarantines.
#[utoipa::path(
    get,
    path = "/api/evidence/drafts",
    params(TenantQuery),
    responses(
        (status = 200, description = "Pre-seal evidence records"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "evidence"
)]
pub async fn list_drafts(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<Vec<DynEvidence>>, AppError> {
    let tenant = query.tenant()?;
    Ok(Json(state.service.list_evidence_drafts(&tenant)?))
}

#[utoipa::path(
    get,
    path = "/api/evidence/{record_id}",
    params(("record_id" = Uuid, Path, description = "Evidence record id"), TenantQuery),
    responses(
        (status = 200, description = "The evidence record"),
        (status = 404, description = "No such record in the tenant"),
    ),
    tag = "evidence"
)]
pub async fn get_evidence(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<DynEvidence>, AppError> {
    let tenant = query.tenant()?;
    Ok(Json(state.service.evidence(&tenant, &EvidenceId(record_id))?))
}

/// Ingest a new draft. The record starts in DRAFT and must pass
/// validation before it can seal.
#[utoipa::path(
    post,
    path = "/api/evidence",
    params(TenantQuery),
    request_body = IngestEvidenceBody,
    responses(
        (status = 201, description = "Draft ingested"),
        (status = 404, description = "The referenced entity does not exist"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "evidence"
)]
pub async fn ingest_evidence(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<IngestEvidenceBody>,
) -> Result<(StatusCode, Json<DynEvidence>), AppError> {
    let tenant = query.tenant()?;
    let record = state.service.ingest_evidence(
        &tenant,
        EvidenceSubmission {
            dataset: body.dataset,
            ingestion_method: body.ingestion_method,
            source_system: body.source_system,
            ingested_by: body.ingested_by,
            payload: body.payload,
            entity: body.entity,
        },
    )?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Run validation on a DRAFT or VALIDATION_FAILED record.
#[utoipa::path(
    post,
    path = "/api/evidence/{record_id}/validate",
    params(("record_id" = Uuid, Path, description = "Evidence record id"), TenantQuery),
    responses(
        (status = 200, description = "Validation ran; check the returned status"),
        (status = 404, description = "No such record in the tenant"),
        (status = 409, description = "The record is past validation"),
    ),
    tag = "evidence"
)]
pub async fn validate_evidence(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<DynEvidence>, AppError> {
    let tenant = query.tenant()?;
    Ok(Json(
        state.service.validate_draft(&tenant, &EvidenceId(record_id))?,
    ))
}

/// Seal a READY_TO_SEAL record. Sealing stamps both hashes and the
/// retention horizon and appends EVIDENCE_SEALED to the audit chain.
#[utoipa::path(
    post,
    path = "/api/evidence/{record_id}/seal",
    params(("record_id" = Uuid, Path, description = "Evidence record id"), TenantQuery),
    request_body = SealBody,
    responses(
        (status = 200, description = "Record sealed"),
        (status = 404, description = "No such record in the tenant"),
        (status = 409, description = "Only READY_TO_SEAL records seal"),
    ),
    tag = "evidence"
)]
pub async fn seal_evidence(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<SealBody>,
) -> Result<Json<DynEvidence>, AppError> {
    let tenant = query.tenant()?;
    Ok(Json(state.service.seal_evidence(
        &tenant,
        &EvidenceId(record_id),
        &body.sealed_by,
    )?))
}

/// Quarantine a pre-seal record. Terminal: the record never seals, and
/// a REVIEW work item is opened for its disposition.
#[utoipa::path(
    post,
    path = "/api/evidence/{record_id}/quarantine",
    params(("record_id" = Uuid, Path, description = "Evidence record id"), TenantQuery),
    request_body = QuarantineBody,
    responses(
        (status = 200, description = "Record quarantined"),
        (status = 404, description = "No such record in the tenant"),
        (status = 409, description = "Sealed records cannot be quarantined"),
    ),
    tag = "evidence"
)]
pub async fn quarantine_evidence(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<QuarantineBody>,
) -> Result<Json<DynEvidence>, AppError> {
    let tenant = query.tenant()?;
    Ok(Json(state.service.quarantine_evidence(
        &tenant,
        &EvidenceId(record_id),
        &body.reason,
        &body.actor,
    )?))
}
