//! # Audit Routes — Chain Reads and Verification
//!
//! Routes:
//! - GET  /api/audit — the tenant's chain in sequence order
//! - POST /api/audit/verify — recompute every link and report
//!
//! Verification is itself audited: each run appends a
//! HASH_VERIFICATION event carrying the result, so the next
//! verification covers this one.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use edl_service::ChainVerification;
use edl_state::AuditEvent;

use crate::routes::{tenant_param, TenantQuery};
use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/audit", get(list_audit))
        .route("/api/audit/verify", post(verify_chain))
}

/// Query parameters for the audit list.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditListQuery {
    /// Tenant slug. Required.
    #[serde(default)]
    pub tenant_id: String,
    /// Filter by event type, e.g. `EVIDENCE_SEALED`.
    pub event_type: Option<String>,
}

/// Body for chain verification. Optional; the actor defaults to
/// `system` when the request has no body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyBody {
    /// Actor recorded on the HASH_VERIFICATION event.
    pub actor: String,
}

#[utoipa::path(
    get,
    path = "/api/audit",
    params(AuditListQuery),
    responses(
        (status = 200, description = "Audit events in sequence order"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "audit"
)]
pub async fn list_audit(
    State(state): State<AppState>,
    Query(query): Query<AuditListQuery>,
) -> Result<Json<Vec<AuditEvent>>, AppError> {
    let tenant = tenant_param(&query.tenant_id)?;
    let mut events = state.service.list_audit(&tenant)?;
    events.retain(|event| {
        query
            .event_type
            .as_deref()
            .map_or(true, |t| event.event_type.as_str() == t)
    });
    Ok(Json(events))
}

/// Verify the tenant's audit chain. An invalid chain is reported in
/// the body with a 200, not an error status; only store failures 500.
#[utoipa::path(
    post,
    path = "/api/audit/verify",
    params(TenantQuery),
    request_body = VerifyBody,
    responses(
        (status = 200, description = "Verification report, valid or not"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "audit"
)]
pub async fn verify_chain(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
    body: Option<Json<VerifyBody>>,
) -> Result<Json<ChainVerification>, AppError> {
    let tenant = query.tenant()?;
    let actor = body.map_or_else(|| "system".to_string(), |Json(b)| b.actor);
    Ok(Json(state.service.verify_audit_chain(&tenant, &actor)?))
}
