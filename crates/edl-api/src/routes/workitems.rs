//! # Work Item Routes — Queue and Decisions
//!
//! Routes:
//! - GET  /api/workitems — list items (filter by `status`, `type`)
//! - GET  /api/workitems/{id} — fetch one item
//! - POST /api/workitems — create an item (routed, never self-assigned)
//! - POST /api/workitems/{id}/resolve — resolve a CONFLICT item
//! - POST /api/workitems/{id}/followup — idempotent follow-up creation
//! - GET  /api/workitems/{id}/decisions — decision history, append order
//! - POST /api/workitems/{id}/decisions — log an ACCEPTED or REJECTED decision
//!
//! Owner and priority never appear in any request body. Routing decides
//! them from the item type, dataset, and conflict context.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use edl_core::{ConflictStrategy, DatasetType, DecisionOutcome, EvidenceId, WorkItemId, WorkItemType};
use edl_service::{ConflictResolution, DecisionRequest, WorkItemDraft};
use edl_state::{Decision, EntityRef, WorkItem, WorkItemDetails};

use crate::routes::{tenant_param, TenantQuery};
use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workitems", get(list_work_items).post(create_work_item))
        .route("/api/workitems/{id}", get(get_work_item))
        .route("/api/workitems/{id}/resolve", post(resolve_work_item))
        .route("/api/workitems/{id}/followup", post(create_follow_up))
        .route(
            "/api/workitems/{id}/decisions",
            get(list_work_item_decisions).post(log_decision),
        )
}

/// Query parameters for the work item list.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WorkItemListQuery {
    /// Tenant slug. Required.
    #[serde(default)]
    pub tenant_id: String,
    /// Filter by status, e.g. `OPEN`.
    pub status: Option<String>,
    /// Filter by item type, e.g. `CONFLICT`.
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

/// Body for creating a work item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWorkItemBody {
    /// Classification, e.g. `REVIEW` or `CONFLICT`.
    #[schema(value_type = String, example = "REVIEW")]
    pub item_type: WorkItemType,
    /// Dataset the item concerns, when known.
    #[schema(value_type = Option<String>, example = "SUPPLIER_MASTER")]
    pub dataset: Option<DatasetType>,
    /// Short summary.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Linked evidence record ids. All must exist.
    #[serde(default)]
    #[schema(value_type = Vec<Uuid>)]
    pub evidence_ids: Vec<EvidenceId>,
    /// Linked entity, when the item concerns one. Must exist.
    #[schema(value_type = Option<Object>)]
    pub entity: Option<EntityRef>,
    /// Type-specific payload. CONFLICT items carry their sources here.
    #[serde(default = "general_details")]
    #[schema(value_type = Option<Object>)]
    pub details: WorkItemDetails,
    /// SLA window override, in hours.
    pub sla_hours: Option<u32>,
    /// Short instruction for the assignee.
    pub required_action: Option<String>,
    /// Actor recorded on the audit event.
    pub actor: String,
}

fn general_details() -> WorkItemDetails {
    WorkItemDetails::General
}

/// Body for resolving a CONFLICT work item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveConflictBody {
    /// Resolution strategy, e.g. `PREFER_TRUSTED_SYSTEM`.
    #[schema(value_type = String, example = "PREFER_TRUSTED_SYSTEM")]
    pub strategy: ConflictStrategy,
    /// The value to write, for `MANUAL_OVERRIDE`. Ignored otherwise.
    #[schema(value_type = Option<Object>)]
    pub override_value: Option<Value>,
    /// Machine-readable reason code.
    pub reason_code: String,
    /// Free-text comment. Required for `MANUAL_OVERRIDE`.
    pub comment: Option<String>,
    /// Actor logged on the decision.
    pub actor: String,
}

/// Body for creating a follow-up under a parent item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FollowUpBody {
    /// Classification of the follow-up. Defaults to `FOLLOW_UP`.
    #[serde(default = "follow_up_type")]
    #[schema(value_type = Option<String>, example = "FOLLOW_UP")]
    pub item_type: WorkItemType,
    /// Short summary.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Short instruction for the assignee.
    pub required_action: Option<String>,
    /// Actor recorded on the audit event.
    pub actor: String,
}

fn follow_up_type() -> WorkItemType {
    WorkItemType::FollowUp
}

/// Body for logging an approve or reject decision.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionBody {
    /// `ACCEPTED` resolves the item; `REJECTED` closes it.
    #[schema(value_type = String, example = "ACCEPTED")]
    pub outcome: DecisionOutcome,
    /// Machine-readable reason code.
    pub reason_code: String,
    /// Free-text comment. Required for `REJECTED`.
    pub comment: Option<String>,
    /// Actor logged on the decision.
    pub actor: String,
}

/// Follow-up creation result. `created` is false when the follow-up
/// already existed and the previous item is returned.
#[derive(Debug, Serialize, ToSchema)]
pub struct FollowUpResponse {
    pub created: bool,
    #[schema(value_type = Object)]
    pub work_item: WorkItem,
}

#[utoipa::path(
    get,
    path = "/api/workitems",
    params(WorkItemListQuery),
    responses(
        (status = 200, description = "Work items for the tenant"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "workitems"
)]
pub async fn list_work_items(
    State(state): State<AppState>,
    Query(query): Query<WorkItemListQuery>,
) -> Result<Json<Vec<WorkItem>>, AppError> {
    let tenant = tenant_param(&query.tenant_id)?;
    let mut items = state.service.list_work_items(&tenant)?;
    items.retain(|item| {
        query
            .status
            .as_deref()
            .map_or(true, |s| item.status.as_str() == s)
            && query
                .item_type
                .as_deref()
                .map_or(true, |t| item.item_type.as_str() == t)
    });
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/workitems/{id}",
    params(("id" = Uuid, Path, description = "Work item id"), TenantQuery),
    responses(
        (status = 200, description = "The work item"),
        (status = 404, description = "No such item in the tenant"),
    ),
    tag = "workitems"
)]
pub async fn get_work_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<WorkItem>, AppError> {
    let tenant = query.tenant()?;
    Ok(Json(state.service.work_item(&tenant, &WorkItemId(id))?))
}

/// Create a work item. Entity and evidence references are resolved
/// before anything is written; a dangling reference fails the call.
#[utoipa::path(
    post,
    path = "/api/workitems",
    params(TenantQuery),
    request_body = CreateWorkItemBody,
    responses(
        (status = 201, description = "Item created and routed"),
        (status = 404, description = "A referenced record does not exist"),
        (status = 422, description = "Invalid input"),
    ),
    tag = "workitems"
)]
pub async fn create_work_item(
    State(state): State<AppState>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<CreateWorkItemBody>,
) -> Result<(StatusCode, Json<WorkItem>), AppError> {
    let tenant = query.tenant()?;
    let item = state.service.create_work_item(
        &tenant,
        WorkItemDraft {
            item_type: body.item_type,
            dataset: body.dataset,
            title: body.title,
            description: body.description,
            evidence_ids: body.evidence_ids,
            entity: body.entity,
            parent_id: None,
            details: body.details,
            sla_hours: body.sla_hours,
            required_action: body.required_action,
        },
        &body.actor,
    )?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Resolve a CONFLICT item by applying a strategy to its sources.
#[utoipa::path(
    post,
    path = "/api/workitems/{id}/resolve",
    params(("id" = Uuid, Path, description = "Work item id"), TenantQuery),
    request_body = ResolveConflictBody,
    responses(
        (status = 200, description = "Conflict resolved; the decision is returned"),
        (status = 404, description = "No such item in the tenant"),
        (status = 409, description = "The item is not a CONFLICT item"),
        (status = 422, description = "Invalid input, e.g. MANUAL_OVERRIDE without a value"),
    ),
    tag = "workitems"
)]
pub async fn resolve_work_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<ResolveConflictBody>,
) -> Result<Json<Decision>, AppError> {
    let tenant = query.tenant()?;
    let decision = state.service.resolve_conflict(
        &tenant,
        &WorkItemId(id),
        ConflictResolution {
            strategy: body.strategy,
            override_value: body.override_value,
            reason_code: body.reason_code,
            comment: body.comment,
            actor: body.actor,
        },
    )?;
    Ok(Json(decision))
}

/// Create a follow-up under the item. At most one follow-up per
/// (parent, type) pair ever exists; repeats return the existing item.
#[utoipa::path(
    post,
    path = "/api/workitems/{id}/followup",
    params(("id" = Uuid, Path, description = "Parent work item id"), TenantQuery),
    request_body = FollowUpBody,
    responses(
        (status = 201, description = "Follow-up created", body = FollowUpResponse),
        (status = 200, description = "Follow-up already existed", body = FollowUpResponse),
        (status = 404, description = "No such parent in the tenant"),
    ),
    tag = "workitems"
)]
pub async fn create_follow_up(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<FollowUpBody>,
) -> Result<(StatusCode, Json<FollowUpResponse>), AppError> {
    let tenant = query.tenant()?;
    let outcome = state.service.create_follow_up(
        &tenant,
        &WorkItemId(id),
        WorkItemDraft {
            item_type: body.item_type,
            dataset: None,
            title: body.title,
            description: body.description,
            evidence_ids: Vec::new(),
            entity: None,
            parent_id: None,
            details: WorkItemDetails::General,
            sla_hours: None,
            required_action: body.required_action,
        },
        &body.actor,
    )?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(FollowUpResponse {
            created: outcome.created,
            work_item: outcome.work_item,
        }),
    ))
}

/// The item's decision history in append order, oldest first.
#[utoipa::path(
    get,
    path = "/api/workitems/{id}/decisions",
    params(("id" = Uuid, Path, description = "Work item id"), TenantQuery),
    responses(
        (status = 200, description = "Decisions for the item, append order"),
        (status = 404, description = "No such item in the tenant"),
    ),
    tag = "workitems"
)]
pub async fn list_work_item_decisions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<Vec<Decision>>, AppError> {
    let tenant = query.tenant()?;
    Ok(Json(
        state.service.work_item_decisions(&tenant, &WorkItemId(id))?,
    ))
}

/// Log an ACCEPTED or REJECTED decision on the item. Other outcomes
/// are derived by the ledger and cannot be posted directly.
#[utoipa::path(
    post,
    path = "/api/workitems/{id}/decisions",
    params(("id" = Uuid, Path, description = "Work item id"), TenantQuery),
    request_body = DecisionBody,
    responses(
        (status = 201, description = "Decision logged"),
        (status = 404, description = "No such item in the tenant"),
        (status = 409, description = "The item's status forbids the transition"),
        (status = 422, description = "Invalid input, e.g. REJECTED without a comment"),
    ),
    tag = "workitems"
)]
pub async fn log_decision(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<DecisionBody>,
) -> Result<(StatusCode, Json<Decision>), AppError> {
    let tenant = query.tenant()?;
    let request = DecisionRequest {
        reason_code: body.reason_code,
        comment: body.comment,
        actor: body.actor,
    };
    let id = WorkItemId(id);
    let decision = match body.outcome {
        DecisionOutcome::Accepted => state.service.approve(&tenant, &id, request)?,
        DecisionOutcome::Rejected => state.service.reject(&tenant, &id, request)?,
        other => {
            return Err(AppError::Validation(format!(
                "outcome {other} is derived by the ledger, post ACCEPTED or REJECTED"
            )))
        }
    };
    Ok((StatusCode::CREATED, Json(decision)))
}
