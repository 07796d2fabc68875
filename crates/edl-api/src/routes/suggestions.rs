//! # Mapping Suggestion Routes — Review Queue
//!
//! Routes:
//! - GET  /api/suggestions — list suggestions (filter by `status`)
//! - POST /api/suggestions/{id}/approve — approve and map the entity
//! - POST /api/suggestions/{id}/reject — reject; the entity is untouched
//!
//! Both review routes log a decision; rejection requires a comment.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use edl_core::SuggestionId;
use edl_service::DecisionRequest;
use edl_state::{Decision, MappingSuggestion};

use crate::routes::{tenant_param, TenantQuery};
use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/suggestions", get(list_suggestions))
        .route("/api/suggestions/{id}/approve", post(approve_suggestion))
        .route("/api/suggestions/{id}/reject", post(reject_suggestion))
}

/// Query parameters for the suggestion list.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionListQuery {
    /// Tenant slug. Required.
    #[serde(default)]
    pub tenant_id: String,
    /// Filter by review status, e.g. `PENDING`.
    pub status: Option<String>,
}

/// Body for reviewing a suggestion.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewBody {
    /// Machine-readable reason code.
    pub reason_code: String,
    /// Free-text comment. Required on rejection.
    pub comment: Option<String>,
    /// Reviewer logged on the decision and the suggestion.
    pub actor: String,
}

impl From<ReviewBody> for DecisionRequest {
    fn from(body: ReviewBody) -> Self {
        DecisionRequest {
            reason_code: body.reason_code,
            comment: body.comment,
            actor: body.actor,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/suggestions",
    params(SuggestionListQuery),
    responses(
        (status = 200, description = "Mapping suggestions for the tenant"),
        (status = 422, description = "Missing or invalid tenant_id"),
    ),
    tag = "suggestions"
)]
pub async fn list_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionListQuery>,
) -> Result<Json<Vec<MappingSuggestion>>, AppError> {
    let tenant = tenant_param(&query.tenant_id)?;
    let mut suggestions = state.service.list_suggestions(&tenant)?;
    suggestions.retain(|suggestion| {
        query
            .status
            .as_deref()
            .map_or(true, |s| suggestion.status.as_str() == s)
    });
    Ok(Json(suggestions))
}

/// Approve the suggestion: the entity is marked MAPPED with the
/// suggested target, and still-unbound sealed evidence is bound.
#[utoipa::path(
    post,
    path = "/api/suggestions/{id}/approve",
    params(("id" = Uuid, Path, description = "Suggestion id"), TenantQuery),
    request_body = ReviewBody,
    responses(
        (status = 200, description = "Approved; the decision is returned"),
        (status = 404, description = "No such suggestion in the tenant"),
        (status = 409, description = "The suggestion was already reviewed"),
    ),
    tag = "suggestions"
)]
pub async fn approve_suggestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<Decision>, AppError> {
    let tenant = query.tenant()?;
    let decision = state
        .service
        .approve_mapping(&tenant, &SuggestionId(id), body.into())?;
    Ok(Json(decision))
}

/// Reject the suggestion. Requires a comment; the entity keeps its
/// current mapping status.
#[utoipa::path(
    post,
    path = "/api/suggestions/{id}/reject",
    params(("id" = Uuid, Path, description = "Suggestion id"), TenantQuery),
    request_body = ReviewBody,
    responses(
        (status = 200, description = "Rejected; the decision is returned"),
        (status = 404, description = "No such suggestion in the tenant"),
        (status = 409, description = "The suggestion was already reviewed"),
        (status = 422, description = "Rejection without a comment"),
    ),
    tag = "suggestions"
)]
pub async fn reject_suggestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<Decision>, AppError> {
    let tenant = query.tenant()?;
    let decision = state
        .service
        .reject_mapping(&tenant, &SuggestionId(id), body.into())?;
    Ok(Json(decision))
}
