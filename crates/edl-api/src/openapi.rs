//! # OpenAPI Document
//!
//! Generated from the handler annotations via utoipa and served at
//! `/openapi.json`.

use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Evidence Decision Ledger API",
        description = "Tenant-scoped evidence intake and sealing, routed work item decisions, canonical entity readiness, mapping review, and audit chain verification.",
    ),
    paths(
        routes::evidence::list_evidence,
        routes::evidence::list_drafts,
        routes::evidence::get_evidence,
        routes::evidence::ingest_evidence,
        routes::evidence::validate_evidence,
        routes::evidence::seal_evidence,
        routes::evidence::quarantine_evidence,
        routes::workitems::list_work_items,
        routes::workitems::get_work_item,
        routes::workitems::create_work_item,
        routes::workitems::resolve_work_item,
        routes::workitems::create_follow_up,
        routes::workitems::list_work_item_decisions,
        routes::workitems::log_decision,
        routes::entities::list_entities,
        routes::entities::get_entity,
        routes::suggestions::list_suggestions,
        routes::suggestions::approve_suggestion,
        routes::suggestions::reject_suggestion,
        routes::audit::list_audit,
        routes::audit::verify_chain,
    ),
    components(schemas(
        routes::evidence::IngestEvidenceBody,
        routes::evidence::SealBody,
        routes::evidence::QuarantineBody,
        routes::workitems::CreateWorkItemBody,
        routes::workitems::ResolveConflictBody,
        routes::workitems::FollowUpBody,
        routes::workitems::DecisionBody,
        routes::workitems::FollowUpResponse,
        routes::entities::EntityDetail,
        routes::suggestions::ReviewBody,
        routes::audit::VerifyBody,
    )),
    tags(
        (name = "evidence", description = "Evidence intake, validation, sealing, quarantine"),
        (name = "workitems", description = "Routed work items and their decision flows"),
        (name = "entities", description = "Canonical entities and export readiness"),
        (name = "suggestions", description = "Entity mapping review queue"),
        (name = "audit", description = "Hash-chained audit trail"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/evidence",
            "/api/evidence/drafts",
            "/api/evidence/{record_id}",
            "/api/evidence/{record_id}/validate",
            "/api/evidence/{record_id}/seal",
            "/api/evidence/{record_id}/quarantine",
            "/api/workitems",
            "/api/workitems/{id}",
            "/api/workitems/{id}/resolve",
            "/api/workitems/{id}/followup",
            "/api/workitems/{id}/decisions",
            "/api/entities",
            "/api/entities/{id}",
            "/api/suggestions",
            "/api/suggestions/{id}/approve",
            "/api/suggestions/{id}/reject",
            "/api/audit",
            "/api/audit/verify",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }
}
