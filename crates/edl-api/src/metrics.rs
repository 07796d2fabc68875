//! # Prometheus Rendering
//!
//! Counters are recorded where the work happens, in the service layer.
//! This module owns the scrape endpoint and the domain gauges: work
//! items by status, evidence by status, and entities by readiness are
//! recomputed from the store on every scrape, so they track reality
//! without a background task.

use axum::extract::State;

use edl_core::{Readiness, WorkItemStatus};
use edl_service::{LedgerService, ServiceError};
use edl_state::EvidenceStatus;

use crate::{AppError, AppState};

const WORK_ITEM_STATUSES: [WorkItemStatus; 5] = [
    WorkItemStatus::Open,
    WorkItemStatus::InProgress,
    WorkItemStatus::Blocked,
    WorkItemStatus::Resolved,
    WorkItemStatus::Closed,
];

const EVIDENCE_STATUSES: [EvidenceStatus; 5] = [
    EvidenceStatus::Draft,
    EvidenceStatus::ReadyToSeal,
    EvidenceStatus::ValidationFailed,
    EvidenceStatus::Quarantined,
    EvidenceStatus::Sealed,
];

const READINESS_LEVELS: [Readiness; 4] = [
    Readiness::NotReady,
    Readiness::PendingMatch,
    Readiness::ReadyWithGaps,
    Readiness::Ready,
];

/// GET /metrics. Responds 404 until a recorder is installed.
pub async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    let Some(handle) = state.metrics.clone() else {
        return Err(AppError::NotFound(
            "metrics exporter is not installed".to_string(),
        ));
    };
    record_domain_gauges(&state.service)?;
    Ok(handle.render())
}

fn record_domain_gauges(service: &LedgerService) -> Result<(), ServiceError> {
    for tenant in service.tenants()? {
        let slug = tenant.as_str().to_string();

        let items = service.list_work_items(&tenant)?;
        for status in WORK_ITEM_STATUSES {
            let count = items.iter().filter(|i| i.status == status).count();
            metrics::gauge!(
                "edl_work_items",
                "tenant" => slug.clone(),
                "status" => status.as_str()
            )
            .set(count as f64);
        }

        let mut records = service.list_sealed_evidence(&tenant)?;
        records.extend(service.list_evidence_drafts(&tenant)?);
        for status in EVIDENCE_STATUSES {
            let count = records.iter().filter(|r| r.status == status).count();
            metrics::gauge!(
                "edl_evidence_records",
                "tenant" => slug.clone(),
                "status" => status.name()
            )
            .set(count as f64);
        }

        let entities = service.list_entities(&tenant)?;
        for level in READINESS_LEVELS {
            let count = entities.iter().filter(|e| e.readiness() == level).count();
            metrics::gauge!(
                "edl_entities",
                "tenant" => slug.clone(),
                "readiness" => level.as_str()
            )
            .set(count as f64);
        }
    }
    Ok(())
}
