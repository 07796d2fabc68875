//! # Assignment Engine
//!
//! Pure routing: given a work item's type, dataset, and conflict
//! context, produce an owning team, a priority, and a human-readable
//! reason. No side effects, no clock, no store access. Calling it twice
//! with the same request yields the same assignment, so callers may
//! re-route freely (for example after an evidence status change).
//!
//! ## Design Decision
//!
//! Escalation applies to CONFLICT items only. Quarantined evidence
//! forces CRITICAL outright; otherwise a trust-rank spread above 50
//! between competing sources bumps MEDIUM to HIGH or HIGH to CRITICAL.
//! Other priorities pass through unchanged.

use serde::{Deserialize, Serialize};

use edl_core::{DatasetType, EntityKind, Priority, WorkItemType};
use edl_state::{trust_variance, ConflictSource, EvidenceStatus, WorkItem};

use crate::table::{self, FALLBACK_OWNER};

/// Trust-rank spread above which a conflict escalates one level.
pub const ESCALATION_VARIANCE: u8 = 50;

/// The routing inputs for one work item.
#[derive(Debug, Clone)]
pub struct AssignmentRequest<'a> {
    pub item_type: WorkItemType,
    /// Explicit dataset. Wins over entity-kind inference.
    pub dataset: Option<DatasetType>,
    /// Kind of the linked entity, for dataset inference.
    pub entity_kind: Option<EntityKind>,
    /// Status of the linked evidence, when the caller resolved it.
    pub evidence_status: Option<EvidenceStatus>,
    /// Competing sources, for conflict escalation.
    pub conflict_sources: &'a [ConflictSource],
}

impl<'a> AssignmentRequest<'a> {
    /// Build a request from an existing work item.
    ///
    /// The evidence status is supplied by the caller because the item
    /// stores evidence ids, not statuses.
    pub fn for_work_item(item: &'a WorkItem, evidence_status: Option<EvidenceStatus>) -> Self {
        Self {
            item_type: item.item_type,
            dataset: item.dataset,
            entity_kind: item.entity.as_ref().map(|e| e.kind),
            evidence_status,
            conflict_sources: item
                .conflict_sources()
                .map(|(_, sources)| sources)
                .unwrap_or(&[]),
        }
    }
}

/// The routing outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Owning team.
    pub owner: String,
    /// Priority after escalation.
    pub priority: Priority,
    /// Human-readable routing rationale, including escalation notes.
    pub assignment_reason: String,
    /// The `"{type}:{dataset}"` key that matched, if any.
    #[serde(default)]
    pub routing_rule: Option<String>,
}

/// Derive the routing dataset. Explicit value wins; otherwise inferred
/// from the linked entity kind. SKU items ride the BOM routing rules.
fn derive_dataset(
    explicit: Option<DatasetType>,
    entity_kind: Option<EntityKind>,
) -> Option<DatasetType> {
    explicit.or_else(|| {
        entity_kind.map(|kind| match kind {
            EntityKind::Supplier => DatasetType::SupplierMaster,
            EntityKind::Sku => DatasetType::Bom,
            EntityKind::Bom => DatasetType::Bom,
        })
    })
}

/// Route a work item to an owner and priority.
pub fn assign(request: &AssignmentRequest<'_>) -> Assignment {
    let dataset = derive_dataset(request.dataset, request.entity_kind);
    let key = dataset.map(|d| format!("{}:{}", request.item_type.as_str(), d.as_str()));

    let (owner, mut priority, mut reason, routing_rule) =
        match key.as_deref().and_then(table::lookup) {
            Some(rule) => (
                rule.owner.to_string(),
                rule.base_priority,
                rule.reason.to_string(),
                key,
            ),
            None => {
                let reason = match &key {
                    Some(k) => format!("No routing rule for {k}"),
                    None => "No dataset to route on".to_string(),
                };
                (FALLBACK_OWNER.to_string(), Priority::Medium, reason, None)
            }
        };

    if request.item_type == WorkItemType::Conflict {
        if request.evidence_status == Some(EvidenceStatus::Quarantined) {
            priority = Priority::Critical;
            reason.push_str("; escalated to CRITICAL: quarantined evidence");
        } else {
            let variance = trust_variance(request.conflict_sources);
            if variance > ESCALATION_VARIANCE
                && matches!(priority, Priority::Medium | Priority::High)
            {
                priority = priority.bump();
                reason.push_str(&format!(
                    "; escalated to {priority}: trust variance {variance}"
                ));
            }
        }
    }

    Assignment {
        owner,
        priority,
        assignment_reason: reason,
        routing_rule,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(system: &str, rank: u8) -> ConflictSource {
        ConflictSource {
            source_system: system.to_string(),
            value: json!("value"),
            trust_rank: rank,
        }
    }

    fn conflict_request<'a>(
        dataset: Option<DatasetType>,
        status: Option<EvidenceStatus>,
        sources: &'a [ConflictSource],
    ) -> AssignmentRequest<'a> {
        AssignmentRequest {
            item_type: WorkItemType::Conflict,
            dataset,
            entity_kind: None,
            evidence_status: status,
            conflict_sources: sources,
        }
    }

    // ── Table lookup ────────────────────────────────────────────────

    #[test]
    fn review_routes_to_supplier_team() {
        let request = AssignmentRequest {
            item_type: WorkItemType::Review,
            dataset: Some(DatasetType::SupplierMaster),
            entity_kind: None,
            evidence_status: None,
            conflict_sources: &[],
        };
        let a = assign(&request);
        assert_eq!(a.owner, "Supplier Data Team");
        assert_eq!(a.priority, Priority::Medium);
        assert_eq!(a.routing_rule.as_deref(), Some("REVIEW:SUPPLIER_MASTER"));
    }

    #[test]
    fn follow_up_is_low_priority() {
        let request = AssignmentRequest {
            item_type: WorkItemType::FollowUp,
            dataset: Some(DatasetType::SupplierMaster),
            entity_kind: None,
            evidence_status: None,
            conflict_sources: &[],
        };
        assert_eq!(assign(&request).priority, Priority::Low);
    }

    #[test]
    fn unknown_key_falls_back_unassigned() {
        let request = AssignmentRequest {
            item_type: WorkItemType::Review,
            dataset: Some(DatasetType::Bom),
            entity_kind: None,
            evidence_status: None,
            conflict_sources: &[],
        };
        let a = assign(&request);
        assert_eq!(a.owner, FALLBACK_OWNER);
        assert_eq!(a.priority, Priority::Medium);
        assert_eq!(a.routing_rule, None);
        assert!(a.assignment_reason.contains("REVIEW:BOM"));
    }

    #[test]
    fn no_dataset_falls_back() {
        let request = AssignmentRequest {
            item_type: WorkItemType::Blocked,
            dataset: None,
            entity_kind: None,
            evidence_status: None,
            conflict_sources: &[],
        };
        let a = assign(&request);
        assert_eq!(a.owner, FALLBACK_OWNER);
        assert_eq!(a.assignment_reason, "No dataset to route on");
    }

    // ── Dataset inference ───────────────────────────────────────────

    #[test]
    fn supplier_entity_infers_supplier_master() {
        let request = AssignmentRequest {
            item_type: WorkItemType::Review,
            dataset: None,
            entity_kind: Some(EntityKind::Supplier),
            evidence_status: None,
            conflict_sources: &[],
        };
        assert_eq!(
            assign(&request).routing_rule.as_deref(),
            Some("REVIEW:SUPPLIER_MASTER")
        );
    }

    #[test]
    fn sku_entity_rides_bom_rules() {
        let sources = [source("ERP", 80), source("Legacy CRM", 70)];
        let request = AssignmentRequest {
            item_type: WorkItemType::Conflict,
            dataset: None,
            entity_kind: Some(EntityKind::Sku),
            evidence_status: None,
            conflict_sources: &sources,
        };
        let a = assign(&request);
        assert_eq!(a.routing_rule.as_deref(), Some("CONFLICT:BOM"));
        assert_eq!(a.owner, "Master Data Management");
    }

    #[test]
    fn explicit_dataset_wins_over_entity_kind() {
        let request = AssignmentRequest {
            item_type: WorkItemType::Review,
            dataset: Some(DatasetType::Invoice),
            entity_kind: Some(EntityKind::Supplier),
            evidence_status: None,
            conflict_sources: &[],
        };
        assert_eq!(assign(&request).owner, "Finance Ops");
    }

    // ── Escalation ──────────────────────────────────────────────────

    #[test]
    fn trust_variance_above_threshold_bumps_high_to_critical() {
        let sources = [source("Legacy CRM", 40), source("ERP", 100)];
        let request = conflict_request(Some(DatasetType::SupplierMaster), None, &sources);
        let a = assign(&request);
        assert_eq!(a.priority, Priority::Critical);
        assert!(a.assignment_reason.contains("trust variance 60"));
    }

    #[test]
    fn variance_at_threshold_does_not_escalate() {
        let sources = [source("ERP", 100), source("Supplier Portal", 50)];
        let request = conflict_request(Some(DatasetType::SupplierMaster), None, &sources);
        assert_eq!(assign(&request).priority, Priority::High);
    }

    #[test]
    fn variance_just_above_threshold_escalates() {
        let sources = [source("ERP", 100), source("OCR Pipeline", 49)];
        let request = conflict_request(Some(DatasetType::SupplierMaster), None, &sources);
        assert_eq!(assign(&request).priority, Priority::Critical);
    }

    #[test]
    fn fallback_conflict_bumps_medium_to_high() {
        let sources = [source("ERP", 100), source("OCR Pipeline", 20)];
        let request = conflict_request(Some(DatasetType::Certificate), None, &sources);
        let a = assign(&request);
        assert_eq!(a.owner, FALLBACK_OWNER);
        assert_eq!(a.priority, Priority::High);
    }

    #[test]
    fn quarantined_evidence_forces_critical() {
        let request = conflict_request(
            Some(DatasetType::SupplierMaster),
            Some(EvidenceStatus::Quarantined),
            &[],
        );
        let a = assign(&request);
        assert_eq!(a.priority, Priority::Critical);
        assert!(a.assignment_reason.contains("quarantined evidence"));
    }

    #[test]
    fn quarantine_note_wins_over_variance_note() {
        let sources = [source("Legacy CRM", 40), source("ERP", 100)];
        let request = conflict_request(
            Some(DatasetType::SupplierMaster),
            Some(EvidenceStatus::Quarantined),
            &sources,
        );
        let a = assign(&request);
        assert_eq!(a.priority, Priority::Critical);
        assert!(!a.assignment_reason.contains("trust variance"));
    }

    #[test]
    fn non_conflict_items_never_escalate() {
        let request = AssignmentRequest {
            item_type: WorkItemType::Review,
            dataset: Some(DatasetType::SupplierMaster),
            entity_kind: None,
            evidence_status: Some(EvidenceStatus::Quarantined),
            conflict_sources: &[],
        };
        assert_eq!(assign(&request).priority, Priority::Medium);
    }

    #[test]
    fn assignment_is_idempotent() {
        let sources = [source("Legacy CRM", 40), source("ERP", 100)];
        let request = conflict_request(Some(DatasetType::SupplierMaster), None, &sources);
        assert_eq!(assign(&request), assign(&request));
    }

    // ── Work item extraction ────────────────────────────────────────

    #[test]
    fn request_from_work_item_carries_conflict_context() {
        use edl_core::{DisplayId, TenantId, WorkItemId};
        use edl_state::{NewWorkItem, WorkItemDetails};

        let sources = vec![source("Legacy CRM", 40), source("ERP", 100)];
        let item = WorkItem::new(NewWorkItem {
            id: WorkItemId::new(),
            display_id: DisplayId::new("WI-2024-0001"),
            tenant_id: TenantId::new("tenant-demo").unwrap(),
            item_type: WorkItemType::Conflict,
            dataset: Some(DatasetType::SupplierMaster),
            priority: Priority::Medium,
            title: "Payment terms conflict".to_string(),
            description: String::new(),
            owner: None,
            assignment_reason: None,
            evidence_ids: vec![],
            entity: None,
            parent_id: None,
            details: WorkItemDetails::Conflict {
                field: "payment_terms".to_string(),
                sources,
            },
            sla_hours: None,
            required_action: None,
        })
        .unwrap();

        let request = AssignmentRequest::for_work_item(&item, None);
        assert_eq!(request.item_type, WorkItemType::Conflict);
        assert_eq!(request.conflict_sources.len(), 2);
        assert_eq!(assign(&request).priority, Priority::Critical);
    }
}
