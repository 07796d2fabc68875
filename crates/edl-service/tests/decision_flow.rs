//! End-to-end decision flows over the seeded demo dataset.
//!
//! Every test builds its own store, so flows that consume the seeded
//! conflict or suggestions do not interfere with each other.

use std::sync::Arc;

use serde_json::json;

use edl_core::{
    AuditEventType, ConflictStrategy, DatasetType, DecisionOutcome, EntityId, EntityKind,
    EvidenceId, IngestionMethod, MappingStatus, Priority, TenantId, WorkItemStatus, WorkItemType,
};
use edl_service::{
    ConflictResolution, DecisionRequest, EvidenceSubmission, LedgerService, ServiceError,
    WorkItemDraft,
};
use edl_state::{
    CanonicalEntity, ConflictSource, EntityRef, EvidenceStatus, ReconciliationStatus,
    SuggestionStatus, WorkItem, WorkItemDetails,
};
use edl_store::{seed_demo_data, LedgerStore, DEMO_TENANT, OTHER_TENANT};

fn demo() -> TenantId {
    TenantId::new(DEMO_TENANT).unwrap()
}

fn other() -> TenantId {
    TenantId::new(OTHER_TENANT).unwrap()
}

fn seeded_service() -> LedgerService {
    let store = Arc::new(LedgerStore::new());
    seed_demo_data(store.as_ref()).unwrap();
    LedgerService::new(store)
}

fn entity_named(service: &LedgerService, name: &str) -> CanonicalEntity {
    service
        .list_entities(&demo())
        .unwrap()
        .into_iter()
        .find(|e| e.display_name == name)
        .unwrap()
}

fn item_of_type(service: &LedgerService, item_type: WorkItemType) -> WorkItem {
    service
        .list_work_items(&demo())
        .unwrap()
        .into_iter()
        .find(|i| i.item_type == item_type)
        .unwrap()
}

fn audit_len(service: &LedgerService, tenant: &TenantId) -> usize {
    service.list_audit(tenant).unwrap().len()
}

fn submission(entity: Option<EntityRef>) -> EvidenceSubmission {
    EvidenceSubmission {
        dataset: DatasetType::SupplierMaster,
        ingestion_method: IngestionMethod::Upload,
        source_system: "ERP".to_string(),
        ingested_by: "ops@acme-compliance.example".to_string(),
        payload: json!({"supplier_name": "Steinbach Metallbau GmbH", "country_code": "DE"}),
        entity,
    }
}

// ── Evidence lifecycle ──────────────────────────────────────────────

#[test]
fn ingest_validate_seal_audits_the_chain() {
    let service = seeded_service();
    let tenant = demo();
    let events_before = audit_len(&service, &tenant);

    let draft = service.ingest_evidence(&tenant, submission(None)).unwrap();
    assert_eq!(draft.status, EvidenceStatus::Draft);
    assert!(draft.content_hash.is_none());

    // A draft cannot seal before validation.
    let err = service
        .seal_evidence(&tenant, &draft.id, "ops@acme-compliance.example")
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)));
    assert_eq!(
        service.evidence(&tenant, &draft.id).unwrap().status,
        EvidenceStatus::Draft
    );

    let ready = service.validate_draft(&tenant, &draft.id).unwrap();
    assert_eq!(ready.status, EvidenceStatus::ReadyToSeal);

    let sealed = service
        .seal_evidence(&tenant, &draft.id, "ops@acme-compliance.example")
        .unwrap();
    assert_eq!(sealed.status, EvidenceStatus::Sealed);
    assert!(sealed.content_hash.is_some());
    assert!(sealed.metadata_hash.is_some());
    assert!(sealed.retention_until.is_some());

    let events = service.list_audit(&tenant).unwrap();
    assert_eq!(events.len(), events_before + 1);
    let last = events.last().unwrap();
    assert_eq!(last.event_type, AuditEventType::EvidenceSealed);
    assert_eq!(last.actor, "ops@acme-compliance.example");

    assert!(service.verify_audit_chain(&tenant, "auditor").unwrap().valid);
}

#[test]
fn ingestion_requires_the_referenced_entity() {
    let service = seeded_service();
    let tenant = demo();
    let dangling = EntityRef {
        kind: EntityKind::Supplier,
        id: EntityId::new(),
    };
    let err = service
        .ingest_evidence(&tenant, submission(Some(dangling)))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { kind: "entity", .. }));
}

#[test]
fn quarantine_opens_a_routed_review_item() {
    let service = seeded_service();
    let tenant = demo();
    let baltic = entity_named(&service, "Baltic Components Oy");
    let baltic_ref = EntityRef {
        kind: baltic.kind,
        id: baltic.id.clone(),
    };
    assert_eq!(baltic.quarantined_evidence_count, 0);

    let draft = service
        .ingest_evidence(&tenant, submission(Some(baltic_ref)))
        .unwrap();
    let items_before = service.list_work_items(&tenant).unwrap().len();
    let events_before = audit_len(&service, &tenant);

    let record = service
        .quarantine_evidence(
            &tenant,
            &draft.id,
            "Payload failed the duplicate check",
            "qa@acme-compliance.example",
        )
        .unwrap();
    assert_eq!(record.status, EvidenceStatus::Quarantined);
    assert_eq!(
        record.quarantine_reason.as_deref(),
        Some("Payload failed the duplicate check")
    );

    let baltic = entity_named(&service, "Baltic Components Oy");
    assert_eq!(baltic.quarantined_evidence_count, 1);

    let items = service.list_work_items(&tenant).unwrap();
    assert_eq!(items.len(), items_before + 1);
    let review = items
        .iter()
        .find(|i| i.evidence_ids.contains(&record.id))
        .unwrap();
    assert_eq!(review.item_type, WorkItemType::Review);
    assert_eq!(review.owner, "Supplier Data Team");
    assert_eq!(review.priority, Priority::Medium);
    assert!(review.title.contains(record.display_id.as_str()));

    // One EVIDENCE_QUARANTINED and one WORK_ITEM_CREATED.
    let events = service.list_audit(&tenant).unwrap();
    assert_eq!(events.len(), events_before + 2);
    assert_eq!(
        events[events.len() - 2].event_type,
        AuditEventType::EvidenceQuarantined
    );
    assert_eq!(
        events[events.len() - 1].event_type,
        AuditEventType::WorkItemCreated
    );
}

// ── Work item creation ──────────────────────────────────────────────

#[test]
fn created_conflicts_route_and_escalate() {
    let service = seeded_service();
    let tenant = demo();
    let acme = entity_named(&service, "Acme Industrial GmbH");

    let item = service
        .create_work_item(
            &tenant,
            WorkItemDraft {
                item_type: WorkItemType::Conflict,
                dataset: Some(DatasetType::SupplierMaster),
                title: "Payment terms disagree".to_string(),
                description: String::new(),
                evidence_ids: vec![],
                entity: Some(EntityRef {
                    kind: acme.kind,
                    id: acme.id.clone(),
                }),
                parent_id: None,
                details: WorkItemDetails::Conflict {
                    field: "payment_terms".to_string(),
                    sources: vec![
                        ConflictSource {
                            source_system: "Legacy CRM".to_string(),
                            value: json!("NET60"),
                            trust_rank: 40,
                        },
                        ConflictSource {
                            source_system: "ERP".to_string(),
                            value: json!("NET30"),
                            trust_rank: 100,
                        },
                    ],
                },
                sla_hours: None,
                required_action: None,
            },
            "system",
        )
        .unwrap();

    assert_eq!(item.status, WorkItemStatus::Open);
    assert_eq!(item.owner, "Supplier Data Team");
    assert_eq!(item.priority, Priority::Critical);
    let reason = item.assignment_reason.as_deref().unwrap();
    assert!(reason.contains("trust variance 60"), "{reason}");

    let last = service.list_audit(&tenant).unwrap().pop().unwrap();
    assert_eq!(last.event_type, AuditEventType::WorkItemCreated);
}

#[test]
fn work_item_creation_rejects_dangling_references() {
    let service = seeded_service();
    let tenant = demo();
    let items_before = service.list_work_items(&tenant).unwrap().len();
    let events_before = audit_len(&service, &tenant);

    let draft = WorkItemDraft {
        item_type: WorkItemType::Review,
        dataset: Some(DatasetType::SupplierMaster),
        title: "Review".to_string(),
        description: String::new(),
        evidence_ids: vec![EvidenceId::new()],
        entity: None,
        parent_id: None,
        details: WorkItemDetails::General,
        sla_hours: None,
        required_action: None,
    };
    let err = service
        .create_work_item(&tenant, draft, "system")
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { kind: "evidence", .. }));

    assert_eq!(service.list_work_items(&tenant).unwrap().len(), items_before);
    assert_eq!(audit_len(&service, &tenant), events_before);
}

// ── Conflict resolution ─────────────────────────────────────────────

#[test]
fn conflict_resolution_prefers_the_trusted_system() {
    let service = seeded_service();
    let tenant = demo();
    let conflict = item_of_type(&service, WorkItemType::Conflict);
    let acme = entity_named(&service, "Acme Industrial GmbH");
    assert_eq!(acme.field_value("country_code"), Some(&json!("DE")));
    assert_eq!(acme.open_conflict_count, 1);

    let decision = service
        .resolve_conflict(
            &tenant,
            &conflict.id,
            ConflictResolution {
                strategy: ConflictStrategy::PreferTrustedSystem,
                override_value: None,
                reason_code: "TRUSTED_SOURCE_WINS".to_string(),
                comment: None,
                actor: "supplier-data@acme-compliance.example".to_string(),
            },
        )
        .unwrap();

    assert_eq!(decision.outcome, DecisionOutcome::ConflictResolved);
    assert_eq!(decision.strategy, Some(ConflictStrategy::PreferTrustedSystem));
    assert_eq!(decision.resolved_field.as_deref(), Some("country_code"));
    assert_eq!(decision.resolved_value, Some(json!("FR")));
    assert_eq!(decision.supersedes, None);

    let item = service.work_item(&tenant, &conflict.id).unwrap();
    assert_eq!(item.status, WorkItemStatus::Resolved);

    // ERP's value is now canonical and the conflict counter drops.
    let acme = entity_named(&service, "Acme Industrial GmbH");
    assert_eq!(acme.field_value("country_code"), Some(&json!("FR")));
    assert_eq!(acme.canonical_fields["country_code"].source_system, "ERP");
    assert_eq!(acme.open_conflict_count, 0);

    let history = service.work_item_decisions(&tenant, &conflict.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, decision.id);

    let last = service.list_audit(&tenant).unwrap().pop().unwrap();
    assert_eq!(last.event_type, AuditEventType::DecisionLogged);
}

#[test]
fn manual_override_requires_value_and_comment() {
    let service = seeded_service();
    let tenant = demo();
    let conflict = item_of_type(&service, WorkItemType::Conflict);
    let decisions_before = service.list_decisions(&tenant).unwrap().len();

    let err = service
        .resolve_conflict(
            &tenant,
            &conflict.id,
            ConflictResolution {
                strategy: ConflictStrategy::ManualOverride,
                override_value: None,
                reason_code: "OPERATOR_KNOWS_BEST".to_string(),
                comment: Some("Registered seat moved to Austria".to_string()),
                actor: "supplier-data@acme-compliance.example".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    // Nothing moved.
    let item = service.work_item(&tenant, &conflict.id).unwrap();
    assert_eq!(item.status, WorkItemStatus::Open);
    assert_eq!(service.list_decisions(&tenant).unwrap().len(), decisions_before);
    let acme = entity_named(&service, "Acme Industrial GmbH");
    assert_eq!(acme.field_value("country_code"), Some(&json!("DE")));

    let decision = service
        .resolve_conflict(
            &tenant,
            &conflict.id,
            ConflictResolution {
                strategy: ConflictStrategy::ManualOverride,
                override_value: Some(json!("AT")),
                reason_code: "OPERATOR_KNOWS_BEST".to_string(),
                comment: Some("Registered seat moved to Austria".to_string()),
                actor: "supplier-data@acme-compliance.example".to_string(),
            },
        )
        .unwrap();
    assert_eq!(decision.resolved_value, Some(json!("AT")));

    let acme = entity_named(&service, "Acme Industrial GmbH");
    assert_eq!(acme.field_value("country_code"), Some(&json!("AT")));
    assert_eq!(acme.canonical_fields["country_code"].source_system, "manual");
}

#[test]
fn resolving_a_non_conflict_is_a_type_mismatch() {
    let service = seeded_service();
    let tenant = demo();
    let review = item_of_type(&service, WorkItemType::Review);

    let err = service
        .resolve_conflict(
            &tenant,
            &review.id,
            ConflictResolution {
                strategy: ConflictStrategy::PreferSourceA,
                override_value: None,
                reason_code: "X".to_string(),
                comment: None,
                actor: "system".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::TypeMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "expected a CONFLICT work item, got REVIEW"
    );
}

// ── Approve / reject ────────────────────────────────────────────────

#[test]
fn rejection_without_comment_leaves_the_store_untouched() {
    let service = seeded_service();
    let tenant = demo();
    let review = item_of_type(&service, WorkItemType::Review);
    let decisions_before = service.list_decisions(&tenant).unwrap().len();
    let events_before = audit_len(&service, &tenant);

    let err = service
        .reject(
            &tenant,
            &review.id,
            DecisionRequest {
                reason_code: "EVIDENCE_MISMATCH".to_string(),
                comment: None,
                actor: "reviewer@acme-compliance.example".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let item = service.work_item(&tenant, &review.id).unwrap();
    assert_eq!(item.status, WorkItemStatus::Open);
    assert_eq!(service.list_decisions(&tenant).unwrap().len(), decisions_before);
    assert_eq!(audit_len(&service, &tenant), events_before);

    let decision = service
        .reject(
            &tenant,
            &review.id,
            DecisionRequest {
                reason_code: "EVIDENCE_MISMATCH".to_string(),
                comment: Some("VAT id does not match the registry extract".to_string()),
                actor: "reviewer@acme-compliance.example".to_string(),
            },
        )
        .unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Rejected);
    let item = service.work_item(&tenant, &review.id).unwrap();
    assert_eq!(item.status, WorkItemStatus::Closed);
}

#[test]
fn decisions_supersede_in_append_order() {
    let service = seeded_service();
    let tenant = demo();
    let review = item_of_type(&service, WorkItemType::Review);

    let first = service
        .approve(
            &tenant,
            &review.id,
            DecisionRequest {
                reason_code: "EVIDENCE_VERIFIED".to_string(),
                comment: None,
                actor: "reviewer@acme-compliance.example".to_string(),
            },
        )
        .unwrap();
    assert_eq!(first.outcome, DecisionOutcome::Accepted);
    assert_eq!(first.supersedes, None);
    assert_eq!(
        service.work_item(&tenant, &review.id).unwrap().status,
        WorkItemStatus::Resolved
    );

    // A later rejection closes the resolved item and supersedes the
    // approval without erasing it.
    let second = service
        .reject(
            &tenant,
            &review.id,
            DecisionRequest {
                reason_code: "SUPPLIER_WITHDRAWN".to_string(),
                comment: Some("Supplier terminated the engagement".to_string()),
                actor: "reviewer@acme-compliance.example".to_string(),
            },
        )
        .unwrap();
    assert_eq!(second.supersedes, Some(first.id.clone()));
    assert_eq!(
        service.work_item(&tenant, &review.id).unwrap().status,
        WorkItemStatus::Closed
    );

    let history = service.work_item_decisions(&tenant, &review.id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, first.id);
    assert_eq!(history[1].id, second.id);
}

// ── Follow-ups ──────────────────────────────────────────────────────

#[test]
fn follow_up_creation_is_idempotent() {
    let service = seeded_service();
    let tenant = demo();
    let blocked = item_of_type(&service, WorkItemType::Blocked);
    let events_before = audit_len(&service, &tenant);

    let draft = || WorkItemDraft {
        item_type: WorkItemType::FollowUp,
        dataset: None,
        title: "Chase the schema fix with the ERP vendor".to_string(),
        description: String::new(),
        evidence_ids: vec![],
        entity: None,
        parent_id: None,
        details: WorkItemDetails::General,
        sla_hours: None,
        required_action: None,
    };

    let first = service
        .create_follow_up(&tenant, &blocked.id, draft(), "system")
        .unwrap();
    assert!(first.created);
    assert_eq!(first.work_item.parent_id, Some(blocked.id.clone()));
    // Dataset inherited from the parent feeds routing.
    assert_eq!(first.work_item.dataset, Some(DatasetType::ErpSync));
    let reason = first.work_item.assignment_reason.as_deref().unwrap();
    assert!(reason.contains("FOLLOW_UP:ERP_SYNC"), "{reason}");
    assert_eq!(audit_len(&service, &tenant), events_before + 1);

    let second = service
        .create_follow_up(&tenant, &blocked.id, draft(), "system")
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.work_item.id, first.work_item.id);
    // No second audit event for the no-op.
    assert_eq!(audit_len(&service, &tenant), events_before + 1);
}

#[test]
fn seeded_follow_up_blocks_a_duplicate() {
    let service = seeded_service();
    let tenant = demo();
    let review = item_of_type(&service, WorkItemType::Review);

    let outcome = service
        .create_follow_up(
            &tenant,
            &review.id,
            WorkItemDraft {
                item_type: WorkItemType::FollowUp,
                dataset: None,
                title: "Ask for the VAT extract again".to_string(),
                description: String::new(),
                evidence_ids: vec![],
                entity: None,
                parent_id: None,
                details: WorkItemDetails::General,
                sla_hours: None,
                required_action: None,
            },
            "system",
        )
        .unwrap();
    assert!(!outcome.created);
    assert_eq!(
        outcome.work_item.title,
        "Request the missing VAT registration extract"
    );
}

// ── Mapping review ──────────────────────────────────────────────────

#[test]
fn approving_a_mapping_binds_the_unbound_evidence() {
    let service = seeded_service();
    let tenant = demo();
    let suggestion = service
        .list_suggestions(&tenant)
        .unwrap()
        .into_iter()
        .find(|s| s.status == SuggestionStatus::Pending && s.entity.kind == EntityKind::Supplier)
        .unwrap();
    let evidence_id = suggestion.evidence_id.clone().unwrap();
    let before = service.evidence(&tenant, &evidence_id).unwrap();
    assert_eq!(before.status, EvidenceStatus::Sealed);
    assert!(!before.reconciliation.is_bound());

    let decision = service
        .approve_mapping(
            &tenant,
            &suggestion.id,
            DecisionRequest {
                reason_code: "ENTITY_MATCH_CONFIRMED".to_string(),
                comment: None,
                actor: "mdm@acme-compliance.example".to_string(),
            },
        )
        .unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::MappingApproved);
    assert_eq!(decision.suggestion_id, Some(suggestion.id.clone()));

    let reviewed = service.suggestion(&tenant, &suggestion.id).unwrap();
    assert_eq!(reviewed.status, SuggestionStatus::Approved);
    assert_eq!(
        reviewed.reviewed_by.as_deref(),
        Some("mdm@acme-compliance.example")
    );

    let entity = service.entity(&tenant, &suggestion.entity.id).unwrap();
    assert_eq!(entity.mapping_status, MappingStatus::Mapped);
    assert_eq!(entity.external_ref.as_deref(), Some("SAP-100441"));

    let after = service.evidence(&tenant, &evidence_id).unwrap();
    match &after.reconciliation {
        ReconciliationStatus::Bound { entity } => assert_eq!(entity.id, suggestion.entity.id),
        ReconciliationStatus::Unbound => panic!("evidence still unbound"),
    }

    // The one-shot review refuses a second pass.
    let err = service
        .approve_mapping(
            &tenant,
            &suggestion.id,
            DecisionRequest {
                reason_code: "ENTITY_MATCH_CONFIRMED".to_string(),
                comment: None,
                actor: "mdm@acme-compliance.example".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)));
}

#[test]
fn rejecting_a_mapping_needs_a_comment_and_spares_the_entity() {
    let service = seeded_service();
    let tenant = demo();
    let suggestion = service
        .list_suggestions(&tenant)
        .unwrap()
        .into_iter()
        .find(|s| s.status == SuggestionStatus::Pending && s.entity.kind == EntityKind::Sku)
        .unwrap();

    let err = service
        .reject_mapping(
            &tenant,
            &suggestion.id,
            DecisionRequest {
                reason_code: "WRONG_MATERIAL".to_string(),
                comment: None,
                actor: "mdm@acme-compliance.example".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(
        service.suggestion(&tenant, &suggestion.id).unwrap().status,
        SuggestionStatus::Pending
    );

    let decision = service
        .reject_mapping(
            &tenant,
            &suggestion.id,
            DecisionRequest {
                reason_code: "WRONG_MATERIAL".to_string(),
                comment: Some("Prefix matches a retired material range".to_string()),
                actor: "mdm@acme-compliance.example".to_string(),
            },
        )
        .unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::MappingRejected);
    assert_eq!(
        service.suggestion(&tenant, &suggestion.id).unwrap().status,
        SuggestionStatus::Rejected
    );

    // The entity keeps waiting for a better match.
    let entity = service.entity(&tenant, &suggestion.entity.id).unwrap();
    assert_eq!(entity.mapping_status, MappingStatus::Pending);
    assert_eq!(entity.external_ref, None);
}

// ── Audit and export ────────────────────────────────────────────────

#[test]
fn verification_appends_to_the_chain_it_checks() {
    let service = seeded_service();
    let tenant = demo();

    let first = service.verify_audit_chain(&tenant, "auditor").unwrap();
    assert!(first.valid);
    assert_eq!(first.events_verified, 7);
    assert!(first.head.is_some());
    assert_eq!(first.error, None);

    let events = service.list_audit(&tenant).unwrap();
    assert_eq!(events.len(), 8);
    let last = events.last().unwrap();
    assert_eq!(last.event_type, AuditEventType::HashVerification);

    // The next run covers the event the first one appended.
    let second = service.verify_audit_chain(&tenant, "auditor").unwrap();
    assert!(second.valid);
    assert_eq!(second.events_verified, 8);
}

#[test]
fn export_contains_only_sealed_evidence() {
    let service = seeded_service();
    let tenant = demo();
    let events_before = audit_len(&service, &tenant);

    let package = service.export_package(&tenant, "auditor").unwrap();
    assert_eq!(package.sealed_evidence.len(), 4);
    assert!(package
        .sealed_evidence
        .iter()
        .all(|e| e.status == EvidenceStatus::Sealed));
    assert_eq!(package.decisions.len(), 1);
    assert!(package.audit_head.is_some());

    let events = service.list_audit(&tenant).unwrap();
    assert_eq!(events.len(), events_before + 1);
    assert_eq!(
        events.last().unwrap().event_type,
        AuditEventType::PackageExported
    );
    // The head in the package predates the export event itself.
    assert_eq!(
        package.audit_head.as_deref(),
        Some(events[events.len() - 2].this_hash.as_str())
    );

    let body = serde_json::to_value(&package).unwrap();
    assert!(body.get("sealed_evidence").is_some());
    assert!(body.get("audit_head").is_some());
}

// ── Tenant isolation ────────────────────────────────────────────────

#[test]
fn cross_tenant_reads_are_not_found() {
    let service = seeded_service();
    let review = item_of_type(&service, WorkItemType::Review);

    let err = service.work_item(&other(), &review.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));

    assert_eq!(service.list_work_items(&other()).unwrap().len(), 1);
    let report = service.verify_audit_chain(&other(), "auditor").unwrap();
    assert!(report.valid);
    assert_eq!(report.events_verified, 1);
}
