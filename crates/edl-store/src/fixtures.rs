//! # Seeded Demo Fixtures
//!
//! Loads a deterministic demo dataset: suppliers, a SKU, a BOM, sealed
//! and quarantined evidence, open work items including a trust-rank
//! conflict, mapping suggestions in every review state, one decision,
//! and a populated audit chain. Identifiers come from the demo
//! generator, so reseeding an empty store produces the same ids.
//!
//! A second tenant (`tenant-other`, "Other Tenant Inc") gets a minimal
//! dataset of its own. It exists to make tenant-filtering failures
//! visible: any cross-tenant leak in a list endpoint surfaces its
//! records.

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use edl_core::{
    AuditEventId, AuditEventType, CoreError, DatasetType, DecisionId, DecisionOutcome,
    DemoIdGenerator, EntityId, EntityKind, EvidenceId, IngestionMethod, Priority, SuggestionId,
    TenantId, WorkItemId, WorkItemType,
};
use edl_state::{
    AuditObjectType, CanonicalEntity, ConflictSource, Decision, DecisionError, DecisionInput,
    DynEvidence, EntityError, EntityRef, Evidence, EvidenceError, EvidenceIntake,
    MappingSuggestion, NewAuditEvent, NewWorkItem, ValidationOutcome, WorkItem, WorkItemDetails,
    WorkItemError,
};

use crate::store::{LedgerRepository, StoreError};

/// Errors while constructing or storing fixtures.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    WorkItem(#[from] WorkItemError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    /// A fixture payload failed validation. Indicates a bug in the
    /// fixture data itself.
    #[error("fixture evidence failed validation: {0}")]
    InvalidFixture(String),
}

/// Counts of seeded records, for operator feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub entities: usize,
    pub evidence: usize,
    pub work_items: usize,
    pub suggestions: usize,
    pub decisions: usize,
    pub audit_events: usize,
}

/// Identifier of the primary demo tenant.
pub const DEMO_TENANT: &str = "tenant-demo";

/// Identifier of the isolation-check tenant.
pub const OTHER_TENANT: &str = "tenant-other";

struct Seeder<'a> {
    store: &'a dyn LedgerRepository,
    ids: DemoIdGenerator,
    summary: SeedSummary,
}

impl Seeder<'_> {
    fn intake(
        &mut self,
        tenant: &TenantId,
        dataset: DatasetType,
        ingestion_method: IngestionMethod,
        source_system: &str,
        ingested_by: &str,
        payload: Value,
        entity: Option<EntityRef>,
    ) -> EvidenceIntake {
        EvidenceIntake {
            id: EvidenceId(self.ids.next_uuid()),
            display_id: self.ids.next_display_id("EV"),
            tenant_id: tenant.clone(),
            dataset,
            ingestion_method,
            source_system: source_system.to_string(),
            ingested_by: ingested_by.to_string(),
            payload,
            entity,
        }
    }

    fn seal(&mut self, intake: EvidenceIntake) -> Result<DynEvidence, SeedError> {
        let ready = match Evidence::new(intake).validate() {
            ValidationOutcome::Valid(ready) => ready,
            ValidationOutcome::Invalid(failed) => {
                return Err(SeedError::InvalidFixture(
                    failed.validation_errors.join("; "),
                ))
            }
        };
        let record = DynEvidence::from(ready.seal("system")?);
        self.store.save_evidence(record.clone())?;
        self.summary.evidence += 1;
        Ok(record)
    }

    fn quarantine(
        &mut self,
        intake: EvidenceIntake,
        reason: &str,
    ) -> Result<DynEvidence, SeedError> {
        let record = DynEvidence::from(Evidence::new(intake).quarantine(reason));
        self.store.save_evidence(record.clone())?;
        self.summary.evidence += 1;
        Ok(record)
    }

    fn draft(&mut self, intake: EvidenceIntake) -> Result<DynEvidence, SeedError> {
        let record = DynEvidence::from(Evidence::new(intake));
        self.store.save_evidence(record.clone())?;
        self.summary.evidence += 1;
        Ok(record)
    }

    fn save_entity(&mut self, entity: CanonicalEntity) -> Result<(), SeedError> {
        self.store.save_entity(entity)?;
        self.summary.entities += 1;
        Ok(())
    }

    fn save_work_item(&mut self, item: WorkItem) -> Result<(), SeedError> {
        self.store.save_work_item(item)?;
        self.summary.work_items += 1;
        Ok(())
    }

    fn save_suggestion(&mut self, suggestion: MappingSuggestion) -> Result<(), SeedError> {
        self.store.save_suggestion(suggestion)?;
        self.summary.suggestions += 1;
        Ok(())
    }

    fn audit(
        &mut self,
        tenant: &TenantId,
        event_type: AuditEventType,
        object_type: AuditObjectType,
        object_id: String,
        metadata: Value,
    ) -> Result<(), SeedError> {
        let id = AuditEventId(self.ids.next_uuid());
        self.store.append_audit(NewAuditEvent {
            id,
            tenant_id: tenant.clone(),
            event_type,
            object_type,
            object_id,
            actor: "system".to_string(),
            metadata,
        })?;
        self.summary.audit_events += 1;
        Ok(())
    }
}

/// Seed the demo dataset into a store.
///
/// Idempotent with respect to identifiers: records upsert by id, and
/// the follow-up is deduplicated through the idempotency side-table.
pub fn seed_demo_data(store: &dyn LedgerRepository) -> Result<SeedSummary, SeedError> {
    let mut s = Seeder {
        store,
        ids: DemoIdGenerator::new(),
        summary: SeedSummary::default(),
    };
    let demo = TenantId::new(DEMO_TENANT)?;
    let other = TenantId::new(OTHER_TENANT)?;

    // ── Entities ────────────────────────────────────────────────────

    let mut acme = CanonicalEntity::new(
        EntityId(s.ids.next_uuid()),
        demo.clone(),
        EntityKind::Supplier,
        "Acme Industrial GmbH",
    );
    acme.set_canonical_field("supplier_name", json!("Acme Industrial GmbH"), "ERP");
    acme.set_canonical_field("country_code", json!("DE"), "Legacy CRM");
    acme.set_canonical_field("payment_terms", json!("NET30"), "ERP");
    acme.mark_mapped("SAP-10023");
    let acme_ref = EntityRef {
        kind: EntityKind::Supplier,
        id: acme.id.clone(),
    };

    let mut nordwind = CanonicalEntity::new(
        EntityId(s.ids.next_uuid()),
        demo.clone(),
        EntityKind::Supplier,
        "Nordwind Logistics AB",
    );
    nordwind.set_canonical_field("supplier_name", json!("Nordwind Logistics AB"), "ERP");
    nordwind.missing_fields = vec!["vat_id".to_string(), "payment_terms".to_string()];
    let nordwind_ref = EntityRef {
        kind: EntityKind::Supplier,
        id: nordwind.id.clone(),
    };

    let mut baltic = CanonicalEntity::new(
        EntityId(s.ids.next_uuid()),
        demo.clone(),
        EntityKind::Supplier,
        "Baltic Components Oy",
    );
    baltic.set_canonical_field("supplier_name", json!("Baltic Components Oy"), "ERP");
    baltic.set_canonical_field("country_code", json!("FI"), "ERP");
    baltic.set_canonical_field("vat_id", json!("FI23456789"), "ERP");
    baltic.mark_mapped("SAP-100377");
    let baltic_ref = EntityRef {
        kind: EntityKind::Supplier,
        id: baltic.id.clone(),
    };

    let mut valve = CanonicalEntity::new(
        EntityId(s.ids.next_uuid()),
        demo.clone(),
        EntityKind::Sku,
        "SKU-774 Hydraulic Valve",
    );
    let valve_ref = EntityRef {
        kind: EntityKind::Sku,
        id: valve.id.clone(),
    };

    let mut assembly = CanonicalEntity::new(
        EntityId(s.ids.next_uuid()),
        demo.clone(),
        EntityKind::Bom,
        "BOM Compressor Assembly",
    );
    let assembly_ref = EntityRef {
        kind: EntityKind::Bom,
        id: assembly.id.clone(),
    };

    // ── Evidence (tenant-demo) ──────────────────────────────────────

    let intake = s.intake(
        &demo,
        DatasetType::SupplierMaster,
        IngestionMethod::Upload,
        "ERP",
        "ops@acme-compliance.example",
        json!({
            "supplier_name": "Acme Industrial GmbH",
            "country_code": "FR",
            "vat_id": "FR40303265045"
        }),
        Some(acme_ref.clone()),
    );
    let ev_acme = s.seal(intake)?;

    let intake = s.intake(
        &demo,
        DatasetType::SupplierMaster,
        IngestionMethod::Api,
        "Supplier Portal",
        "integration@acme-compliance.example",
        json!({
            "supplier_name": "Nordwind Logistics AB",
            "country_code": "SE"
        }),
        None,
    );
    let ev_unbound = s.seal(intake)?;

    let intake = s.intake(
        &demo,
        DatasetType::SupplierMaster,
        IngestionMethod::Sync,
        "ERP",
        "system",
        json!({
            "supplier_name": "Baltic Components Oy",
            "country_code": "FI",
            "vat_id": "FI23456789"
        }),
        Some(baltic_ref.clone()),
    );
    let ev_baltic = s.seal(intake)?;

    let intake = s.intake(
        &demo,
        DatasetType::ErpSync,
        IngestionMethod::Sync,
        "ERP",
        "system",
        json!({
            "material_number": "SKU-774",
            "description": "Hydraulic Valve"
        }),
        Some(valve_ref.clone()),
    );
    let ev_valve = s.seal(intake)?;

    let intake = s.intake(
        &demo,
        DatasetType::Invoice,
        IngestionMethod::Upload,
        "OCR Pipeline",
        "ops@acme-compliance.example",
        json!({
            "invoice_number": "INV-2024-118",
            "amount_cents": 1250000,
            "currency": "EUR"
        }),
        None,
    );
    s.draft(intake)?;

    let intake = s.intake(
        &demo,
        DatasetType::Certificate,
        IngestionMethod::Upload,
        "OCR Pipeline",
        "ops@acme-compliance.example",
        json!({
            "certificate_type": "ISO 9001",
            "holder": "Acme Industrial GmbH"
        }),
        Some(assembly_ref.clone()),
    );
    let ev_certificate = s.quarantine(intake, "Signature page missing from scanned document")?;

    // Counters follow the evidence above.
    acme.record_evidence();
    acme.record_conflict();
    baltic.record_evidence();
    valve.record_evidence();
    valve.mark_pending();
    assembly.record_evidence();
    assembly.record_quarantine();
    nordwind.mark_pending();

    s.save_entity(acme)?;
    s.save_entity(nordwind)?;
    s.save_entity(baltic)?;
    s.save_entity(valve)?;
    s.save_entity(assembly)?;

    // ── Suggestions ─────────────────────────────────────────────────

    let mut approved = MappingSuggestion::new(
        SuggestionId(s.ids.next_uuid()),
        demo.clone(),
        acme_ref.clone(),
        None,
        "SAP-10023",
        92,
        "Exact VAT id match",
    )?;
    approved.approve("mdm@acme-compliance.example")?;
    let approved_id = approved.id.clone();
    s.save_suggestion(approved)?;

    let pending_supplier = MappingSuggestion::new(
        SuggestionId(s.ids.next_uuid()),
        demo.clone(),
        nordwind_ref,
        Some(ev_unbound.id.clone()),
        "SAP-100441",
        74,
        "Name similarity and shared address",
    )?;
    s.save_suggestion(pending_supplier)?;

    let pending_sku = MappingSuggestion::new(
        SuggestionId(s.ids.next_uuid()),
        demo.clone(),
        valve_ref.clone(),
        None,
        "SAP-MAT-8812",
        87,
        "Material number prefix match",
    )?;
    s.save_suggestion(pending_sku)?;

    // ── Work items ──────────────────────────────────────────────────

    let review = WorkItem::new(NewWorkItem {
        id: WorkItemId(s.ids.next_uuid()),
        display_id: s.ids.next_display_id("WI"),
        tenant_id: demo.clone(),
        item_type: WorkItemType::Review,
        dataset: Some(DatasetType::SupplierMaster),
        priority: Priority::Medium,
        title: "Review sealed supplier evidence".to_string(),
        description: "Confirm the sealed supplier master record against the source export."
            .to_string(),
        owner: Some("Supplier Data Team".to_string()),
        assignment_reason: Some("Supplier master review queue".to_string()),
        evidence_ids: vec![ev_acme.id.clone()],
        entity: Some(acme_ref.clone()),
        parent_id: None,
        details: WorkItemDetails::General,
        sla_hours: None,
        required_action: Some("Verify supplier name and VAT id".to_string()),
    })?;
    let review_id = review.id.clone();
    s.save_work_item(review)?;

    let conflict = WorkItem::new(NewWorkItem {
        id: WorkItemId(s.ids.next_uuid()),
        display_id: s.ids.next_display_id("WI"),
        tenant_id: demo.clone(),
        item_type: WorkItemType::Conflict,
        dataset: Some(DatasetType::SupplierMaster),
        priority: Priority::Critical,
        title: "Country code conflict for Acme Industrial GmbH".to_string(),
        description: "Legacy CRM and ERP disagree on the supplier country code.".to_string(),
        owner: Some("Supplier Data Team".to_string()),
        assignment_reason: Some(
            "Supplier field conflict; escalated to CRITICAL: trust variance 60".to_string(),
        ),
        evidence_ids: vec![ev_acme.id.clone()],
        entity: Some(acme_ref.clone()),
        parent_id: None,
        details: WorkItemDetails::Conflict {
            field: "country_code".to_string(),
            sources: vec![
                ConflictSource {
                    source_system: "Legacy CRM".to_string(),
                    value: json!("DE"),
                    trust_rank: 40,
                },
                ConflictSource {
                    source_system: "ERP".to_string(),
                    value: json!("FR"),
                    trust_rank: 100,
                },
            ],
        },
        sla_hours: None,
        required_action: Some("Resolve the country code to one canonical value".to_string()),
    })?;
    let conflict_id = conflict.id.clone();
    s.save_work_item(conflict)?;

    let mapping = WorkItem::new(NewWorkItem {
        id: WorkItemId(s.ids.next_uuid()),
        display_id: s.ids.next_display_id("WI"),
        tenant_id: demo.clone(),
        item_type: WorkItemType::Mapping,
        dataset: None,
        priority: Priority::High,
        title: "Map SKU-774 to the target material".to_string(),
        description: "A high-confidence suggestion is waiting for review.".to_string(),
        owner: Some("Master Data Management".to_string()),
        assignment_reason: Some("BOM mapping blocks downstream rollups".to_string()),
        evidence_ids: vec![ev_valve.id.clone()],
        entity: Some(valve_ref),
        parent_id: None,
        details: WorkItemDetails::General,
        sla_hours: None,
        required_action: None,
    })?;
    s.save_work_item(mapping)?;

    let blocked = WorkItem::new(NewWorkItem {
        id: WorkItemId(s.ids.next_uuid()),
        display_id: s.ids.next_display_id("WI"),
        tenant_id: demo.clone(),
        item_type: WorkItemType::Blocked,
        dataset: Some(DatasetType::ErpSync),
        priority: Priority::High,
        title: "ERP sync rejected the material update".to_string(),
        description: "The nightly sync returned a schema validation failure.".to_string(),
        owner: Some("Integration Support".to_string()),
        assignment_reason: Some("ERP sync failure".to_string()),
        evidence_ids: vec![],
        entity: None,
        parent_id: None,
        details: WorkItemDetails::General,
        sla_hours: None,
        required_action: Some("Re-run the sync after the schema fix".to_string()),
    })?;
    s.save_work_item(blocked)?;

    let follow_up_params = NewWorkItem {
        id: WorkItemId(s.ids.next_uuid()),
        display_id: s.ids.next_display_id("WI"),
        tenant_id: demo.clone(),
        item_type: WorkItemType::FollowUp,
        dataset: Some(DatasetType::SupplierMaster),
        priority: Priority::Low,
        title: "Request the missing VAT registration extract".to_string(),
        description: String::new(),
        owner: Some("Supplier Data Team".to_string()),
        assignment_reason: Some("Supplier follow-up".to_string()),
        evidence_ids: vec![ev_acme.id.clone()],
        entity: Some(acme_ref.clone()),
        parent_id: None,
        details: WorkItemDetails::General,
        sla_hours: None,
        required_action: None,
    };
    let follow_up = store.create_follow_up(&demo, &review_id, follow_up_params)?;
    if follow_up.created {
        s.summary.work_items += 1;
    }

    // ── Decisions ───────────────────────────────────────────────────

    let decision = Decision::new(DecisionInput {
        id: DecisionId(s.ids.next_uuid()),
        tenant_id: demo.clone(),
        work_item_id: None,
        suggestion_id: Some(approved_id),
        entity: Some(acme_ref),
        outcome: DecisionOutcome::MappingApproved,
        strategy: None,
        resolved_field: None,
        resolved_value: None,
        reason_code: "ENTITY_MATCH_CONFIRMED".to_string(),
        comment: None,
        actor: "mdm@acme-compliance.example".to_string(),
        supersedes: None,
    })?;
    let decision_id = decision.id.clone();
    store.append_decision(decision)?;
    s.summary.decisions += 1;

    // ── Audit chain (tenant-demo) ───────────────────────────────────

    for sealed in [&ev_acme, &ev_unbound, &ev_baltic, &ev_valve] {
        s.audit(
            &demo,
            AuditEventType::EvidenceSealed,
            AuditObjectType::Evidence,
            sealed.id.to_string(),
            json!({"displayId": sealed.display_id.as_str(), "dataset": sealed.dataset.as_str()}),
        )?;
    }
    s.audit(
        &demo,
        AuditEventType::EvidenceQuarantined,
        AuditObjectType::Evidence,
        ev_certificate.id.to_string(),
        json!({
            "displayId": ev_certificate.display_id.as_str(),
            "reason": "Signature page missing from scanned document"
        }),
    )?;
    s.audit(
        &demo,
        AuditEventType::WorkItemCreated,
        AuditObjectType::WorkItem,
        conflict_id.to_string(),
        json!({"itemType": "CONFLICT", "field": "country_code"}),
    )?;
    s.audit(
        &demo,
        AuditEventType::DecisionLogged,
        AuditObjectType::Decision,
        decision_id.to_string(),
        json!({"outcome": "MAPPING_APPROVED", "suggestionTarget": "SAP-10023"}),
    )?;

    // ── Isolation tenant ────────────────────────────────────────────

    let mut other_supplier = CanonicalEntity::new(
        EntityId(s.ids.next_uuid()),
        other.clone(),
        EntityKind::Supplier,
        "Other Tenant Inc",
    );
    other_supplier.set_canonical_field("supplier_name", json!("Other Tenant Inc"), "ERP");
    other_supplier.record_evidence();
    let other_ref = EntityRef {
        kind: EntityKind::Supplier,
        id: other_supplier.id.clone(),
    };
    s.save_entity(other_supplier)?;

    let intake = s.intake(
        &other,
        DatasetType::SupplierMaster,
        IngestionMethod::Upload,
        "ERP",
        "admin@other-tenant.example",
        json!({"supplier_name": "Other Tenant Inc", "country_code": "US"}),
        Some(other_ref),
    );
    let other_evidence = s.seal(intake)?;

    let other_review = WorkItem::new(NewWorkItem {
        id: WorkItemId(s.ids.next_uuid()),
        display_id: s.ids.next_display_id("WI"),
        tenant_id: other.clone(),
        item_type: WorkItemType::Review,
        dataset: Some(DatasetType::SupplierMaster),
        priority: Priority::Medium,
        title: "Review Other Tenant Inc onboarding evidence".to_string(),
        description: String::new(),
        owner: Some("Supplier Data Team".to_string()),
        assignment_reason: None,
        evidence_ids: vec![other_evidence.id.clone()],
        entity: None,
        parent_id: None,
        details: WorkItemDetails::General,
        sla_hours: None,
        required_action: None,
    })?;
    s.save_work_item(other_review)?;

    s.audit(
        &other,
        AuditEventType::EvidenceSealed,
        AuditObjectType::Evidence,
        other_evidence.id.to_string(),
        json!({"displayId": other_evidence.display_id.as_str()}),
    )?;

    let summary = s.summary;
    info!(
        entities = summary.entities,
        evidence = summary.evidence,
        work_items = summary.work_items,
        suggestions = summary.suggestions,
        "seeded demo data"
    );
    Ok(summary)
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LedgerStore;
    use edl_state::verify_chain;

    fn demo() -> TenantId {
        TenantId::new(DEMO_TENANT).unwrap()
    }

    fn other() -> TenantId {
        TenantId::new(OTHER_TENANT).unwrap()
    }

    #[test]
    fn seeds_both_tenants() {
        let store = LedgerStore::new();
        let summary = seed_demo_data(&store).unwrap();
        assert_eq!(summary.entities, 6);
        assert_eq!(summary.evidence, 7);
        assert_eq!(summary.work_items, 6);
        assert_eq!(summary.suggestions, 3);
        assert_eq!(summary.decisions, 1);
        assert_eq!(summary.audit_events, 8);
    }

    #[test]
    fn demo_lists_never_contain_the_other_tenant() {
        let store = LedgerStore::new();
        seed_demo_data(&store).unwrap();

        for entity in store.list_entities(&demo()).unwrap() {
            assert_ne!(entity.display_name, "Other Tenant Inc");
        }
        for record in store.list_sealed_evidence(&demo()).unwrap() {
            assert_eq!(record.tenant_id, demo());
        }
        assert_eq!(store.list_work_items(&other()).unwrap().len(), 1);
    }

    #[test]
    fn seeded_audit_chains_verify() {
        let store = LedgerStore::new();
        seed_demo_data(&store).unwrap();
        assert_eq!(verify_chain(&store.list_audit(&demo()).unwrap()).unwrap(), 7);
        assert_eq!(
            verify_chain(&store.list_audit(&other()).unwrap()).unwrap(),
            1
        );
    }

    #[test]
    fn seeded_conflict_carries_trust_ranked_sources() {
        let store = LedgerStore::new();
        seed_demo_data(&store).unwrap();
        let conflict = store
            .list_work_items(&demo())
            .unwrap()
            .into_iter()
            .find(|w| w.item_type == WorkItemType::Conflict)
            .expect("seeded conflict item");
        let (field, sources) = conflict.conflict_sources().expect("conflict details");
        assert_eq!(field, "country_code");
        assert_eq!(edl_state::trust_variance(sources), 60);
    }

    #[test]
    fn seeded_entities_cover_the_readiness_states() {
        use edl_core::Readiness;

        let store = LedgerStore::new();
        seed_demo_data(&store).unwrap();
        let states: Vec<Readiness> = store
            .list_entities(&demo())
            .unwrap()
            .iter()
            .map(|e| e.readiness())
            .collect();
        assert!(states.contains(&Readiness::NotReady));
        assert!(states.contains(&Readiness::PendingMatch));
        assert!(states.contains(&Readiness::Ready));
    }

    #[test]
    fn reseeding_reuses_the_follow_up() {
        let store = LedgerStore::new();
        let first = seed_demo_data(&store).unwrap();
        let second = seed_demo_data(&store).unwrap();
        // Same generator seed, same parent and type: the follow-up is
        // deduplicated on the second pass.
        assert_eq!(second.work_items, first.work_items - 1);
    }
}
