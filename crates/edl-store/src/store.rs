//! # Tenant-Scoped Record Store
//!
//! One process-wide store guarded by a single read-write lock. Every
//! read takes a tenant id and filters on exact match: the authorization
//! boundary is filtering, nothing else. Every write mutates in memory
//! and then persists the entire store as one JSON document while still
//! holding the write lock, so a snapshot never captures a half-applied
//! operation and audit chains never interleave.
//!
//! ## Design Decision
//!
//! Services receive the store through the [`LedgerRepository`] trait
//! rather than a singleton import. The in-memory [`LedgerStore`] is the
//! sole implementation and doubles as the test fixture; nothing in the
//! service layer knows whether a snapshot path is configured.
//!
//! There is no optimistic-concurrency check on field updates: the write
//! lock serializes writers in-process, and concurrent processes are out
//! of scope for a single-document snapshot.

use std::path::PathBuf;

use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use edl_core::{EntityId, EvidenceId, SuggestionId, TenantId, WorkItemId};
use edl_state::{
    follow_up_key, AuditError, AuditEvent, CanonicalEntity, Decision, DynEvidence, EvidenceStatus,
    MappingSuggestion, NewAuditEvent, NewWorkItem, WorkItem, WorkItemError,
};

use crate::snapshot::{self, Snapshot, SnapshotError};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record of the given kind and id within the tenant.
    #[error("{kind} {id} not found")]
    NotFound {
        kind: &'static str,
        id: String,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    WorkItem(#[from] WorkItemError),
}

impl StoreError {
    fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

// ─── Repository Trait ────────────────────────────────────────────────

/// Result of a follow-up creation attempt.
///
/// `created` is `false` when the idempotency key already existed and
/// the previously created item was returned instead.
#[derive(Debug, Clone)]
pub struct FollowUpOutcome {
    pub work_item: WorkItem,
    pub created: bool,
}

/// The storage seam between services and the record store.
///
/// All reads are tenant-filtered. Decisions and audit events are
/// append-only: the trait deliberately has no update or delete for
/// either collection.
pub trait LedgerRepository: Send + Sync {
    // ── Evidence ────────────────────────────────────────────────────

    /// Insert or replace an evidence record. Sealed records live in the
    /// sealed collection, everything else among the drafts; a record
    /// that seals moves between them.
    fn save_evidence(&self, record: DynEvidence) -> Result<(), StoreError>;

    /// Fetch one evidence record (sealed or draft) by id.
    fn evidence(&self, tenant: &TenantId, id: &EvidenceId) -> Result<DynEvidence, StoreError>;

    fn list_sealed_evidence(&self, tenant: &TenantId) -> Result<Vec<DynEvidence>, StoreError>;

    fn list_evidence_drafts(&self, tenant: &TenantId) -> Result<Vec<DynEvidence>, StoreError>;

    // ── Work items ──────────────────────────────────────────────────

    fn save_work_item(&self, item: WorkItem) -> Result<(), StoreError>;

    fn work_item(&self, tenant: &TenantId, id: &WorkItemId) -> Result<WorkItem, StoreError>;

    fn list_work_items(&self, tenant: &TenantId) -> Result<Vec<WorkItem>, StoreError>;

    /// Create a follow-up work item under `parent_id`, at most once per
    /// (parent, type) pair. A repeat call returns the existing item.
    fn create_follow_up(
        &self,
        tenant: &TenantId,
        parent_id: &WorkItemId,
        item: NewWorkItem,
    ) -> Result<FollowUpOutcome, StoreError>;

    // ── Entities ────────────────────────────────────────────────────

    fn save_entity(&self, entity: CanonicalEntity) -> Result<(), StoreError>;

    fn entity(&self, tenant: &TenantId, id: &EntityId) -> Result<CanonicalEntity, StoreError>;

    fn list_entities(&self, tenant: &TenantId) -> Result<Vec<CanonicalEntity>, StoreError>;

    /// Overwrite one canonical field and decrement the entity's open
    /// conflict counter (floored at zero). Returns the updated entity.
    fn update_canonical_field(
        &self,
        tenant: &TenantId,
        id: &EntityId,
        field: &str,
        value: Value,
        source_system: &str,
    ) -> Result<CanonicalEntity, StoreError>;

    // ── Mapping suggestions ─────────────────────────────────────────

    fn save_suggestion(&self, suggestion: MappingSuggestion) -> Result<(), StoreError>;

    fn suggestion(
        &self,
        tenant: &TenantId,
        id: &SuggestionId,
    ) -> Result<MappingSuggestion, StoreError>;

    fn list_suggestions(&self, tenant: &TenantId) -> Result<Vec<MappingSuggestion>, StoreError>;

    // ── Decisions ───────────────────────────────────────────────────

    /// Append a decision record. There is no way to amend one.
    fn append_decision(&self, decision: Decision) -> Result<(), StoreError>;

    fn list_decisions(&self, tenant: &TenantId) -> Result<Vec<Decision>, StoreError>;

    // ── Audit ───────────────────────────────────────────────────────

    /// Append an audit event to the tenant's hash chain and return it
    /// with sequence and hashes assigned.
    fn append_audit(&self, event: NewAuditEvent) -> Result<AuditEvent, StoreError>;

    /// The tenant's audit chain in sequence order.
    fn list_audit(&self, tenant: &TenantId) -> Result<Vec<AuditEvent>, StoreError>;

    // ── Tenants ─────────────────────────────────────────────────────

    /// Every tenant id that appears in any collection, deduplicated.
    /// Metrics scrapes use this to produce per-tenant gauges.
    fn tenants(&self) -> Result<Vec<TenantId>, StoreError>;
}

// ─── In-Memory Store ─────────────────────────────────────────────────

/// The in-memory store, optionally mirrored to a JSON snapshot file.
pub struct LedgerStore {
    inner: RwLock<Snapshot>,
    snapshot_path: Option<PathBuf>,
}

impl LedgerStore {
    /// An empty store with no persistence.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Snapshot::default()),
            snapshot_path: None,
        }
    }

    /// A store backed by a snapshot file, loading it when present.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let loaded = snapshot::load(&path)?;
        info!(
            path = %path.display(),
            evidence = loaded.evidence.len(),
            drafts = loaded.evidence_drafts.len(),
            work_items = loaded.work_items.len(),
            entities = loaded.entities.len(),
            "loaded ledger snapshot"
        );
        Ok(Self {
            inner: RwLock::new(loaded),
            snapshot_path: Some(path),
        })
    }

    /// Persist the full document. Called with the write lock held so a
    /// snapshot always reflects a completed operation.
    fn persist_locked(&self, inner: &Snapshot) -> Result<(), StoreError> {
        if let Some(path) = &self.snapshot_path {
            snapshot::save(inner, path)?;
        }
        Ok(())
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerRepository for LedgerStore {
    fn save_evidence(&self, record: DynEvidence) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.evidence.retain(|e| e.id != record.id);
        inner.evidence_drafts.retain(|e| e.id != record.id);
        debug!(id = %record.id, status = %record.status, "saving evidence");
        if record.status == EvidenceStatus::Sealed {
            inner.evidence.push(record);
        } else {
            inner.evidence_drafts.push(record);
        }
        self.persist_locked(&inner)
    }

    fn evidence(&self, tenant: &TenantId, id: &EvidenceId) -> Result<DynEvidence, StoreError> {
        let inner = self.inner.read();
        inner
            .evidence
            .iter()
            .chain(inner.evidence_drafts.iter())
            .find(|e| e.tenant_id == *tenant && e.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("evidence", id))
    }

    fn list_sealed_evidence(&self, tenant: &TenantId) -> Result<Vec<DynEvidence>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .evidence
            .iter()
            .filter(|e| e.tenant_id == *tenant)
            .cloned()
            .collect())
    }

    fn list_evidence_drafts(&self, tenant: &TenantId) -> Result<Vec<DynEvidence>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .evidence_drafts
            .iter()
            .filter(|e| e.tenant_id == *tenant)
            .cloned()
            .collect())
    }

    fn save_work_item(&self, item: WorkItem) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        debug!(id = %item.id, status = %item.status.as_str(), "saving work item");
        match inner.work_items.iter_mut().find(|w| w.id == item.id) {
            Some(slot) => *slot = item,
            None => inner.work_items.push(item),
        }
        self.persist_locked(&inner)
    }

    fn work_item(&self, tenant: &TenantId, id: &WorkItemId) -> Result<WorkItem, StoreError> {
        let inner = self.inner.read();
        inner
            .work_items
            .iter()
            .find(|w| w.tenant_id == *tenant && w.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("work item", id))
    }

    fn list_work_items(&self, tenant: &TenantId) -> Result<Vec<WorkItem>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .work_items
            .iter()
            .filter(|w| w.tenant_id == *tenant)
            .cloned()
            .collect())
    }

    fn create_follow_up(
        &self,
        tenant: &TenantId,
        parent_id: &WorkItemId,
        item: NewWorkItem,
    ) -> Result<FollowUpOutcome, StoreError> {
        let mut inner = self.inner.write();

        let parent_exists = inner
            .work_items
            .iter()
            .any(|w| w.tenant_id == *tenant && w.id == *parent_id);
        if !parent_exists {
            return Err(StoreError::not_found("work item", parent_id));
        }

        let key = follow_up_key(parent_id, item.item_type);
        if let Some(existing_id) = inner.idempotency_keys.get(&key) {
            if let Some(existing) = inner.work_items.iter().find(|w| w.id == *existing_id) {
                debug!(key = %key, id = %existing.id, "follow-up already exists");
                return Ok(FollowUpOutcome {
                    work_item: existing.clone(),
                    created: false,
                });
            }
            // Side-table entry without a matching item; recreate below
            // and overwrite the entry.
        }

        let mut item = item;
        item.parent_id = Some(parent_id.clone());
        let work_item = WorkItem::new(item)?;
        debug!(key = %key, id = %work_item.id, "creating follow-up");
        inner.idempotency_keys.insert(key, work_item.id.clone());
        inner.work_items.push(work_item.clone());
        self.persist_locked(&inner)?;
        Ok(FollowUpOutcome {
            work_item,
            created: true,
        })
    }

    fn save_entity(&self, entity: CanonicalEntity) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        match inner.entities.iter_mut().find(|e| e.id == entity.id) {
            Some(slot) => *slot = entity,
            None => inner.entities.push(entity),
        }
        self.persist_locked(&inner)
    }

    fn entity(&self, tenant: &TenantId, id: &EntityId) -> Result<CanonicalEntity, StoreError> {
        let inner = self.inner.read();
        inner
            .entities
            .iter()
            .find(|e| e.tenant_id == *tenant && e.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("entity", id))
    }

    fn list_entities(&self, tenant: &TenantId) -> Result<Vec<CanonicalEntity>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .entities
            .iter()
            .filter(|e| e.tenant_id == *tenant)
            .cloned()
            .collect())
    }

    fn update_canonical_field(
        &self,
        tenant: &TenantId,
        id: &EntityId,
        field: &str,
        value: Value,
        source_system: &str,
    ) -> Result<CanonicalEntity, StoreError> {
        let mut inner = self.inner.write();
        let entity = inner
            .entities
            .iter_mut()
            .find(|e| e.tenant_id == *tenant && e.id == *id)
            .ok_or_else(|| StoreError::not_found("entity", id))?;
        entity.set_canonical_field(field, value, source_system);
        let updated = entity.clone();
        debug!(id = %updated.id, field, "updated canonical field");
        self.persist_locked(&inner)?;
        Ok(updated)
    }

    fn save_suggestion(&self, suggestion: MappingSuggestion) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        match inner
            .mapping_suggestions
            .iter_mut()
            .find(|s| s.id == suggestion.id)
        {
            Some(slot) => *slot = suggestion,
            None => inner.mapping_suggestions.push(suggestion),
        }
        self.persist_locked(&inner)
    }

    fn suggestion(
        &self,
        tenant: &TenantId,
        id: &SuggestionId,
    ) -> Result<MappingSuggestion, StoreError> {
        let inner = self.inner.read();
        inner
            .mapping_suggestions
            .iter()
            .find(|s| s.tenant_id == *tenant && s.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("mapping suggestion", id))
    }

    fn list_suggestions(&self, tenant: &TenantId) -> Result<Vec<MappingSuggestion>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .mapping_suggestions
            .iter()
            .filter(|s| s.tenant_id == *tenant)
            .cloned()
            .collect())
    }

    fn append_decision(&self, decision: Decision) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        debug!(id = %decision.id, outcome = %decision.outcome.as_str(), "appending decision");
        inner.decisions.push(decision);
        self.persist_locked(&inner)
    }

    fn list_decisions(&self, tenant: &TenantId) -> Result<Vec<Decision>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .decisions
            .iter()
            .filter(|d| d.tenant_id == *tenant)
            .cloned()
            .collect())
    }

    fn append_audit(&self, event: NewAuditEvent) -> Result<AuditEvent, StoreError> {
        let mut inner = self.inner.write();
        let tail = inner
            .audit_events
            .iter()
            .filter(|e| e.tenant_id == event.tenant_id)
            .last();
        let appended = AuditEvent::append(tail, event)?;
        debug!(
            sequence = appended.sequence,
            event_type = %appended.event_type.as_str(),
            "appending audit event"
        );
        inner.audit_events.push(appended.clone());
        self.persist_locked(&inner)?;
        Ok(appended)
    }

    fn list_audit(&self, tenant: &TenantId) -> Result<Vec<AuditEvent>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .audit_events
            .iter()
            .filter(|e| e.tenant_id == *tenant)
            .cloned()
            .collect())
    }

    fn tenants(&self) -> Result<Vec<TenantId>, StoreError> {
        let inner = self.inner.read();
        let mut tenants: Vec<TenantId> = Vec::new();
        for tenant in inner
            .evidence
            .iter()
            .map(|e| &e.tenant_id)
            .chain(inner.evidence_drafts.iter().map(|e| &e.tenant_id))
            .chain(inner.work_items.iter().map(|w| &w.tenant_id))
            .chain(inner.entities.iter().map(|e| &e.tenant_id))
            .chain(inner.mapping_suggestions.iter().map(|s| &s.tenant_id))
            .chain(inner.decisions.iter().map(|d| &d.tenant_id))
            .chain(inner.audit_events.iter().map(|e| &e.tenant_id))
        {
            if !tenants.contains(tenant) {
                tenants.push(tenant.clone());
            }
        }
        Ok(tenants)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use edl_core::{
        AuditEventType, DatasetType, DisplayId, EntityKind, IngestionMethod, Priority,
        WorkItemType,
    };
    use edl_state::{verify_chain, AuditObjectType, Evidence, WorkItemDetails};
    use serde_json::json;

    fn tenant() -> TenantId {
        TenantId::new("tenant-demo").unwrap()
    }

    fn other_tenant() -> TenantId {
        TenantId::new("tenant-other").unwrap()
    }

    fn draft_evidence(tenant: &TenantId) -> DynEvidence {
        let draft = Evidence::new(edl_state::EvidenceIntake {
            id: EvidenceId::new(),
            display_id: DisplayId::new("EV-2024-0001"),
            tenant_id: tenant.clone(),
            dataset: DatasetType::SupplierMaster,
            ingestion_method: IngestionMethod::Upload,
            source_system: "ERP".to_string(),
            ingested_by: "ops@example.com".to_string(),
            payload: json!({"supplier_name": "Acme Industrial GmbH"}),
            entity: None,
        });
        DynEvidence::from(draft)
    }

    fn new_work_item(tenant: &TenantId, item_type: WorkItemType) -> NewWorkItem {
        NewWorkItem {
            id: WorkItemId::new(),
            display_id: DisplayId::new("WI-2024-0001"),
            tenant_id: tenant.clone(),
            item_type,
            dataset: Some(DatasetType::SupplierMaster),
            priority: Priority::Medium,
            title: "Review supplier record".to_string(),
            description: String::new(),
            owner: None,
            assignment_reason: None,
            evidence_ids: vec![],
            entity: None,
            parent_id: None,
            details: WorkItemDetails::General,
            sla_hours: None,
            required_action: None,
        }
    }

    fn audit_event(tenant: &TenantId) -> NewAuditEvent {
        NewAuditEvent {
            id: edl_core::AuditEventId::new(),
            tenant_id: tenant.clone(),
            event_type: AuditEventType::EvidenceSealed,
            object_type: AuditObjectType::Evidence,
            object_id: "evidence:test".to_string(),
            actor: "system".to_string(),
            metadata: json!({}),
        }
    }

    // ── Tenant filtering ────────────────────────────────────────────

    #[test]
    fn reads_are_tenant_scoped() {
        let store = LedgerStore::new();
        let mine = draft_evidence(&tenant());
        let theirs = draft_evidence(&other_tenant());
        store.save_evidence(mine.clone()).unwrap();
        store.save_evidence(theirs.clone()).unwrap();

        let drafts = store.list_evidence_drafts(&tenant()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, mine.id);

        // Knowing the id is not enough without the right tenant.
        let err = store.evidence(&tenant(), &theirs.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn sealed_evidence_moves_out_of_drafts() {
        let store = LedgerStore::new();
        let mut record = draft_evidence(&tenant());
        store.save_evidence(record.clone()).unwrap();
        assert_eq!(store.list_evidence_drafts(&tenant()).unwrap().len(), 1);

        record.status = EvidenceStatus::Sealed;
        store.save_evidence(record.clone()).unwrap();
        assert!(store.list_evidence_drafts(&tenant()).unwrap().is_empty());
        assert_eq!(store.list_sealed_evidence(&tenant()).unwrap().len(), 1);
        // Still findable by id through the combined lookup.
        store.evidence(&tenant(), &record.id).unwrap();
    }

    // ── Follow-up idempotency ───────────────────────────────────────

    #[test]
    fn follow_up_created_once_per_parent_and_type() {
        let store = LedgerStore::new();
        let parent = WorkItem::new(new_work_item(&tenant(), WorkItemType::Review)).unwrap();
        let parent_id = parent.id.clone();
        store.save_work_item(parent).unwrap();

        let first = store
            .create_follow_up(
                &tenant(),
                &parent_id,
                new_work_item(&tenant(), WorkItemType::FollowUp),
            )
            .unwrap();
        assert!(first.created);
        assert_eq!(first.work_item.parent_id, Some(parent_id.clone()));

        let second = store
            .create_follow_up(
                &tenant(),
                &parent_id,
                new_work_item(&tenant(), WorkItemType::FollowUp),
            )
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.work_item.id, first.work_item.id);

        // One parent, one FOLLOW_UP: exactly two items total.
        assert_eq!(store.list_work_items(&tenant()).unwrap().len(), 2);
    }

    #[test]
    fn follow_up_types_have_independent_keys() {
        let store = LedgerStore::new();
        let parent = WorkItem::new(new_work_item(&tenant(), WorkItemType::Review)).unwrap();
        let parent_id = parent.id.clone();
        store.save_work_item(parent).unwrap();

        let follow = store
            .create_follow_up(
                &tenant(),
                &parent_id,
                new_work_item(&tenant(), WorkItemType::FollowUp),
            )
            .unwrap();
        let mapping = store
            .create_follow_up(
                &tenant(),
                &parent_id,
                new_work_item(&tenant(), WorkItemType::Mapping),
            )
            .unwrap();
        assert!(follow.created && mapping.created);
        assert_ne!(follow.work_item.id, mapping.work_item.id);
    }

    #[test]
    fn follow_up_requires_existing_parent() {
        let store = LedgerStore::new();
        let err = store
            .create_follow_up(
                &tenant(),
                &WorkItemId::new(),
                new_work_item(&tenant(), WorkItemType::FollowUp),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    // ── Canonical field updates ─────────────────────────────────────

    #[test]
    fn field_update_decrements_conflicts_floored_at_zero() {
        let store = LedgerStore::new();
        let mut entity = CanonicalEntity::new(
            EntityId::new(),
            tenant(),
            EntityKind::Supplier,
            "Acme Industrial GmbH",
        );
        entity.record_conflict();
        let id = entity.id.clone();
        store.save_entity(entity).unwrap();

        let updated = store
            .update_canonical_field(&tenant(), &id, "country_code", json!("FR"), "ERP")
            .unwrap();
        assert_eq!(updated.open_conflict_count, 0);
        assert_eq!(updated.field_value("country_code"), Some(&json!("FR")));

        // A second update must not underflow the counter.
        let updated = store
            .update_canonical_field(&tenant(), &id, "country_code", json!("DE"), "Legacy CRM")
            .unwrap();
        assert_eq!(updated.open_conflict_count, 0);
    }

    // ── Audit chain ─────────────────────────────────────────────────

    #[test]
    fn audit_chains_are_per_tenant() {
        let store = LedgerStore::new();
        store.append_audit(audit_event(&tenant())).unwrap();
        store.append_audit(audit_event(&other_tenant())).unwrap();
        store.append_audit(audit_event(&tenant())).unwrap();

        let mine = store.list_audit(&tenant()).unwrap();
        let theirs = store.list_audit(&other_tenant()).unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(theirs.len(), 1);
        assert_eq!(verify_chain(&mine).unwrap(), 2);
        assert_eq!(verify_chain(&theirs).unwrap(), 1);
        assert_eq!(mine[1].sequence, 1);
        assert_eq!(theirs[0].sequence, 0);
    }

    #[test]
    fn decisions_accumulate_in_append_order() {
        use edl_core::{DecisionId, DecisionOutcome};
        use edl_state::DecisionInput;

        let store = LedgerStore::new();
        for reason in ["DATA_VERIFIED", "DUPLICATE_RECORD"] {
            let decision = Decision::new(DecisionInput {
                id: DecisionId::new(),
                tenant_id: tenant(),
                work_item_id: None,
                suggestion_id: None,
                entity: None,
                outcome: DecisionOutcome::Accepted,
                strategy: None,
                resolved_field: None,
                resolved_value: None,
                reason_code: reason.to_string(),
                comment: None,
                actor: "reviewer@example.com".to_string(),
                supersedes: None,
            })
            .unwrap();
            store.append_decision(decision).unwrap();
        }
        let decisions = store.list_decisions(&tenant()).unwrap();
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].reason_code, "DATA_VERIFIED");
        assert_eq!(decisions[1].reason_code, "DUPLICATE_RECORD");
    }

    #[test]
    fn tenants_deduplicates_across_collections() {
        let store = LedgerStore::new();
        assert!(store.tenants().unwrap().is_empty());

        store.save_evidence(draft_evidence(&tenant())).unwrap();
        store.append_audit(audit_event(&tenant())).unwrap();
        store.append_audit(audit_event(&other_tenant())).unwrap();

        let tenants = store.tenants().unwrap();
        assert_eq!(tenants.len(), 2);
        assert!(tenants.contains(&tenant()));
        assert!(tenants.contains(&other_tenant()));
    }
}
