//! # Canonical Entities and Mapping Suggestions
//!
//! Canonical entities (suppliers, SKUs, bills of materials) are the
//! business objects evidence maps onto. They accumulate counters as
//! evidence flows through the ledger: linked evidence, quarantined
//! evidence, and open conflicts. Readiness is always derived from those
//! counters, never stored.
//!
//! Mapping suggestions carry a proposed link between an entity and its
//! counterpart in the target system, with a confidence percentage.
//! Confidence is an integer percent, not a float: suggestion records pass
//! through canonicalization when exported, and floats are rejected there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use edl_core::{
    readiness_of, EntityId, EntityKind, EvidenceId, MappingStatus, Readiness, SuggestionId,
    TenantId, Timestamp,
};

// ─── Entity Reference ────────────────────────────────────────────────

/// A typed reference to a canonical entity, carried on evidence, work
/// items, and decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// The kind of entity referenced.
    pub kind: EntityKind,
    /// The entity identifier.
    pub id: EntityId,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from entity and suggestion operations.
#[derive(Error, Debug)]
pub enum EntityError {
    /// Confidence must be a percentage.
    #[error("suggestion confidence must be 0-100, got {value}")]
    ConfidenceOutOfRange {
        /// The rejected value.
        value: u8,
    },

    /// The suggestion was already approved or rejected.
    #[error("suggestion {id} was already reviewed ({status})")]
    AlreadyReviewed {
        /// The suggestion identifier.
        id: String,
        /// Its current status.
        status: String,
    },
}

// ─── Canonical Field ─────────────────────────────────────────────────

/// One canonical field value with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalField {
    /// The agreed value.
    pub value: Value,
    /// The source system the value was taken from (or "manual").
    pub source_system: String,
    /// When the value was last written.
    pub updated_at: Timestamp,
}

// ─── Canonical Entity ────────────────────────────────────────────────

/// A canonical business object that evidence maps onto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEntity {
    /// Unique entity identifier.
    pub id: EntityId,
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// Entity kind.
    pub kind: EntityKind,
    /// Human-facing name, e.g. a supplier's legal name.
    pub display_name: String,
    /// Identifier in the target system, once mapped.
    #[serde(default)]
    pub external_ref: Option<String>,
    /// Mapping progress.
    pub mapping_status: MappingStatus,
    /// Required fields with no canonical value yet.
    #[serde(default)]
    pub missing_fields: Vec<String>,
    /// Number of evidence records linked to this entity.
    #[serde(default)]
    pub evidence_count: u32,
    /// Number of linked evidence records currently quarantined.
    #[serde(default)]
    pub quarantined_evidence_count: u32,
    /// Number of unresolved conflicts over canonical fields.
    #[serde(default)]
    pub open_conflict_count: u32,
    /// Canonical field values keyed by field name.
    #[serde(default)]
    pub canonical_fields: BTreeMap<String, CanonicalField>,
    /// When the entity was created.
    pub created_at: Timestamp,
    /// When the entity was last modified.
    pub updated_at: Timestamp,
}

impl CanonicalEntity {
    /// Create an unmapped entity with zeroed counters.
    pub fn new(id: EntityId, tenant_id: TenantId, kind: EntityKind, display_name: &str) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            tenant_id,
            kind,
            display_name: display_name.to_string(),
            external_ref: None,
            mapping_status: MappingStatus::Unmapped,
            missing_fields: Vec::new(),
            evidence_count: 0,
            quarantined_evidence_count: 0,
            open_conflict_count: 0,
            canonical_fields: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite one canonical field and settle one conflict.
    ///
    /// The open conflict counter decrements, floored at zero, because the
    /// write path for canonical fields is conflict resolution. The field
    /// also drops off the missing list if it was on it.
    pub fn set_canonical_field(&mut self, field: &str, value: Value, source_system: &str) {
        self.canonical_fields.insert(
            field.to_string(),
            CanonicalField {
                value,
                source_system: source_system.to_string(),
                updated_at: Timestamp::now(),
            },
        );
        self.open_conflict_count = self.open_conflict_count.saturating_sub(1);
        self.missing_fields.retain(|f| f != field);
        self.touch();
    }

    /// The canonical value for a field, if one has been written.
    pub fn field_value(&self, field: &str) -> Option<&Value> {
        self.canonical_fields.get(field).map(|f| &f.value)
    }

    /// Register a newly detected conflict.
    pub fn record_conflict(&mut self) {
        self.open_conflict_count += 1;
        self.touch();
    }

    /// Register a linked evidence record.
    pub fn record_evidence(&mut self) {
        self.evidence_count += 1;
        self.touch();
    }

    /// Register a linked evidence record entering quarantine.
    pub fn record_quarantine(&mut self) {
        self.quarantined_evidence_count += 1;
        self.touch();
    }

    /// Register a quarantined record leaving quarantine. Floored at zero.
    pub fn release_quarantine(&mut self) {
        self.quarantined_evidence_count = self.quarantined_evidence_count.saturating_sub(1);
        self.touch();
    }

    /// Confirm the mapping to the target system.
    pub fn mark_mapped(&mut self, external_ref: &str) {
        self.external_ref = Some(external_ref.to_string());
        self.mapping_status = MappingStatus::Mapped;
        self.touch();
    }

    /// Note that a suggestion is awaiting review.
    ///
    /// Only moves UNMAPPED entities; a confirmed mapping is not demoted
    /// by a new suggestion.
    pub fn mark_pending(&mut self) {
        if self.mapping_status == MappingStatus::Unmapped {
            self.mapping_status = MappingStatus::Pending;
            self.touch();
        }
    }

    /// Derived readiness, recomputed from current counters.
    pub fn readiness(&self) -> Readiness {
        readiness_of(
            self.mapping_status,
            self.quarantined_evidence_count,
            self.open_conflict_count,
            &self.missing_fields,
        )
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

// ─── Mapping Suggestions ─────────────────────────────────────────────

/// Review status of a mapping suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionStatus {
    /// Awaiting human review.
    Pending,
    /// Approved; the entity was mapped.
    Approved,
    /// Rejected; the entity mapping is unchanged.
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "PENDING",
            SuggestionStatus::Approved => "APPROVED",
            SuggestionStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed link between a canonical entity and a target-system record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSuggestion {
    /// Unique suggestion identifier.
    pub id: SuggestionId,
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// The entity this suggestion maps.
    pub entity: EntityRef,
    /// The evidence record the match was derived from. An unbound sealed
    /// record referenced here is bound to the entity when the suggestion
    /// is approved.
    #[serde(default)]
    pub evidence_id: Option<EvidenceId>,
    /// Proposed identifier in the target system.
    pub suggested_target: String,
    /// Match confidence as an integer percent (0-100).
    pub confidence_pct: u8,
    /// Why the match was proposed.
    pub rationale: String,
    /// Review status.
    pub status: SuggestionStatus,
    /// When the suggestion was created.
    pub created_at: Timestamp,
    /// Reviewer, once reviewed.
    #[serde(default)]
    pub reviewed_by: Option<String>,
    /// Review time, once reviewed.
    #[serde(default)]
    pub reviewed_at: Option<Timestamp>,
}

impl MappingSuggestion {
    /// Create a pending suggestion.
    ///
    /// # Errors
    ///
    /// Fails if `confidence_pct` exceeds 100.
    pub fn new(
        id: SuggestionId,
        tenant_id: TenantId,
        entity: EntityRef,
        evidence_id: Option<EvidenceId>,
        suggested_target: &str,
        confidence_pct: u8,
        rationale: &str,
    ) -> Result<Self, EntityError> {
        if confidence_pct > 100 {
            return Err(EntityError::ConfidenceOutOfRange {
                value: confidence_pct,
            });
        }
        Ok(Self {
            id,
            tenant_id,
            entity,
            evidence_id,
            suggested_target: suggested_target.to_string(),
            confidence_pct,
            rationale: rationale.to_string(),
            status: SuggestionStatus::Pending,
            created_at: Timestamp::now(),
            reviewed_by: None,
            reviewed_at: None,
        })
    }

    /// Approve the suggestion. Allowed once, from PENDING.
    pub fn approve(&mut self, reviewer: &str) -> Result<(), EntityError> {
        self.review(SuggestionStatus::Approved, reviewer)
    }

    /// Reject the suggestion. Allowed once, from PENDING.
    pub fn reject(&mut self, reviewer: &str) -> Result<(), EntityError> {
        self.review(SuggestionStatus::Rejected, reviewer)
    }

    fn review(&mut self, to: SuggestionStatus, reviewer: &str) -> Result<(), EntityError> {
        if self.status != SuggestionStatus::Pending {
            return Err(EntityError::AlreadyReviewed {
                id: self.id.to_string(),
                status: self.status.to_string(),
            });
        }
        self.status = to;
        self.reviewed_by = Some(reviewer.to_string());
        self.reviewed_at = Some(Timestamp::now());
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("tenant-demo").unwrap()
    }

    fn make_entity() -> CanonicalEntity {
        CanonicalEntity::new(
            EntityId::new(),
            tenant(),
            EntityKind::Supplier,
            "ACME GmbH",
        )
    }

    fn make_suggestion() -> MappingSuggestion {
        MappingSuggestion::new(
            SuggestionId::new(),
            tenant(),
            EntityRef {
                kind: EntityKind::Supplier,
                id: EntityId::new(),
            },
            None,
            "SUP-10021",
            87,
            "Name and tax id match",
        )
        .unwrap()
    }

    // ── Canonical fields ──

    #[test]
    fn set_field_settles_one_conflict() {
        let mut e = make_entity();
        e.record_conflict();
        e.record_conflict();
        e.set_canonical_field("country", serde_json::json!("FR"), "ERP");
        assert_eq!(e.open_conflict_count, 1);
        assert_eq!(e.field_value("country"), Some(&serde_json::json!("FR")));
        assert_eq!(
            e.canonical_fields.get("country").unwrap().source_system,
            "ERP"
        );
    }

    #[test]
    fn conflict_counter_floors_at_zero() {
        let mut e = make_entity();
        e.set_canonical_field("country", serde_json::json!("DE"), "ERP");
        e.set_canonical_field("country", serde_json::json!("FR"), "CRM");
        assert_eq!(e.open_conflict_count, 0);
    }

    #[test]
    fn set_field_clears_missing_entry() {
        let mut e = make_entity();
        e.missing_fields = vec!["tax_id".to_string(), "country".to_string()];
        e.set_canonical_field("tax_id", serde_json::json!("DE811234567"), "ERP");
        assert_eq!(e.missing_fields, vec!["country".to_string()]);
    }

    // ── Counters and readiness ──

    #[test]
    fn quarantine_counter_floors_at_zero() {
        let mut e = make_entity();
        e.release_quarantine();
        assert_eq!(e.quarantined_evidence_count, 0);
        e.record_quarantine();
        e.record_quarantine();
        e.release_quarantine();
        assert_eq!(e.quarantined_evidence_count, 1);
    }

    #[test]
    fn readiness_tracks_counters() {
        let mut e = make_entity();
        assert_eq!(e.readiness(), Readiness::PendingMatch);

        e.mark_mapped("SUP-10021");
        assert_eq!(e.readiness(), Readiness::Ready);

        e.missing_fields.push("hs_code".to_string());
        assert_eq!(e.readiness(), Readiness::ReadyWithGaps);

        e.record_quarantine();
        assert_eq!(e.readiness(), Readiness::NotReady);
    }

    #[test]
    fn mark_pending_does_not_demote_mapped() {
        let mut e = make_entity();
        e.mark_mapped("SUP-10021");
        e.mark_pending();
        assert_eq!(e.mapping_status, MappingStatus::Mapped);

        let mut fresh = make_entity();
        fresh.mark_pending();
        assert_eq!(fresh.mapping_status, MappingStatus::Pending);
    }

    // ── Suggestions ──

    #[test]
    fn confidence_must_be_percent() {
        let err = MappingSuggestion::new(
            SuggestionId::new(),
            tenant(),
            EntityRef {
                kind: EntityKind::Sku,
                id: EntityId::new(),
            },
            None,
            "SKU-1",
            101,
            "overflow",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EntityError::ConfidenceOutOfRange { value: 101 }
        ));
    }

    #[test]
    fn suggestion_reviewed_once() {
        let mut s = make_suggestion();
        s.approve("reviewer@example.com").unwrap();
        assert_eq!(s.status, SuggestionStatus::Approved);
        assert_eq!(s.reviewed_by.as_deref(), Some("reviewer@example.com"));

        let err = s.reject("reviewer@example.com").unwrap_err();
        assert!(matches!(err, EntityError::AlreadyReviewed { .. }));
        assert_eq!(s.status, SuggestionStatus::Approved);
    }

    #[test]
    fn entity_ref_serde_shape() {
        let r = EntityRef {
            kind: EntityKind::Supplier,
            id: EntityId::new(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["kind"], "SUPPLIER");
        assert!(v["id"].is_string());
    }

    #[test]
    fn entity_serde_round_trip() {
        let mut e = make_entity();
        e.mark_mapped("SUP-10021");
        e.set_canonical_field("country", serde_json::json!("DE"), "ERP");
        let json = serde_json::to_string(&e).unwrap();
        let back: CanonicalEntity = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mapping_status, MappingStatus::Mapped);
        assert_eq!(back.field_value("country"), Some(&serde_json::json!("DE")));
    }
}
