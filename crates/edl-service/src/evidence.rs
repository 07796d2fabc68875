//! # Evidence Intake and Sealing
//!
//! Drives the evidence lifecycle against the store: ingestion creates
//! drafts, validation runs the draft checks, sealing computes the
//! hashes and stamps the retention horizon, quarantine pulls a record
//! out of circulation and opens a routed review work item.
//!
//! ## Security Invariant
//!
//! Seal and quarantine append to the tenant's audit chain inside the
//! same call that persists the record. There is no path to a SEALED or
//! QUARANTINED record without the matching audit event.

use serde_json::{json, Value};
use tracing::info;

use edl_core::{
    AuditEventType, DatasetType, DisplayId, EvidenceId, IngestionMethod, TenantId, WorkItemType,
};
use edl_state::{
    AuditObjectType, Draft, DynEvidence, EntityRef, Evidence, EvidenceIntake, EvidenceStatus,
    ReadyToSeal, ReconciliationStatus, ValidationFailed, ValidationOutcome, WorkItemDetails,
};

use crate::workitems::WorkItemDraft;
use crate::{LedgerService, ServiceError};

/// Caller-supplied fields for a new evidence record.
#[derive(Debug, Clone)]
pub struct EvidenceSubmission {
    pub dataset: DatasetType,
    pub ingestion_method: IngestionMethod,
    pub source_system: String,
    pub ingested_by: String,
    pub payload: Value,
    /// Entity binding, when already known at ingestion time.
    pub entity: Option<EntityRef>,
}

impl LedgerService {
    /// Ingest a new draft evidence record.
    ///
    /// When the submission names an entity, the entity must exist; its
    /// evidence counter is incremented.
    pub fn ingest_evidence(
        &self,
        tenant: &TenantId,
        submission: EvidenceSubmission,
    ) -> Result<DynEvidence, ServiceError> {
        let entity = match &submission.entity {
            Some(entity_ref) => Some(self.store.entity(tenant, &entity_ref.id)?),
            None => None,
        };

        let id = EvidenceId::new();
        let display_id = DisplayId::from_uuid("EV", id.as_uuid());
        let record = DynEvidence::from(Evidence::new(EvidenceIntake {
            id,
            display_id,
            tenant_id: tenant.clone(),
            dataset: submission.dataset,
            ingestion_method: submission.ingestion_method,
            source_system: submission.source_system,
            ingested_by: submission.ingested_by,
            payload: submission.payload,
            entity: submission.entity,
        }));
        self.store.save_evidence(record.clone())?;

        if let Some(mut entity) = entity {
            entity.record_evidence();
            self.store.save_entity(entity)?;
        }

        info!(
            tenant = %tenant,
            evidence = %record.display_id,
            dataset = record.dataset.as_str(),
            "ingested evidence draft"
        );
        Ok(record)
    }

    /// Run validation on a DRAFT or VALIDATION_FAILED record.
    ///
    /// The record moves to READY_TO_SEAL or (back to) VALIDATION_FAILED
    /// with the findings recorded on it.
    pub fn validate_draft(
        &self,
        tenant: &TenantId,
        id: &EvidenceId,
    ) -> Result<DynEvidence, ServiceError> {
        let record = self.store.evidence(tenant, id)?;
        let display_id = record.display_id.clone();
        let outcome = match record.status {
            EvidenceStatus::Draft => Evidence::<Draft>::try_from(record)?.validate(),
            EvidenceStatus::ValidationFailed => {
                Evidence::<ValidationFailed>::try_from(record)?.revalidate()
            }
            other => {
                return Err(ServiceError::State(format!(
                    "evidence {display_id} is {other}, only DRAFT or VALIDATION_FAILED records validate"
                )))
            }
        };
        let record = match outcome {
            ValidationOutcome::Valid(ready) => DynEvidence::from(ready),
            ValidationOutcome::Invalid(failed) => DynEvidence::from(failed),
        };
        self.store.save_evidence(record.clone())?;
        info!(
            tenant = %tenant,
            evidence = %record.display_id,
            status = record.status.name(),
            "validated evidence"
        );
        Ok(record)
    }

    /// Seal a READY_TO_SEAL record.
    ///
    /// Computes the content and metadata hashes, stamps the retention
    /// horizon, and appends EVIDENCE_SEALED to the audit chain.
    pub fn seal_evidence(
        &self,
        tenant: &TenantId,
        id: &EvidenceId,
        sealed_by: &str,
    ) -> Result<DynEvidence, ServiceError> {
        let record = self.store.evidence(tenant, id)?;
        if record.status != EvidenceStatus::ReadyToSeal {
            return Err(ServiceError::State(format!(
                "evidence {} is {}, only READY_TO_SEAL records seal",
                record.display_id, record.status
            )));
        }
        let sealed = Evidence::<ReadyToSeal>::try_from(record)?.seal(sealed_by)?;
        let record = DynEvidence::from(sealed);
        self.store.save_evidence(record.clone())?;

        self.audit(
            tenant,
            AuditEventType::EvidenceSealed,
            AuditObjectType::Evidence,
            record.id.to_string(),
            sealed_by,
            json!({
                "displayId": record.display_id.as_str(),
                "dataset": record.dataset.as_str(),
            }),
        )?;
        metrics::counter!("edl_evidence_seals_total").increment(1);
        info!(
            tenant = %tenant,
            evidence = %record.display_id,
            "sealed evidence"
        );
        Ok(record)
    }

    /// Quarantine a pre-seal record and open a review work item.
    ///
    /// A bound entity's quarantine counter is incremented, the record
    /// gets an EVIDENCE_QUARANTINED event, and a REVIEW work item is
    /// created through the assignment engine (which audits separately).
    pub fn quarantine_evidence(
        &self,
        tenant: &TenantId,
        id: &EvidenceId,
        reason: &str,
        actor: &str,
    ) -> Result<DynEvidence, ServiceError> {
        let record = self.store.evidence(tenant, id)?;
        let display_id = record.display_id.clone();
        let quarantined = match record.status {
            EvidenceStatus::Draft => Evidence::<Draft>::try_from(record)?.quarantine(reason),
            EvidenceStatus::ReadyToSeal => {
                Evidence::<ReadyToSeal>::try_from(record)?.quarantine(reason)
            }
            EvidenceStatus::ValidationFailed => {
                Evidence::<ValidationFailed>::try_from(record)?.quarantine(reason)
            }
            other => {
                return Err(ServiceError::State(format!(
                    "evidence {display_id} is {other}, sealed and quarantined records do not quarantine"
                )))
            }
        };
        let record = DynEvidence::from(quarantined);
        self.store.save_evidence(record.clone())?;

        if let ReconciliationStatus::Bound { entity } = &record.reconciliation {
            let mut canonical = self.store.entity(tenant, &entity.id)?;
            canonical.record_quarantine();
            self.store.save_entity(canonical)?;
        }

        self.audit(
            tenant,
            AuditEventType::EvidenceQuarantined,
            AuditObjectType::Evidence,
            record.id.to_string(),
            actor,
            json!({
                "displayId": record.display_id.as_str(),
                "reason": reason,
            }),
        )?;
        metrics::counter!("edl_evidence_quarantines_total").increment(1);

        let entity_ref = match &record.reconciliation {
            ReconciliationStatus::Bound { entity } => Some(entity.clone()),
            ReconciliationStatus::Unbound => None,
        };
        self.create_work_item(
            tenant,
            WorkItemDraft {
                item_type: WorkItemType::Review,
                dataset: Some(record.dataset),
                title: format!("Review quarantined evidence {}", record.display_id),
                description: reason.to_string(),
                evidence_ids: vec![record.id.clone()],
                entity: entity_ref,
                parent_id: None,
                details: WorkItemDetails::General,
                sla_hours: None,
                required_action: Some(
                    "Review the quarantined record and decide its disposition".to_string(),
                ),
            },
            actor,
        )?;

        info!(
            tenant = %tenant,
            evidence = %record.display_id,
            reason,
            "quarantined evidence"
        );
        Ok(record)
    }

    /// Fetch one evidence record (sealed or draft).
    pub fn evidence(
        &self,
        tenant: &TenantId,
        id: &EvidenceId,
    ) -> Result<DynEvidence, ServiceError> {
        Ok(self.store.evidence(tenant, id)?)
    }

    /// All sealed evidence for the tenant.
    pub fn list_sealed_evidence(&self, tenant: &TenantId) -> Result<Vec<DynEvidence>, ServiceError> {
        Ok(self.store.list_sealed_evidence(tenant)?)
    }

    /// All pre-seal evidence for the tenant.
    pub fn list_evidence_drafts(&self, tenant: &TenantId) -> Result<Vec<DynEvidence>, ServiceError> {
        Ok(self.store.list_evidence_drafts(tenant)?)
    }
}
