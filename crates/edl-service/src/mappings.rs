//! # Mapping Review
//!
//! Approving a suggestion is the one place where three records move
//! together: the suggestion flips to APPROVED, the entity's mapping is
//! confirmed with the suggested target, and a sealed-but-unbound
//! evidence record named by the suggestion is bound to the entity.
//! Rejection flips only the suggestion. Both paths log a decision and
//! an audit event.

use serde_json::json;
use tracing::info;

use edl_core::{AuditEventType, DecisionId, DecisionOutcome, EntityId, SuggestionId, TenantId};
use edl_state::{
    AuditObjectType, CanonicalEntity, Decision, DecisionInput, DynEvidence, Evidence,
    EvidenceStatus, MappingSuggestion, Sealed,
};

use crate::workitems::DecisionRequest;
use crate::{LedgerService, ServiceError};

impl LedgerService {
    /// Approve a mapping suggestion.
    ///
    /// Marks the entity MAPPED with the suggested target and binds the
    /// suggestion's evidence record when it is sealed and still unbound.
    pub fn approve_mapping(
        &self,
        tenant: &TenantId,
        id: &SuggestionId,
        request: DecisionRequest,
    ) -> Result<Decision, ServiceError> {
        let mut suggestion = self.store.suggestion(tenant, id)?;
        let mut entity = self.store.entity(tenant, &suggestion.entity.id)?;

        let decision = Decision::new(DecisionInput {
            id: DecisionId::new(),
            tenant_id: tenant.clone(),
            work_item_id: None,
            suggestion_id: Some(suggestion.id.clone()),
            entity: Some(suggestion.entity.clone()),
            outcome: DecisionOutcome::MappingApproved,
            strategy: None,
            resolved_field: None,
            resolved_value: None,
            reason_code: request.reason_code,
            comment: request.comment,
            actor: request.actor,
            supersedes: None,
        })?;
        suggestion.approve(&decision.actor)?;
        entity.mark_mapped(&suggestion.suggested_target);

        if let Some(evidence_id) = &suggestion.evidence_id {
            let record = self.store.evidence(tenant, evidence_id)?;
            if record.status == EvidenceStatus::Sealed && !record.reconciliation.is_bound() {
                let mut sealed = Evidence::<Sealed>::try_from(record)?;
                sealed.bind_entity(suggestion.entity.clone())?;
                self.store.save_evidence(DynEvidence::from(sealed))?;
            }
        }

        self.store.save_entity(entity)?;
        self.store.save_suggestion(suggestion.clone())?;
        self.store.append_decision(decision.clone())?;

        self.audit(
            tenant,
            AuditEventType::DecisionLogged,
            AuditObjectType::Decision,
            decision.id.to_string(),
            &decision.actor,
            json!({
                "outcome": decision.outcome.as_str(),
                "suggestionTarget": suggestion.suggested_target.as_str(),
            }),
        )?;
        metrics::counter!("edl_decisions_total", "outcome" => decision.outcome.as_str())
            .increment(1);
        info!(
            tenant = %tenant,
            suggestion = %suggestion.id,
            target = %suggestion.suggested_target,
            "approved mapping"
        );
        Ok(decision)
    }

    /// Reject a mapping suggestion. Requires a comment.
    ///
    /// The entity keeps its current mapping status.
    pub fn reject_mapping(
        &self,
        tenant: &TenantId,
        id: &SuggestionId,
        request: DecisionRequest,
    ) -> Result<Decision, ServiceError> {
        let mut suggestion = self.store.suggestion(tenant, id)?;

        let decision = Decision::new(DecisionInput {
            id: DecisionId::new(),
            tenant_id: tenant.clone(),
            work_item_id: None,
            suggestion_id: Some(suggestion.id.clone()),
            entity: Some(suggestion.entity.clone()),
            outcome: DecisionOutcome::MappingRejected,
            strategy: None,
            resolved_field: None,
            resolved_value: None,
            reason_code: request.reason_code,
            comment: request.comment,
            actor: request.actor,
            supersedes: None,
        })?;
        suggestion.reject(&decision.actor)?;

        self.store.save_suggestion(suggestion.clone())?;
        self.store.append_decision(decision.clone())?;

        self.audit(
            tenant,
            AuditEventType::DecisionLogged,
            AuditObjectType::Decision,
            decision.id.to_string(),
            &decision.actor,
            json!({
                "outcome": decision.outcome.as_str(),
                "suggestionTarget": suggestion.suggested_target.as_str(),
            }),
        )?;
        metrics::counter!("edl_decisions_total", "outcome" => decision.outcome.as_str())
            .increment(1);
        info!(
            tenant = %tenant,
            suggestion = %suggestion.id,
            "rejected mapping"
        );
        Ok(decision)
    }

    /// Fetch one mapping suggestion.
    pub fn suggestion(
        &self,
        tenant: &TenantId,
        id: &SuggestionId,
    ) -> Result<MappingSuggestion, ServiceError> {
        Ok(self.store.suggestion(tenant, id)?)
    }

    /// All mapping suggestions for the tenant.
    pub fn list_suggestions(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<MappingSuggestion>, ServiceError> {
        Ok(self.store.list_suggestions(tenant)?)
    }

    /// Fetch one canonical entity.
    pub fn entity(&self, tenant: &TenantId, id: &EntityId) -> Result<CanonicalEntity, ServiceError> {
        Ok(self.store.entity(tenant, id)?)
    }

    /// All canonical entities for the tenant.
    pub fn list_entities(&self, tenant: &TenantId) -> Result<Vec<CanonicalEntity>, ServiceError> {
        Ok(self.store.list_entities(tenant)?)
    }
}
