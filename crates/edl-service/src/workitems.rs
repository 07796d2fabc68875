//! # Work Item Orchestration
//!
//! Creates routed work items and drives their decision flows. Every
//! mutation follows the same shape: resolve references and build the
//! pure domain records first, then persist, then append the audit
//! event. A validation failure leaves the store untouched.
//!
//! ## Design Decision
//!
//! Owner, priority, and assignment reason are never accepted from the
//! caller. The assignment engine decides them from the item type, the
//! dataset, and the conflict context, so two items with the same shape
//! always land in the same queue.

use serde_json::{json, Value};
use tracing::info;

use edl_core::{
    AuditEventType, ConflictStrategy, DatasetType, DecisionId, DecisionOutcome, DisplayId,
    EvidenceId, TenantId, WorkItemId, WorkItemType,
};
use edl_routing::{assign, AssignmentRequest};
use edl_state::{
    decisions_for_work_item, latest_for_work_item, AuditObjectType, Decision, DecisionInput,
    EntityRef, NewWorkItem, WorkItem, WorkItemDetails,
};
use edl_store::FollowUpOutcome;

use crate::{LedgerService, ServiceError};

// ─── Inputs ──────────────────────────────────────────────────────────

/// Caller-supplied fields for a new work item.
#[derive(Debug, Clone)]
pub struct WorkItemDraft {
    pub item_type: WorkItemType,
    /// Dataset, when known. Routing infers it from the entity otherwise.
    pub dataset: Option<DatasetType>,
    pub title: String,
    pub description: String,
    pub evidence_ids: Vec<EvidenceId>,
    pub entity: Option<EntityRef>,
    pub parent_id: Option<WorkItemId>,
    pub details: WorkItemDetails,
    pub sla_hours: Option<u32>,
    pub required_action: Option<String>,
}

/// Caller-supplied fields for an approve or reject decision.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    /// Machine-readable reason code. Always required.
    pub reason_code: String,
    /// Free-text comment. Required for rejections.
    pub comment: Option<String>,
    pub actor: String,
}

/// Caller-supplied fields for resolving a conflict work item.
#[derive(Debug, Clone)]
pub struct ConflictResolution {
    pub strategy: ConflictStrategy,
    /// The value to write, for MANUAL_OVERRIDE. Ignored otherwise.
    pub override_value: Option<Value>,
    pub reason_code: String,
    pub comment: Option<String>,
    pub actor: String,
}

// ─── Operations ──────────────────────────────────────────────────────

impl LedgerService {
    /// Create a work item, routed through the assignment engine.
    ///
    /// Entity and evidence references are resolved before anything is
    /// written; a dangling reference fails the whole operation. The
    /// first linked evidence record's status feeds conflict escalation.
    pub fn create_work_item(
        &self,
        tenant: &TenantId,
        draft: WorkItemDraft,
        actor: &str,
    ) -> Result<WorkItem, ServiceError> {
        let entity_kind = match &draft.entity {
            Some(entity_ref) => Some(self.store.entity(tenant, &entity_ref.id)?.kind),
            None => None,
        };
        let evidence_status = match draft.evidence_ids.first() {
            Some(id) => Some(self.store.evidence(tenant, id)?.status),
            None => None,
        };
        let conflict_sources = match &draft.details {
            WorkItemDetails::Conflict { sources, .. } => sources.as_slice(),
            WorkItemDetails::General => &[],
        };
        let assignment = assign(&AssignmentRequest {
            item_type: draft.item_type,
            dataset: draft.dataset,
            entity_kind,
            evidence_status,
            conflict_sources,
        });

        let id = WorkItemId::new();
        let display_id = DisplayId::from_uuid("WI", id.as_uuid());
        let item = WorkItem::new(NewWorkItem {
            id,
            display_id,
            tenant_id: tenant.clone(),
            item_type: draft.item_type,
            dataset: draft.dataset,
            priority: assignment.priority,
            title: draft.title,
            description: draft.description,
            owner: Some(assignment.owner),
            assignment_reason: Some(assignment.assignment_reason),
            evidence_ids: draft.evidence_ids,
            entity: draft.entity,
            parent_id: draft.parent_id,
            details: draft.details,
            sla_hours: draft.sla_hours,
            required_action: draft.required_action,
        })?;
        self.store.save_work_item(item.clone())?;

        self.audit(
            tenant,
            AuditEventType::WorkItemCreated,
            AuditObjectType::WorkItem,
            item.id.to_string(),
            actor,
            json!({
                "displayId": item.display_id.as_str(),
                "itemType": item.item_type.as_str(),
                "owner": item.owner.as_str(),
                "priority": item.priority.as_str(),
            }),
        )?;
        info!(
            tenant = %tenant,
            work_item = %item.display_id,
            owner = %item.owner,
            priority = item.priority.as_str(),
            "created work item"
        );
        Ok(item)
    }

    /// Resolve a CONFLICT work item.
    ///
    /// Applies the strategy to pick a value, writes it to the entity's
    /// canonical record when the item is entity-linked, resolves the
    /// item, and appends the CONFLICT_RESOLVED decision.
    pub fn resolve_conflict(
        &self,
        tenant: &TenantId,
        id: &WorkItemId,
        resolution: ConflictResolution,
    ) -> Result<Decision, ServiceError> {
        let mut item = self.store.work_item(tenant, id)?;
        if item.item_type != WorkItemType::Conflict {
            return Err(ServiceError::TypeMismatch {
                expected: WorkItemType::Conflict.to_string(),
                actual: item.item_type.to_string(),
            });
        }

        let (field, resolved_value, source_system) = {
            let (field, sources) = item.conflict_sources().ok_or_else(|| {
                ServiceError::State(format!(
                    "work item {} carries no conflict sources",
                    item.display_id
                ))
            })?;
            match resolution.strategy {
                ConflictStrategy::ManualOverride => (
                    field.to_string(),
                    resolution.override_value.clone(),
                    "manual".to_string(),
                ),
                strategy => {
                    let selected = match strategy {
                        ConflictStrategy::PreferSourceA => sources.first(),
                        ConflictStrategy::PreferSourceB => sources.get(1),
                        _ => sources.iter().max_by_key(|s| s.trust_rank),
                    };
                    let source = selected.ok_or_else(|| {
                        ServiceError::State(format!(
                            "work item {} has no source for {strategy}",
                            item.display_id
                        ))
                    })?;
                    (
                        field.to_string(),
                        Some(source.value.clone()),
                        source.source_system.clone(),
                    )
                }
            }
        };

        let decisions = self.store.list_decisions(tenant)?;
        let supersedes = latest_for_work_item(&decisions, id).map(|d| d.id.clone());
        let decision = Decision::new(DecisionInput {
            id: DecisionId::new(),
            tenant_id: tenant.clone(),
            work_item_id: Some(item.id.clone()),
            suggestion_id: None,
            entity: item.entity.clone(),
            outcome: DecisionOutcome::ConflictResolved,
            strategy: Some(resolution.strategy),
            resolved_field: Some(field.clone()),
            resolved_value: resolved_value.clone(),
            reason_code: resolution.reason_code,
            comment: resolution.comment,
            actor: resolution.actor,
            supersedes,
        })?;
        item.resolve(&format!("Conflict resolved via {}", resolution.strategy))?;

        if let (Some(entity_ref), Some(value)) = (&item.entity, &resolved_value) {
            self.store.update_canonical_field(
                tenant,
                &entity_ref.id,
                &field,
                value.clone(),
                &source_system,
            )?;
        }
        self.store.save_work_item(item.clone())?;
        self.store.append_decision(decision.clone())?;

        self.audit(
            tenant,
            AuditEventType::DecisionLogged,
            AuditObjectType::Decision,
            decision.id.to_string(),
            &decision.actor,
            json!({
                "workItem": item.display_id.as_str(),
                "outcome": decision.outcome.as_str(),
                "strategy": resolution.strategy.as_str(),
                "resolvedField": field,
            }),
        )?;
        metrics::counter!("edl_decisions_total", "outcome" => decision.outcome.as_str())
            .increment(1);
        info!(
            tenant = %tenant,
            work_item = %item.display_id,
            strategy = resolution.strategy.as_str(),
            "resolved conflict"
        );
        Ok(decision)
    }

    /// Approve a work item: log an ACCEPTED decision and resolve it.
    pub fn approve(
        &self,
        tenant: &TenantId,
        id: &WorkItemId,
        request: DecisionRequest,
    ) -> Result<Decision, ServiceError> {
        self.decide(tenant, id, request, DecisionOutcome::Accepted)
    }

    /// Reject a work item: log a REJECTED decision and close it.
    ///
    /// Rejections require a comment.
    pub fn reject(
        &self,
        tenant: &TenantId,
        id: &WorkItemId,
        request: DecisionRequest,
    ) -> Result<Decision, ServiceError> {
        self.decide(tenant, id, request, DecisionOutcome::Rejected)
    }

    fn decide(
        &self,
        tenant: &TenantId,
        id: &WorkItemId,
        request: DecisionRequest,
        outcome: DecisionOutcome,
    ) -> Result<Decision, ServiceError> {
        let mut item = self.store.work_item(tenant, id)?;
        let decisions = self.store.list_decisions(tenant)?;
        let supersedes = latest_for_work_item(&decisions, id).map(|d| d.id.clone());

        let decision = Decision::new(DecisionInput {
            id: DecisionId::new(),
            tenant_id: tenant.clone(),
            work_item_id: Some(item.id.clone()),
            suggestion_id: None,
            entity: item.entity.clone(),
            outcome,
            strategy: None,
            resolved_field: None,
            resolved_value: None,
            reason_code: request.reason_code,
            comment: request.comment,
            actor: request.actor,
            supersedes,
        })?;
        match outcome {
            DecisionOutcome::Accepted => {
                item.resolve(&format!("Approved: {}", decision.reason_code))?
            }
            _ => item.close(&format!("Rejected: {}", decision.reason_code))?,
        }

        self.store.save_work_item(item.clone())?;
        self.store.append_decision(decision.clone())?;

        self.audit(
            tenant,
            AuditEventType::DecisionLogged,
            AuditObjectType::Decision,
            decision.id.to_string(),
            &decision.actor,
            json!({
                "workItem": item.display_id.as_str(),
                "outcome": decision.outcome.as_str(),
            }),
        )?;
        metrics::counter!("edl_decisions_total", "outcome" => decision.outcome.as_str())
            .increment(1);
        info!(
            tenant = %tenant,
            work_item = %item.display_id,
            outcome = decision.outcome.as_str(),
            "logged decision"
        );
        Ok(decision)
    }

    /// Create a follow-up under a parent item, at most once per
    /// (parent, type) pair.
    ///
    /// Dataset, entity, and evidence references inherit from the parent
    /// when the draft omits them. The audit event is appended only when
    /// an item was actually created; a repeat call returns the existing
    /// item and audits nothing.
    pub fn create_follow_up(
        &self,
        tenant: &TenantId,
        parent_id: &WorkItemId,
        draft: WorkItemDraft,
        actor: &str,
    ) -> Result<FollowUpOutcome, ServiceError> {
        let parent = self.store.work_item(tenant, parent_id)?;

        let dataset = draft.dataset.or(parent.dataset);
        let entity = draft.entity.or_else(|| parent.entity.clone());
        let evidence_ids = if draft.evidence_ids.is_empty() {
            parent.evidence_ids.clone()
        } else {
            draft.evidence_ids
        };
        let conflict_sources = match &draft.details {
            WorkItemDetails::Conflict { sources, .. } => sources.as_slice(),
            WorkItemDetails::General => &[],
        };
        let assignment = assign(&AssignmentRequest {
            item_type: draft.item_type,
            dataset,
            entity_kind: entity.as_ref().map(|e| e.kind),
            evidence_status: None,
            conflict_sources,
        });

        let id = WorkItemId::new();
        let display_id = DisplayId::from_uuid("WI", id.as_uuid());
        let outcome = self.store.create_follow_up(
            tenant,
            parent_id,
            NewWorkItem {
                id,
                display_id,
                tenant_id: tenant.clone(),
                item_type: draft.item_type,
                dataset,
                priority: assignment.priority,
                title: draft.title,
                description: draft.description,
                owner: Some(assignment.owner),
                assignment_reason: Some(assignment.assignment_reason),
                evidence_ids,
                entity,
                // The store stamps the parent link itself.
                parent_id: None,
                details: draft.details,
                sla_hours: draft.sla_hours,
                required_action: draft.required_action,
            },
        )?;

        if outcome.created {
            self.audit(
                tenant,
                AuditEventType::WorkItemCreated,
                AuditObjectType::WorkItem,
                outcome.work_item.id.to_string(),
                actor,
                json!({
                    "displayId": outcome.work_item.display_id.as_str(),
                    "itemType": outcome.work_item.item_type.as_str(),
                    "parent": parent.display_id.as_str(),
                }),
            )?;
            metrics::counter!("edl_follow_ups_total", "result" => "created").increment(1);
            info!(
                tenant = %tenant,
                work_item = %outcome.work_item.display_id,
                parent = %parent.display_id,
                "created follow-up"
            );
        } else {
            metrics::counter!("edl_follow_ups_total", "result" => "existing").increment(1);
        }
        Ok(outcome)
    }

    /// Fetch one work item.
    pub fn work_item(&self, tenant: &TenantId, id: &WorkItemId) -> Result<WorkItem, ServiceError> {
        Ok(self.store.work_item(tenant, id)?)
    }

    /// All work items for the tenant.
    pub fn list_work_items(&self, tenant: &TenantId) -> Result<Vec<WorkItem>, ServiceError> {
        Ok(self.store.list_work_items(tenant)?)
    }

    /// The decision history of one work item, in append order.
    pub fn work_item_decisions(
        &self,
        tenant: &TenantId,
        id: &WorkItemId,
    ) -> Result<Vec<Decision>, ServiceError> {
        let item = self.store.work_item(tenant, id)?;
        let decisions = self.store.list_decisions(tenant)?;
        Ok(decisions_for_work_item(&decisions, &item.id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// All decisions for the tenant, in append order.
    pub fn list_decisions(&self, tenant: &TenantId) -> Result<Vec<Decision>, ServiceError> {
        Ok(self.store.list_decisions(tenant)?)
    }
}
