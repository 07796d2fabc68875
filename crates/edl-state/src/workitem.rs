//! # Work Item Workflow State Machine
//!
//! Models the lifecycle of a unit of required human action: review,
//! extraction, mapping confirmation, conflict resolution, blocked
//! escalation, or follow-up.
//!
//! ## Statuses
//!
//! ```text
//! Open ──▶ InProgress ──▶ Resolved ──▶ Closed (terminal)
//!  │  │        │  ▲                      ▲
//!  │  │        ▼  │                      │
//!  │  └──▶  Blocked                      │
//!  │                                     │
//!  ├──▶ Resolved (direct)                │
//!  └──▶ Closed ──────────────────────────┘
//! ```
//!
//! ## Design Decision
//!
//! Work items use an enum with validated transitions rather than
//! typestate types. Several transitions are legal from more than one
//! status (blocking, closing), and items are loaded from persistence in
//! arbitrary statuses, so the runtime-checked enum keeps the surface
//! small. Invalid transitions return structured errors naming both
//! statuses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use edl_core::{
    default_sla_hours, sla_remaining_hours, DatasetType, DisplayId, EvidenceId, Priority,
    TenantId, Timestamp, WorkItemId, WorkItemStatus, WorkItemType,
};

use crate::entity::EntityRef;

/// Owner recorded when no routing rule claimed the item.
pub const DEFAULT_OWNER: &str = "Unassigned";

// ─── Conflict Details ────────────────────────────────────────────────

/// One competing value in a field conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSource {
    /// The system that produced the value.
    pub source_system: String,
    /// The value it reported.
    pub value: Value,
    /// Static authority score for the system (0-100).
    pub trust_rank: u8,
}

/// Spread between the most and least trusted competing sources.
///
/// Zero for fewer than two sources.
pub fn trust_variance(sources: &[ConflictSource]) -> u8 {
    let max = sources.iter().map(|s| s.trust_rank).max().unwrap_or(0);
    let min = sources.iter().map(|s| s.trust_rank).min().unwrap_or(0);
    max - min
}

/// Type-specific payload carried by a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemDetails {
    /// No structured payload beyond title and description.
    General,
    /// A field conflict between source systems.
    Conflict {
        /// The disputed canonical field.
        field: String,
        /// The competing values. Always at least two.
        sources: Vec<ConflictSource>,
    },
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from work item operations.
#[derive(Error, Debug)]
pub enum WorkItemError {
    /// Attempted transition is not valid from the current status.
    #[error("invalid work item transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Attempted target status.
        to: String,
    },

    /// The item is closed and accepts no further transitions.
    #[error("work item {id} is closed")]
    Closed {
        /// The work item identifier.
        id: String,
    },

    /// A conflict item must carry at least two competing sources.
    #[error("conflict work item requires at least 2 sources, got {count}")]
    ConflictNeedsSources {
        /// How many sources were supplied.
        count: usize,
    },

    /// Trust ranks are percentages.
    #[error("trust rank must be 0-100, got {value} for source {source_system}")]
    TrustRankOutOfRange {
        /// The offending source system.
        source_system: String,
        /// The rejected rank.
        value: u8,
    },
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a work item status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemTransition {
    /// Status before the transition.
    pub from_status: WorkItemStatus,
    /// Status after the transition.
    pub to_status: WorkItemStatus,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// Reason for the transition.
    pub reason: String,
}

// ─── Creation Parameters ─────────────────────────────────────────────

/// Fields supplied when creating a work item.
///
/// Owner and SLA fall back to defaults when not supplied; the assignment
/// engine usually fills them before the item is stored.
#[derive(Debug, Clone)]
pub struct NewWorkItem {
    pub id: WorkItemId,
    pub display_id: DisplayId,
    pub tenant_id: TenantId,
    pub item_type: WorkItemType,
    /// Dataset, when known at creation. Routing infers it otherwise.
    pub dataset: Option<DatasetType>,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    /// Owning team. Defaults to [`DEFAULT_OWNER`].
    pub owner: Option<String>,
    /// Why routing picked the owner and priority, when routing ran.
    pub assignment_reason: Option<String>,
    pub evidence_ids: Vec<EvidenceId>,
    pub entity: Option<EntityRef>,
    /// Parent item, for follow-ups.
    pub parent_id: Option<WorkItemId>,
    pub details: WorkItemDetails,
    /// SLA window in hours. Defaults from the priority.
    pub sla_hours: Option<u32>,
    /// Short instruction for the assignee.
    pub required_action: Option<String>,
}

// ─── Work Item ───────────────────────────────────────────────────────

/// A unit of required human action with enforced status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique work item identifier.
    pub id: WorkItemId,
    /// Human-facing identifier, e.g. `WI-2024-0042`.
    pub display_id: DisplayId,
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// Classification.
    pub item_type: WorkItemType,
    /// Dataset the item concerns, when known.
    #[serde(default)]
    pub dataset: Option<DatasetType>,
    /// Current status.
    pub status: WorkItemStatus,
    /// Urgency.
    pub priority: Priority,
    /// Short summary.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Owning team or actor.
    pub owner: String,
    /// Why routing picked this owner and priority.
    #[serde(default)]
    pub assignment_reason: Option<String>,
    /// Linked evidence records.
    #[serde(default)]
    pub evidence_ids: Vec<EvidenceId>,
    /// Linked entity, when the item concerns one.
    #[serde(default)]
    pub entity: Option<EntityRef>,
    /// Parent item, for follow-ups.
    #[serde(default)]
    pub parent_id: Option<WorkItemId>,
    /// Type-specific payload.
    pub details: WorkItemDetails,
    /// Short instruction for the assignee.
    #[serde(default)]
    pub required_action: Option<String>,
    /// SLA window in hours.
    pub sla_hours: u32,
    /// When the item was created.
    pub created_at: Timestamp,
    /// When the item was last modified.
    pub updated_at: Timestamp,
    /// When the item was resolved, if it has been.
    #[serde(default)]
    pub resolved_at: Option<Timestamp>,
    /// Ordered log of all status changes.
    #[serde(default)]
    pub transitions: Vec<WorkItemTransition>,
}

impl WorkItem {
    /// Create a work item in OPEN status.
    ///
    /// # Errors
    ///
    /// Conflict items must carry at least two sources, each with a trust
    /// rank of at most 100.
    pub fn new(params: NewWorkItem) -> Result<Self, WorkItemError> {
        if let WorkItemDetails::Conflict { sources, .. } = &params.details {
            if sources.len() < 2 {
                return Err(WorkItemError::ConflictNeedsSources {
                    count: sources.len(),
                });
            }
            for source in sources {
                if source.trust_rank > 100 {
                    return Err(WorkItemError::TrustRankOutOfRange {
                        source_system: source.source_system.clone(),
                        value: source.trust_rank,
                    });
                }
            }
        }
        let now = Timestamp::now();
        let sla_hours = params
            .sla_hours
            .unwrap_or_else(|| default_sla_hours(params.priority));
        Ok(Self {
            id: params.id,
            display_id: params.display_id,
            tenant_id: params.tenant_id,
            item_type: params.item_type,
            dataset: params.dataset,
            status: WorkItemStatus::Open,
            priority: params.priority,
            title: params.title,
            description: params.description,
            owner: params.owner.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            assignment_reason: params.assignment_reason,
            evidence_ids: params.evidence_ids,
            entity: params.entity,
            parent_id: params.parent_id,
            details: params.details,
            required_action: params.required_action,
            sla_hours,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            transitions: Vec::new(),
        })
    }

    /// Begin work (OPEN → IN_PROGRESS).
    pub fn start(&mut self, reason: &str) -> Result<(), WorkItemError> {
        self.require_any(&[WorkItemStatus::Open], WorkItemStatus::InProgress)?;
        self.do_transition(WorkItemStatus::InProgress, reason);
        Ok(())
    }

    /// Block on an external dependency (OPEN | IN_PROGRESS → BLOCKED).
    pub fn block(&mut self, reason: &str) -> Result<(), WorkItemError> {
        self.require_any(
            &[WorkItemStatus::Open, WorkItemStatus::InProgress],
            WorkItemStatus::Blocked,
        )?;
        self.do_transition(WorkItemStatus::Blocked, reason);
        Ok(())
    }

    /// Resume blocked work (BLOCKED → IN_PROGRESS).
    pub fn unblock(&mut self, reason: &str) -> Result<(), WorkItemError> {
        self.require_any(&[WorkItemStatus::Blocked], WorkItemStatus::InProgress)?;
        self.do_transition(WorkItemStatus::InProgress, reason);
        Ok(())
    }

    /// Resolve the item (OPEN | IN_PROGRESS → RESOLVED).
    ///
    /// Open items may resolve directly; not every item needs an explicit
    /// start.
    pub fn resolve(&mut self, reason: &str) -> Result<(), WorkItemError> {
        self.require_any(
            &[WorkItemStatus::Open, WorkItemStatus::InProgress],
            WorkItemStatus::Resolved,
        )?;
        self.do_transition(WorkItemStatus::Resolved, reason);
        self.resolved_at = Some(self.updated_at);
        Ok(())
    }

    /// Close the item (OPEN | IN_PROGRESS | RESOLVED → CLOSED). Terminal.
    pub fn close(&mut self, reason: &str) -> Result<(), WorkItemError> {
        self.require_any(
            &[
                WorkItemStatus::Open,
                WorkItemStatus::InProgress,
                WorkItemStatus::Resolved,
            ],
            WorkItemStatus::Closed,
        )?;
        self.do_transition(WorkItemStatus::Closed, reason);
        Ok(())
    }

    /// Hours remaining in the SLA window at `now`, clamped at zero.
    pub fn sla_remaining(&self, now: &Timestamp) -> u32 {
        sla_remaining_hours(self.sla_hours, &self.created_at, now)
    }

    /// The conflict field and sources, when this is a conflict item.
    pub fn conflict_sources(&self) -> Option<(&str, &[ConflictSource])> {
        match &self.details {
            WorkItemDetails::Conflict { field, sources } => Some((field, sources)),
            WorkItemDetails::General => None,
        }
    }

    /// Whether the item accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Validate that the current status allows a transition to `target`.
    fn require_any(
        &self,
        allowed: &[WorkItemStatus],
        target: WorkItemStatus,
    ) -> Result<(), WorkItemError> {
        if self.status.is_terminal() {
            return Err(WorkItemError::Closed {
                id: self.id.to_string(),
            });
        }
        if !allowed.contains(&self.status) {
            return Err(WorkItemError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    /// Record a status change.
    fn do_transition(&mut self, to: WorkItemStatus, reason: &str) {
        let now = Timestamp::now();
        self.transitions.push(WorkItemTransition {
            from_status: self.status,
            to_status: to,
            timestamp: now,
            reason: reason.to_string(),
        });
        self.status = to;
        self.updated_at = now;
    }
}

/// Idempotency key guarding follow-up creation.
///
/// At most one follow-up of a given type may exist per parent item; the
/// store checks this key before creating.
pub fn follow_up_key(parent: &WorkItemId, item_type: WorkItemType) -> String {
    format!("FOLLOW_UP:{}:{}", parent.as_uuid(), item_type.as_str())
}

// ─── Tests ───────────────────────────────────────────────────────────
