//! # Append-Only Decision Records
//!
//! Every human or system action on a work item or mapping suggestion
//! produces a decision record. Decisions are never mutated or deleted;
//! a later decision on the same work item points back at the one it
//! supersedes, so the full review history stays reconstructible.
//!
//! Validation happens at construction: a `Decision` that violates the
//! comment or override rules cannot exist.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use edl_core::{
    ConflictStrategy, DecisionId, DecisionOutcome, SuggestionId, TenantId, Timestamp, WorkItemId,
};

use crate::entity::EntityRef;

// ─── Errors ──────────────────────────────────────────────────────────

/// Validation errors raised when building a decision.
#[derive(Error, Debug)]
pub enum DecisionError {
    /// Every decision must carry a reason code.
    #[error("a reason code is required")]
    MissingReasonCode,

    /// Rejections must explain themselves.
    #[error("a comment is required when the outcome is {outcome}")]
    CommentRequired {
        /// The outcome that demands a comment.
        outcome: String,
    },

    /// Manual overrides must supply the value to write.
    #[error("manual override requires a non-empty override value")]
    OverrideValueRequired,

    /// Manual overrides must explain themselves.
    #[error("manual override requires a comment")]
    OverrideCommentRequired,
}

// ─── Decision ────────────────────────────────────────────────────────

/// Fields supplied when logging a decision.
#[derive(Debug, Clone)]
pub struct DecisionInput {
    pub id: DecisionId,
    pub tenant_id: TenantId,
    /// The work item acted on, when the decision concerns one.
    pub work_item_id: Option<WorkItemId>,
    /// The mapping suggestion acted on, for mapping decisions.
    pub suggestion_id: Option<SuggestionId>,
    /// The entity affected, when known.
    pub entity: Option<EntityRef>,
    pub outcome: DecisionOutcome,
    /// The strategy used, for conflict resolutions.
    pub strategy: Option<ConflictStrategy>,
    /// The canonical field written, for conflict resolutions.
    pub resolved_field: Option<String>,
    /// The value selected or supplied.
    pub resolved_value: Option<Value>,
    /// Machine-readable reason code. Always required.
    pub reason_code: String,
    /// Free-text comment. Required for rejections and manual overrides.
    pub comment: Option<String>,
    /// Who decided.
    pub actor: String,
    /// The previous latest decision on the same work item, if any.
    pub supersedes: Option<DecisionId>,
}

/// An immutable record of one decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Unique decision identifier.
    pub id: DecisionId,
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// The work item acted on.
    #[serde(default)]
    pub work_item_id: Option<WorkItemId>,
    /// The mapping suggestion acted on.
    #[serde(default)]
    pub suggestion_id: Option<SuggestionId>,
    /// The entity affected.
    #[serde(default)]
    pub entity: Option<EntityRef>,
    /// What was decided.
    pub outcome: DecisionOutcome,
    /// Conflict strategy, for conflict resolutions.
    #[serde(default)]
    pub strategy: Option<ConflictStrategy>,
    /// Canonical field written, for conflict resolutions.
    #[serde(default)]
    pub resolved_field: Option<String>,
    /// Value selected or supplied.
    #[serde(default)]
    pub resolved_value: Option<Value>,
    /// Machine-readable reason code.
    pub reason_code: String,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Who decided.
    pub actor: String,
    /// When the decision was logged.
    pub decided_at: Timestamp,
    /// The decision this one supersedes, if any.
    #[serde(default)]
    pub supersedes: Option<DecisionId>,
}

/// True when a value is present and not an empty placeholder.
fn is_substantive(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl Decision {
    /// Validate and build a decision record.
    ///
    /// # Errors
    ///
    /// - the reason code is empty;
    /// - the outcome is a rejection and no comment was given;
    /// - the strategy is MANUAL_OVERRIDE without a non-empty value and a
    ///   comment.
    pub fn new(input: DecisionInput) -> Result<Self, DecisionError> {
        if input.reason_code.trim().is_empty() {
            return Err(DecisionError::MissingReasonCode);
        }
        let is_rejection = matches!(
            input.outcome,
            DecisionOutcome::Rejected | DecisionOutcome::MappingRejected
        );
        if is_rejection && !has_text(&input.comment) {
            return Err(DecisionError::CommentRequired {
                outcome: input.outcome.to_string(),
            });
        }
        if input.strategy == Some(ConflictStrategy::ManualOverride) {
            match &input.resolved_value {
                Some(v) if is_substantive(v) => {}
                _ => return Err(DecisionError::OverrideValueRequired),
            }
            if !has_text(&input.comment) {
                return Err(DecisionError::OverrideCommentRequired);
            }
        }
        Ok(Self {
            id: input.id,
            tenant_id: input.tenant_id,
            work_item_id: input.work_item_id,
            suggestion_id: input.suggestion_id,
            entity: input.entity,
            outcome: input.outcome,
            strategy: input.strategy,
            resolved_field: input.resolved_field,
            resolved_value: input.resolved_value,
            reason_code: input.reason_code,
            comment: input.comment,
            actor: input.actor,
            decided_at: Timestamp::now(),
            supersedes: input.supersedes,
        })
    }
}

/// All decisions for one work item, in append order.
pub fn decisions_for_work_item<'a>(
    decisions: &'a [Decision],
    work_item: &WorkItemId,
) -> Vec<&'a Decision> {
    decisions
        .iter()
        .filter(|d| d.work_item_id.as_ref() == Some(work_item))
        .collect()
}

/// The most recently appended decision for a work item.
///
/// New decisions set their `supersedes` pointer to this one's id.
pub fn latest_for_work_item<'a>(
    decisions: &'a [Decision],
    work_item: &WorkItemId,
) -> Option<&'a Decision> {
    decisions
        .iter()
        .rev()
        .find(|d| d.work_item_id.as_ref() == Some(work_item))
}

// ─── Tests ───────────────────────────────────────────────────────────
