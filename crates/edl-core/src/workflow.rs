//! # Workflow Vocabulary — Work Items, Decisions, Audit Events
//!
//! Closed enums for the human workflow side of the ledger. Transition
//! legality for `WorkItemStatus` is enforced by the state machine in the
//! state crate; this module only defines the names and their ordering.

use serde::{Deserialize, Serialize};

/// Classification of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemType {
    /// Human review of a flagged or quarantined record.
    Review,
    /// Field extraction from an unstructured document.
    Extraction,
    /// Entity-to-target-system mapping confirmation.
    Mapping,
    /// Contradictory values from multiple source systems.
    Conflict,
    /// Progress blocked on an external dependency.
    Blocked,
    /// Deferred follow-up spawned from another work item.
    FollowUp,
}

impl WorkItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemType::Review => "REVIEW",
            WorkItemType::Extraction => "EXTRACTION",
            WorkItemType::Mapping => "MAPPING",
            WorkItemType::Conflict => "CONFLICT",
            WorkItemType::Blocked => "BLOCKED",
            WorkItemType::FollowUp => "FOLLOW_UP",
        }
    }
}

/// Lifecycle state of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemStatus {
    Open,
    InProgress,
    Blocked,
    Resolved,
    Closed,
}

impl WorkItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemStatus::Open => "OPEN",
            WorkItemStatus::InProgress => "IN_PROGRESS",
            WorkItemStatus::Blocked => "BLOCKED",
            WorkItemStatus::Resolved => "RESOLVED",
            WorkItemStatus::Closed => "CLOSED",
        }
    }

    /// Closed items accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkItemStatus::Closed)
    }
}

/// Urgency of a work item. Variant order is severity order, so
/// `Priority::Low < Priority::Critical` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }

    /// One step up the severity ladder, saturating at `Critical`.
    pub fn bump(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Critical,
            Priority::Critical => Priority::Critical,
        }
    }
}

/// How a conflict between source systems is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictStrategy {
    /// Take the first source's value verbatim.
    PreferSourceA,
    /// Take the second source's value verbatim.
    PreferSourceB,
    /// Take the value from the source with the highest trust rank.
    PreferTrustedSystem,
    /// Operator supplies the value directly; requires a comment.
    ManualOverride,
}

impl ConflictStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictStrategy::PreferSourceA => "PREFER_SOURCE_A",
            ConflictStrategy::PreferSourceB => "PREFER_SOURCE_B",
            ConflictStrategy::PreferTrustedSystem => "PREFER_TRUSTED_SYSTEM",
            ConflictStrategy::ManualOverride => "MANUAL_OVERRIDE",
        }
    }
}

/// Outcome recorded on an appended decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    Accepted,
    Rejected,
    ConflictResolved,
    MappingApproved,
    MappingRejected,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Accepted => "ACCEPTED",
            DecisionOutcome::Rejected => "REJECTED",
            DecisionOutcome::ConflictResolved => "CONFLICT_RESOLVED",
            DecisionOutcome::MappingApproved => "MAPPING_APPROVED",
            DecisionOutcome::MappingRejected => "MAPPING_REJECTED",
        }
    }
}

/// Category of an audit trail event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    EvidenceSealed,
    EvidenceQuarantined,
    WorkItemCreated,
    DecisionLogged,
    PackageExported,
    HashVerification,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::EvidenceSealed => "EVIDENCE_SEALED",
            AuditEventType::EvidenceQuarantined => "EVIDENCE_QUARANTINED",
            AuditEventType::WorkItemCreated => "WORK_ITEM_CREATED",
            AuditEventType::DecisionLogged => "DECISION_LOGGED",
            AuditEventType::PackageExported => "PACKAGE_EXPORTED",
            AuditEventType::HashVerification => "HASH_VERIFICATION",
        }
    }
}

impl std::fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_severity_order() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn bump_saturates_at_critical() {
        assert_eq!(Priority::Low.bump(), Priority::Medium);
        assert_eq!(Priority::Medium.bump(), Priority::High);
        assert_eq!(Priority::High.bump(), Priority::Critical);
        assert_eq!(Priority::Critical.bump(), Priority::Critical);
    }

    #[test]
    fn only_closed_is_terminal() {
        assert!(WorkItemStatus::Closed.is_terminal());
        for status in [
            WorkItemStatus::Open,
            WorkItemStatus::InProgress,
            WorkItemStatus::Blocked,
            WorkItemStatus::Resolved,
        ] {
            assert!(!status.is_terminal(), "{status} must not be terminal");
        }
    }

    #[test]
    fn follow_up_wire_name() {
        // The idempotency key format depends on this exact string.
        assert_eq!(WorkItemType::FollowUp.as_str(), "FOLLOW_UP");
        assert_eq!(
            serde_json::to_string(&WorkItemType::FollowUp).unwrap(),
            "\"FOLLOW_UP\""
        );
    }

    #[test]
    fn strategy_and_outcome_round_trip() {
        let s: ConflictStrategy = serde_json::from_str("\"PREFER_TRUSTED_SYSTEM\"").unwrap();
        assert_eq!(s, ConflictStrategy::PreferTrustedSystem);
        let o: DecisionOutcome = serde_json::from_str("\"CONFLICT_RESOLVED\"").unwrap();
        assert_eq!(o, DecisionOutcome::ConflictResolved);
    }

    #[test]
    fn audit_event_types_serialize_screaming() {
        assert_eq!(
            serde_json::to_string(&AuditEventType::HashVerification).unwrap(),
            "\"HASH_VERIFICATION\""
        );
    }
}
