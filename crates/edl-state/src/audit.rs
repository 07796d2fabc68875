//! # Hash-Chained Audit Trail
//!
//! System-level events (seals, quarantines, work item creation, logged
//! decisions, exports, verification runs) land in an append-only log.
//! Each event commits to its predecessor via `prev_hash`, forming a
//! per-tenant SHA-256 chain: modifying any persisted event invalidates
//! its own hash and every subsequent link, which `verify_chain` detects.
//!
//! ## Security Invariant
//!
//! The event hash is computed over canonical bytes, so two producers
//! serializing the same event always agree on the hash. Metadata with
//! float values is rejected at append time rather than producing an
//! event that cannot be re-verified.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use edl_core::{
    sha256_hex, AuditEventId, AuditEventType, CanonicalBytes, CanonicalizationError, TenantId,
    Timestamp,
};

// ─── Object Types ────────────────────────────────────────────────────

/// The kind of object an audit event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditObjectType {
    Evidence,
    WorkItem,
    Decision,
    Entity,
    Suggestion,
    Package,
    /// The chain itself, for verification-run events.
    AuditChain,
}

impl AuditObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditObjectType::Evidence => "EVIDENCE",
            AuditObjectType::WorkItem => "WORK_ITEM",
            AuditObjectType::Decision => "DECISION",
            AuditObjectType::Entity => "ENTITY",
            AuditObjectType::Suggestion => "SUGGESTION",
            AuditObjectType::Package => "PACKAGE",
            AuditObjectType::AuditChain => "AUDIT_CHAIN",
        }
    }
}

impl std::fmt::Display for AuditObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from audit chain operations.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Metadata could not be canonicalized for hashing.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// An event's `prev_hash` does not match its predecessor.
    #[error("audit chain link broken at sequence {sequence}")]
    BrokenLink {
        /// The sequence number of the event with the bad link.
        sequence: u64,
    },

    /// An event's stored hash does not match its recomputed hash.
    #[error("audit event at sequence {sequence} failed hash verification")]
    TamperedEvent {
        /// The sequence number of the altered event.
        sequence: u64,
    },

    /// Sequence numbers are not contiguous from zero.
    #[error("audit chain sequence gap: expected {expected}, found {actual}")]
    SequenceGap {
        /// The sequence number that should appear next.
        expected: u64,
        /// The sequence number actually found.
        actual: u64,
    },
}

// ─── Audit Event ─────────────────────────────────────────────────────

/// Fields supplied when appending an audit event.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub id: AuditEventId,
    pub tenant_id: TenantId,
    pub event_type: AuditEventType,
    pub object_type: AuditObjectType,
    /// Identifier of the object, in its prefixed display form.
    pub object_id: String,
    pub actor: String,
    /// Context bag. Must canonicalize (no floats).
    pub metadata: Value,
}

/// A single entry in a tenant's audit hash chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event identifier. Not covered by the hash.
    pub id: AuditEventId,
    /// Position in the tenant's chain, starting at 0.
    pub sequence: u64,
    /// Tenant scope. Each tenant has its own chain.
    pub tenant_id: TenantId,
    /// What happened.
    pub event_type: AuditEventType,
    /// The kind of object affected.
    pub object_type: AuditObjectType,
    /// The object's identifier.
    pub object_id: String,
    /// Who triggered the event.
    pub actor: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
    /// Context bag.
    pub metadata: Value,
    /// `this_hash` of the previous event, or [`AuditEvent::GENESIS_HASH`].
    pub prev_hash: String,
    /// SHA-256 (hex) over this event's canonical content.
    pub this_hash: String,
}

/// The hashed fields, in one struct so the canonical layout is explicit.
///
/// The event id is excluded: it identifies the row, not the content.
#[derive(Serialize)]
struct HashView<'a> {
    sequence: u64,
    tenant_id: &'a TenantId,
    event_type: AuditEventType,
    object_type: AuditObjectType,
    object_id: &'a str,
    actor: &'a str,
    occurred_at: Timestamp,
    metadata: &'a Value,
    prev_hash: &'a str,
}

impl AuditEvent {
    /// The sentinel `prev_hash` for the first event in every chain.
    ///
    /// 64 hex zeros — never the SHA-256 of real data, so genesis
    /// detection is unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// Append a new event after `prev` (or start a chain when `None`).
    ///
    /// Assigns the next sequence number, links `prev_hash`, and computes
    /// `this_hash` over the canonical content.
    ///
    /// # Errors
    ///
    /// Fails if the metadata cannot be canonicalized.
    pub fn append(prev: Option<&AuditEvent>, event: NewAuditEvent) -> Result<Self, AuditError> {
        let sequence = prev.map(|p| p.sequence + 1).unwrap_or(0);
        let prev_hash = prev
            .map(|p| p.this_hash.clone())
            .unwrap_or_else(|| Self::GENESIS_HASH.to_string());
        let occurred_at = Timestamp::now();

        let view = HashView {
            sequence,
            tenant_id: &event.tenant_id,
            event_type: event.event_type,
            object_type: event.object_type,
            object_id: &event.object_id,
            actor: &event.actor,
            occurred_at,
            metadata: &event.metadata,
            prev_hash: &prev_hash,
        };
        let this_hash = sha256_hex(&CanonicalBytes::new(&view)?);

        Ok(Self {
            id: event.id,
            sequence,
            tenant_id: event.tenant_id,
            event_type: event.event_type,
            object_type: event.object_type,
            object_id: event.object_id,
            actor: event.actor,
            occurred_at,
            metadata: event.metadata,
            prev_hash,
            this_hash,
        })
    }

    /// Recompute this event's hash from its stored fields.
    pub fn recompute_hash(&self) -> Result<String, AuditError> {
        let view = HashView {
            sequence: self.sequence,
            tenant_id: &self.tenant_id,
            event_type: self.event_type,
            object_type: self.object_type,
            object_id: &self.object_id,
            actor: &self.actor,
            occurred_at: self.occurred_at,
            metadata: &self.metadata,
            prev_hash: &self.prev_hash,
        };
        Ok(sha256_hex(&CanonicalBytes::new(&view)?))
    }
}

/// Verify one tenant's chain: contiguous sequences from zero, intact
/// links, and hashes that recompute to their stored values.
///
/// Returns the number of verified events. The slice must already be
/// filtered to one tenant and sorted by sequence.
pub fn verify_chain(events: &[AuditEvent]) -> Result<u64, AuditError> {
    let mut prev_hash: Option<&str> = None;
    for (i, event) in events.iter().enumerate() {
        let expected_seq = i as u64;
        if event.sequence != expected_seq {
            return Err(AuditError::SequenceGap {
                expected: expected_seq,
                actual: event.sequence,
            });
        }
        let expected_prev = prev_hash.unwrap_or(AuditEvent::GENESIS_HASH);
        if event.prev_hash != expected_prev {
            return Err(AuditError::BrokenLink {
                sequence: event.sequence,
            });
        }
        if event.recompute_hash()? != event.this_hash {
            return Err(AuditError::TamperedEvent {
                sequence: event.sequence,
            });
        }
        prev_hash = Some(&event.this_hash);
    }
    Ok(events.len() as u64)
}

/// The `this_hash` of the chain's last event, a compact commitment to
/// the entire log.
pub fn chain_head(events: &[AuditEvent]) -> Option<&str> {
    events.last().map(|e| e.this_hash.as_str())
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("tenant-demo").unwrap()
    }

    fn new_event(event_type: AuditEventType) -> NewAuditEvent {
        NewAuditEvent {
            id: AuditEventId::new(),
            tenant_id: tenant(),
            event_type,
            object_type: AuditObjectType::Evidence,
            object_id: "evidence:00000000-0000-4000-8000-000000000001".to_string(),
            actor: "system".to_string(),
            metadata: serde_json::json!({"dataset": "SUPPLIER_MASTER"}),
        }
    }

    fn chain_of(n: usize) -> Vec<AuditEvent> {
        let mut events: Vec<AuditEvent> = Vec::new();
        for _ in 0..n {
            let prev = events.last();
            let e = AuditEvent::append(prev, new_event(AuditEventType::EvidenceSealed)).unwrap();
            events.push(e);
        }
        events
    }

    #[test]
    fn genesis_event() {
        let e = AuditEvent::append(None, new_event(AuditEventType::EvidenceSealed)).unwrap();
        assert_eq!(e.sequence, 0);
        assert_eq!(e.prev_hash, AuditEvent::GENESIS_HASH);
        assert_eq!(e.this_hash.len(), 64);
        assert_eq!(verify_chain(&[e]).unwrap(), 1);
    }

    #[test]
    fn chain_links_and_verifies() {
        let events = chain_of(4);
        assert_eq!(events[1].prev_hash, events[0].this_hash);
        assert_eq!(events[3].sequence, 3);
        assert_eq!(verify_chain(&events).unwrap(), 4);
        assert_eq!(chain_head(&events), Some(events[3].this_hash.as_str()));
    }

    #[test]
    fn empty_chain_verifies() {
        assert_eq!(verify_chain(&[]).unwrap(), 0);
        assert_eq!(chain_head(&[]), None);
    }

    #[test]
    fn tampered_metadata_detected() {
        let mut events = chain_of(3);
        events[1].metadata = serde_json::json!({"dataset": "INVOICE"});
        let err = verify_chain(&events).unwrap_err();
        assert!(matches!(err, AuditError::TamperedEvent { sequence: 1 }));
    }

    #[test]
    fn broken_link_detected() {
        let mut events = chain_of(3);
        events[2].prev_hash = AuditEvent::GENESIS_HASH.to_string();
        let err = verify_chain(&events).unwrap_err();
        assert!(matches!(err, AuditError::BrokenLink { sequence: 2 }));
    }

    #[test]
    fn sequence_gap_detected() {
        let mut events = chain_of(3);
        events[2].sequence = 5;
        let err = verify_chain(&events).unwrap_err();
        assert!(matches!(
            err,
            AuditError::SequenceGap {
                expected: 2,
                actual: 5
            }
        ));
    }

    #[test]
    fn float_metadata_rejected() {
        let mut event = new_event(AuditEventType::DecisionLogged);
        event.metadata = serde_json::json!({"confidence": 0.95});
        let err = AuditEvent::append(None, event).unwrap_err();
        assert!(matches!(err, AuditError::Canonicalization(_)));
    }

    #[test]
    fn serde_round_trip_preserves_hashes() {
        let events = chain_of(2);
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<AuditEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(verify_chain(&back).unwrap(), 2);
        assert_eq!(back[1].this_hash, events[1].this_hash);
    }
}
