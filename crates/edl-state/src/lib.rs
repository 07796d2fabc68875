//! # edl-state — Lifecycle State Machines and Records
//!
//! Implements the core record types of the Evidence Decision Ledger and
//! their lifecycles. Where a lifecycle has compile-time-checkable
//! structure, it uses the typestate pattern: each state is a distinct
//! Rust type, transitions are methods that consume the current state and
//! produce the next, and invalid transitions are compile errors rather
//! than runtime checks.
//!
//! ## Modules
//!
//! - **Evidence** (`evidence.rs`): typestate lifecycle
//!   `Draft → ReadyToSeal → Sealed` with `ValidationFailed` retry loop
//!   and `Quarantined` terminal branch. Sealing computes content and
//!   metadata hashes and stamps the retention horizon.
//!
//! - **Work items** (`workitem.rs`): operational follow-up tasks
//!   (`OPEN → IN_PROGRESS → RESOLVED → CLOSED` with a `BLOCKED` detour),
//!   conflict source payloads, and SLA accounting.
//!
//! - **Decisions** (`decision.rs`): append-only decision records with
//!   reason codes, rejection and override comment rules, and
//!   supersession chains.
//!
//! - **Entities** (`entity.rs`): canonical entities with per-field
//!   provenance, mapping status, and readiness derivation, plus mapping
//!   suggestions with a one-shot review.
//!
//! - **Audit** (`audit.rs`): per-tenant hash-chained audit log with
//!   chain verification.
//!
//! ## Design
//!
//! Evidence is the only machine where a skipped step is a structural
//! hazard (an unvalidated seal breaks the hash guarantees), so it gets
//! the full typestate treatment with a `DynEvidence` mirror for storage.
//! Work items stay a runtime-checked enum machine: their transitions are
//! driven by operator input, where a failed transition is an expected
//! outcome, not a programming error.

pub mod audit;
pub mod decision;
pub mod entity;
pub mod evidence;
pub mod workitem;

// ─── Evidence re-exports ────────────────────────────────────────────

pub use evidence::{
    Draft, DynEvidence, Evidence, EvidenceError, EvidenceIntake, EvidenceState, EvidenceStatus,
    Quarantined, ReadyToSeal, ReconciliationStatus, Sealed, TransitionRecord, ValidationFailed,
    ValidationOutcome,
};

// ─── Work item re-exports ───────────────────────────────────────────

pub use workitem::{
    follow_up_key, trust_variance, ConflictSource, NewWorkItem, WorkItem, WorkItemDetails,
    WorkItemError, WorkItemTransition, DEFAULT_OWNER,
};

// ─── Decision re-exports ────────────────────────────────────────────

pub use decision::{
    decisions_for_work_item, latest_for_work_item, Decision, DecisionError, DecisionInput,
};

// ─── Entity re-exports ──────────────────────────────────────────────

pub use entity::{
    CanonicalEntity, CanonicalField, EntityError, EntityRef, MappingSuggestion, SuggestionStatus,
};

// ─── Audit re-exports ───────────────────────────────────────────────

pub use audit::{
    chain_head, verify_chain, AuditError, AuditEvent, AuditObjectType, NewAuditEvent,
};
