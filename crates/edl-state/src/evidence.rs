//! # Evidence Sealing Typestate Machine
//!
//! Implements the evidence lifecycle using the typestate pattern.
//! Each state is a distinct type — invalid transitions are compile errors.
//!
//! ## States
//!
//! - `Draft` → mutable staging record produced by ingestion.
//! - `ReadyToSeal` → validation passed, awaiting the seal action.
//! - `ValidationFailed` → validation found problems; payload may be fixed
//!   and revalidated.
//! - `Quarantined` → pulled from the flow for human review (terminal).
//! - `Sealed` → immutable record with computed hashes (terminal).
//!
//! ## Allowed Transitions
//!
//! ```text
//! Draft ──validate()──▶ ReadyToSeal ──seal()──▶ Sealed
//!   │                     │      ▲
//!   │                     │      │ revalidate()
//!   ▼                     ▼      │
//! ValidationFailed ◀──────┘      │
//!   │        │───────────────────┘
//!   │        └──quarantine()──▶ Quarantined ◀──quarantine()── (any pre-seal)
//!   └──quarantine()──▶ Quarantined
//! ```
//!
//! ## Security Invariant
//!
//! Sealed evidence is immutable by construction: `Evidence<Sealed>` has no
//! payload mutator and no outgoing transition. The content and metadata
//! hashes are computed exactly once, inside `seal()`, from canonical
//! bytes. Binding a sealed record to an entity updates only the
//! reconciliation status; the hashed fields cannot change.
//!
//! ## Compile-Time Safety Example
//!
//! The following does NOT compile because `Evidence<Draft>` has no
//! `.seal()` method — a draft must pass validation first:
//!
//! ```compile_fail
//! use edl_core::{DatasetType, DisplayId, EvidenceId, IngestionMethod, TenantId};
//! use edl_state::evidence::{Draft, Evidence, EvidenceIntake};
//!
//! let draft = Evidence::<Draft>::new(EvidenceIntake {
//!     id: EvidenceId::new(),
//!     display_id: DisplayId::new("EV-2024-0001"),
//!     tenant_id: TenantId::new("tenant-demo").unwrap(),
//!     dataset: DatasetType::SupplierMaster,
//!     ingestion_method: IngestionMethod::Upload,
//!     source_system: "SAP".into(),
//!     ingested_by: "ops@example.com".into(),
//!     payload: serde_json::json!({"name": "ACME"}),
//!     entity: None,
//! });
//! // ERROR: no method named `seal` found for `Evidence<Draft>`
//! let _sealed = draft.seal("ops@example.com");
//! ```

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use edl_core::{
    retention_end, sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest,
    DatasetType, DisplayId, EvidenceId, IngestionMethod, TenantId, Timestamp,
};

use crate::entity::EntityRef;

// ─── State Types (each is a distinct type at compile time) ───────────

/// Evidence state: mutable staging record from ingestion.
#[derive(Debug, Clone, Copy)]
pub struct Draft;

/// Evidence state: validation passed, awaiting seal.
#[derive(Debug, Clone, Copy)]
pub struct ReadyToSeal;

/// Evidence state: validation found problems.
#[derive(Debug, Clone, Copy)]
pub struct ValidationFailed;

/// Evidence state: pulled for human review (terminal).
#[derive(Debug, Clone, Copy)]
pub struct Quarantined;

/// Evidence state: immutable sealed record (terminal).
#[derive(Debug, Clone, Copy)]
pub struct Sealed;

// ─── State Marker Trait ──────────────────────────────────────────────

mod private {
    pub trait Marker {}
    impl Marker for super::Draft {}
    impl Marker for super::ReadyToSeal {}
    impl Marker for super::ValidationFailed {}
    impl Marker for super::Quarantined {}
    impl Marker for super::Sealed {}
}

/// Marker trait for all valid evidence states.
///
/// Only the five states defined in this module implement it. External
/// crates cannot add new states.
pub trait EvidenceState: private::Marker + std::fmt::Debug {
    /// The canonical string name of this state (e.g., "DRAFT").
    fn name() -> &'static str;

    /// Whether this state is terminal (no further transitions allowed).
    fn is_terminal() -> bool {
        false
    }
}

impl EvidenceState for Draft {
    fn name() -> &'static str {
        "DRAFT"
    }
}
impl EvidenceState for ReadyToSeal {
    fn name() -> &'static str {
        "READY_TO_SEAL"
    }
}
impl EvidenceState for ValidationFailed {
    fn name() -> &'static str {
        "VALIDATION_FAILED"
    }
}
impl EvidenceState for Quarantined {
    fn name() -> &'static str {
        "QUARANTINED"
    }
    fn is_terminal() -> bool {
        true
    }
}
impl EvidenceState for Sealed {
    fn name() -> &'static str {
        "SEALED"
    }
    fn is_terminal() -> bool {
        true
    }
}

// ─── Reconciliation ──────────────────────────────────────────────────

/// Whether sealed evidence has been bound to a canonical entity.
///
/// Evidence may seal while unbound. Binding happens later, through
/// mapping review, without reopening the sealed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationStatus {
    /// No entity binding yet.
    Unbound,
    /// Bound to a canonical entity.
    Bound {
        /// The bound entity reference.
        entity: EntityRef,
    },
}

impl ReconciliationStatus {
    pub fn is_bound(&self) -> bool {
        matches!(self, ReconciliationStatus::Bound { .. })
    }
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a single state transition in the evidence lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: String,
    /// State after the transition.
    pub to_state: String,
    /// When the transition occurred (UTC).
    pub timestamp: Timestamp,
    /// Human-readable reason for the transition.
    pub reason: String,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors that can occur during evidence operations.
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Attempted transition is not allowed by the state machine.
    #[error("invalid evidence transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// A typed view was requested for evidence in a different state.
    #[error("evidence {id} is {actual}, expected {expected}")]
    UnexpectedStatus {
        /// The evidence identifier.
        id: String,
        /// The state required by the caller.
        expected: String,
        /// The state the record is actually in.
        actual: String,
    },

    /// The sealed record is already bound to an entity.
    #[error("evidence {id} is already bound to an entity")]
    AlreadyBound {
        /// The evidence identifier.
        id: String,
    },

    /// A sealed record is missing its hash fields.
    #[error("evidence {id} is sealed but carries no {kind} hash")]
    MissingHash {
        /// The evidence identifier.
        id: String,
        /// Which hash is missing ("content" or "metadata").
        kind: &'static str,
    },

    /// Recomputed hash does not match the stored hash.
    #[error("evidence {id} failed {kind} hash verification: stored {stored}, computed {computed}")]
    HashMismatch {
        /// The evidence identifier.
        id: String,
        /// Which hash mismatched ("content" or "metadata").
        kind: &'static str,
        /// The hash recorded at seal time.
        stored: String,
        /// The hash computed from the current payload.
        computed: String,
    },

    /// Payload could not be canonicalized for hashing.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// Retention policy arithmetic failed.
    #[error("retention policy error: {0}")]
    Policy(String),
}

// ─── Validation ──────────────────────────────────────────────────────

/// Outcome of validating a draft: the evidence moves to one of two
/// states, carried in the matching variant.
#[derive(Debug)]
pub enum ValidationOutcome {
    /// Validation passed; the evidence is ready to seal.
    Valid(Evidence<ReadyToSeal>),
    /// Validation failed; the error list is on `validation_errors`.
    Invalid(Evidence<ValidationFailed>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

// ─── Intake ──────────────────────────────────────────────────────────

/// Fields supplied by the ingestion action that creates a draft.
#[derive(Debug, Clone)]
pub struct EvidenceIntake {
    pub id: EvidenceId,
    pub display_id: DisplayId,
    pub tenant_id: TenantId,
    pub dataset: DatasetType,
    pub ingestion_method: IngestionMethod,
    pub source_system: String,
    pub ingested_by: String,
    pub payload: Value,
    /// Entity binding, when already known at ingestion time.
    pub entity: Option<EntityRef>,
}

// ─── The Evidence Record ─────────────────────────────────────────────

/// An evidence record parameterized by its lifecycle state.
///
/// Only state-appropriate methods are available at compile time.
/// `Evidence<Draft>` has `.validate()` but not `.seal()`.
/// `Evidence<Sealed>` has `.verify_integrity()` and `.bind_entity()` but
/// no payload mutator.
#[derive(Debug)]
pub struct Evidence<S: EvidenceState> {
    /// Unique evidence identifier.
    pub id: EvidenceId,
    /// Human-facing identifier, e.g. `EV-2024-0001`.
    pub display_id: DisplayId,
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// Dataset this evidence belongs to.
    pub dataset: DatasetType,
    /// How the evidence entered the system.
    pub ingestion_method: IngestionMethod,
    /// Source system the payload came from.
    pub source_system: String,
    /// Actor who performed the ingestion.
    pub ingested_by: String,
    /// When the evidence was ingested.
    pub ingested_at: Timestamp,
    /// The raw payload. Mutable only pre-seal.
    pub payload: Value,
    /// Errors from the most recent validation run.
    pub validation_errors: Vec<String>,
    /// Reason recorded when the evidence was quarantined.
    pub quarantine_reason: Option<String>,
    /// SHA-256 over the canonical payload, computed at seal time.
    pub content_hash: Option<ContentDigest>,
    /// SHA-256 over the canonical ingestion metadata, computed at seal time.
    pub metadata_hash: Option<ContentDigest>,
    /// When the evidence was sealed.
    pub sealed_at: Option<Timestamp>,
    /// Actor who sealed the evidence.
    pub sealed_by: Option<String>,
    /// End of the retention window (ingestion plus seven years).
    pub retention_until: Option<Timestamp>,
    /// Entity binding status.
    pub reconciliation: ReconciliationStatus,
    /// Immutable log of all state transitions.
    transition_log: Vec<TransitionRecord>,
    _state: PhantomData<S>,
}

/// The metadata fields covered by the metadata hash.
///
/// Reconciliation status is deliberately excluded: binding an entity
/// after sealing must not invalidate the metadata digest.
#[derive(Serialize)]
struct MetadataView<'a> {
    tenant_id: &'a TenantId,
    dataset: DatasetType,
    source_system: &'a str,
    ingested_by: &'a str,
    ingestion_method: IngestionMethod,
    ingested_at: Timestamp,
}

impl<S: EvidenceState> Evidence<S> {
    /// Returns the canonical state name (e.g., "DRAFT", "SEALED").
    pub fn state_name(&self) -> &'static str {
        S::name()
    }

    /// Whether the evidence is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        S::is_terminal()
    }

    /// Access the immutable transition log.
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }

    /// Number of transitions that have occurred.
    pub fn transition_count(&self) -> usize {
        self.transition_log.len()
    }

    /// Run the required-field checks against the current payload.
    ///
    /// Returns the full error list; an empty list means the draft may
    /// proceed to seal.
    fn run_validation(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.source_system.trim().is_empty() {
            errors.push("source_system must not be empty".to_string());
        }
        if self.ingested_by.trim().is_empty() {
            errors.push("ingested_by must not be empty".to_string());
        }
        match self.payload.as_object() {
            None => errors.push("payload must be a JSON object".to_string()),
            Some(map) if map.is_empty() => {
                errors.push("payload must not be empty".to_string());
            }
            Some(_) => {
                if let Err(e) = CanonicalBytes::new(&self.payload) {
                    errors.push(format!("payload is not canonicalizable: {e}"));
                }
            }
        }
        errors
    }

    /// Helper to record a transition and produce a new typed record.
    fn transition_to<T: EvidenceState>(mut self, reason: String) -> Evidence<T> {
        self.transition_log.push(TransitionRecord {
            from_state: S::name().to_string(),
            to_state: T::name().to_string(),
            timestamp: Timestamp::now(),
            reason,
        });
        Evidence {
            id: self.id,
            display_id: self.display_id,
            tenant_id: self.tenant_id,
            dataset: self.dataset,
            ingestion_method: self.ingestion_method,
            source_system: self.source_system,
            ingested_by: self.ingested_by,
            ingested_at: self.ingested_at,
            payload: self.payload,
            validation_errors: self.validation_errors,
            quarantine_reason: self.quarantine_reason,
            content_hash: self.content_hash,
            metadata_hash: self.metadata_hash,
            sealed_at: self.sealed_at,
            sealed_by: self.sealed_by,
            retention_until: self.retention_until,
            reconciliation: self.reconciliation,
            transition_log: self.transition_log,
            _state: PhantomData,
        }
    }
}

// ─── State-Specific Impl Blocks ──────────────────────────────────────

impl Evidence<Draft> {
    /// Create a new draft from an ingestion action.
    ///
    /// The draft starts with an empty transition log. Creation itself is
    /// not recorded as a transition — the first transition is the
    /// validation outcome.
    pub fn new(intake: EvidenceIntake) -> Self {
        let reconciliation = match intake.entity {
            Some(entity) => ReconciliationStatus::Bound { entity },
            None => ReconciliationStatus::Unbound,
        };
        Self {
            id: intake.id,
            display_id: intake.display_id,
            tenant_id: intake.tenant_id,
            dataset: intake.dataset,
            ingestion_method: intake.ingestion_method,
            source_system: intake.source_system,
            ingested_by: intake.ingested_by,
            ingested_at: Timestamp::now(),
            payload: intake.payload,
            validation_errors: Vec::new(),
            quarantine_reason: None,
            content_hash: None,
            metadata_hash: None,
            sealed_at: None,
            sealed_by: None,
            retention_until: None,
            reconciliation,
            transition_log: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Replace the draft payload. Drafts are mutable until sealed.
    pub fn update_payload(&mut self, payload: Value) {
        self.payload = payload;
    }

    /// Validate the draft (DRAFT → READY_TO_SEAL | VALIDATION_FAILED).
    ///
    /// Recomputes the required-field checks from scratch; the outcome
    /// carries the evidence in its new state.
    pub fn validate(mut self) -> ValidationOutcome {
        let errors = self.run_validation();
        if errors.is_empty() {
            self.validation_errors.clear();
            ValidationOutcome::Valid(self.transition_to("Validation passed".to_string()))
        } else {
            let count = errors.len();
            self.validation_errors = errors;
            ValidationOutcome::Invalid(
                self.transition_to(format!("Validation failed with {count} error(s)")),
            )
        }
    }

    /// Quarantine the draft for human review (DRAFT → QUARANTINED).
    pub fn quarantine(mut self, reason: &str) -> Evidence<Quarantined> {
        self.quarantine_reason = Some(reason.to_string());
        self.transition_to(format!("Quarantined: {reason}"))
    }
}

impl Evidence<ReadyToSeal> {
    /// Seal the evidence (READY_TO_SEAL → SEALED).
    ///
    /// Computes the content hash over the canonical payload, the metadata
    /// hash over the canonical ingestion metadata, stamps the seal actor
    /// and time, and fixes the retention horizon at ingestion plus seven
    /// years. After this the record is immutable.
    pub fn seal(mut self, sealed_by: &str) -> Result<Evidence<Sealed>, EvidenceError> {
        let payload_bytes = CanonicalBytes::new(&self.payload)?;
        let metadata_bytes = CanonicalBytes::new(&MetadataView {
            tenant_id: &self.tenant_id,
            dataset: self.dataset,
            source_system: &self.source_system,
            ingested_by: &self.ingested_by,
            ingestion_method: self.ingestion_method,
            ingested_at: self.ingested_at,
        })?;
        self.content_hash = Some(sha256_digest(&payload_bytes));
        self.metadata_hash = Some(sha256_digest(&metadata_bytes));
        self.sealed_at = Some(Timestamp::now());
        self.sealed_by = Some(sealed_by.to_string());
        self.retention_until =
            Some(retention_end(&self.ingested_at).map_err(|e| EvidenceError::Policy(e.to_string()))?);
        Ok(self.transition_to(format!("Sealed by {sealed_by}")))
    }

    /// Quarantine before sealing (READY_TO_SEAL → QUARANTINED).
    pub fn quarantine(mut self, reason: &str) -> Evidence<Quarantined> {
        self.quarantine_reason = Some(reason.to_string());
        self.transition_to(format!("Quarantined: {reason}"))
    }
}

impl Evidence<ValidationFailed> {
    /// Replace the payload ahead of revalidation.
    pub fn update_payload(&mut self, payload: Value) {
        self.payload = payload;
    }

    /// Re-run validation after a fix (VALIDATION_FAILED → READY_TO_SEAL
    /// | VALIDATION_FAILED).
    pub fn revalidate(mut self) -> ValidationOutcome {
        let errors = self.run_validation();
        if errors.is_empty() {
            self.validation_errors.clear();
            ValidationOutcome::Valid(self.transition_to("Revalidation passed".to_string()))
        } else {
            let count = errors.len();
            self.validation_errors = errors;
            ValidationOutcome::Invalid(
                self.transition_to(format!("Revalidation failed with {count} error(s)")),
            )
        }
    }

    /// Quarantine after failed validation (VALIDATION_FAILED → QUARANTINED).
    pub fn quarantine(mut self, reason: &str) -> Evidence<Quarantined> {
        self.quarantine_reason = Some(reason.to_string());
        self.transition_to(format!("Quarantined: {reason}"))
    }
}

impl Evidence<Sealed> {
    /// Bind the sealed record to a canonical entity (UNBOUND → BOUND).
    ///
    /// Allowed exactly once. Binding does not touch any hashed field, so
    /// the seal stays intact.
    pub fn bind_entity(&mut self, entity: EntityRef) -> Result<(), EvidenceError> {
        if self.reconciliation.is_bound() {
            return Err(EvidenceError::AlreadyBound {
                id: self.id.to_string(),
            });
        }
        self.reconciliation = ReconciliationStatus::Bound { entity };
        Ok(())
    }

    /// Recompute both hashes from the current fields and compare against
    /// the stored values.
    ///
    /// A mismatch means the persisted record was altered after sealing.
    pub fn verify_integrity(&self) -> Result<(), EvidenceError> {
        let stored_content = self.content_hash.as_ref().ok_or(EvidenceError::MissingHash {
            id: self.id.to_string(),
            kind: "content",
        })?;
        let payload_bytes = CanonicalBytes::new(&self.payload)?;
        let computed_content = sha256_digest(&payload_bytes);
        if &computed_content != stored_content {
            return Err(EvidenceError::HashMismatch {
                id: self.id.to_string(),
                kind: "content",
                stored: stored_content.to_hex(),
                computed: computed_content.to_hex(),
            });
        }

        let stored_metadata = self.metadata_hash.as_ref().ok_or(EvidenceError::MissingHash {
            id: self.id.to_string(),
            kind: "metadata",
        })?;
        let metadata_bytes = CanonicalBytes::new(&MetadataView {
            tenant_id: &self.tenant_id,
            dataset: self.dataset,
            source_system: &self.source_system,
            ingested_by: &self.ingested_by,
            ingestion_method: self.ingestion_method,
            ingested_at: self.ingested_at,
        })?;
        let computed_metadata = sha256_digest(&metadata_bytes);
        if &computed_metadata != stored_metadata {
            return Err(EvidenceError::HashMismatch {
                id: self.id.to_string(),
                kind: "metadata",
                stored: stored_metadata.to_hex(),
                computed: computed_metadata.to_hex(),
            });
        }
        Ok(())
    }
}

// ─── DynEvidence — Runtime State for Persistence ─────────────────────

/// Runtime representation of the evidence state for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceStatus {
    /// Mutable staging record.
    Draft,
    /// Validation passed, awaiting seal.
    ReadyToSeal,
    /// Validation found problems.
    ValidationFailed,
    /// Pulled for human review.
    Quarantined,
    /// Immutable sealed record.
    Sealed,
}

impl EvidenceStatus {
    /// Returns the canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::ReadyToSeal => "READY_TO_SEAL",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Quarantined => "QUARANTINED",
            Self::Sealed => "SEALED",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Quarantined | Self::Sealed)
    }
}

impl std::fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Dynamic evidence record for persistence and API serialization, when
/// the state is not known at compile time.
///
/// Runtime-checked transitions via [`DynEvidence::try_transition()`]
/// mirror the compile-time table. For in-memory flows, prefer the
/// typestate API and downcast with `TryFrom<DynEvidence>` at the storage
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynEvidence {
    /// Unique evidence identifier.
    pub id: EvidenceId,
    /// Human-facing identifier.
    pub display_id: DisplayId,
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// Dataset this evidence belongs to.
    pub dataset: DatasetType,
    /// How the evidence entered the system.
    pub ingestion_method: IngestionMethod,
    /// Source system the payload came from.
    pub source_system: String,
    /// Actor who performed the ingestion.
    pub ingested_by: String,
    /// When the evidence was ingested.
    pub ingested_at: Timestamp,
    /// The raw payload.
    pub payload: Value,
    /// Errors from the most recent validation run.
    #[serde(default)]
    pub validation_errors: Vec<String>,
    /// Reason recorded when the evidence was quarantined.
    #[serde(default)]
    pub quarantine_reason: Option<String>,
    /// SHA-256 over the canonical payload.
    #[serde(default)]
    pub content_hash: Option<ContentDigest>,
    /// SHA-256 over the canonical ingestion metadata.
    #[serde(default)]
    pub metadata_hash: Option<ContentDigest>,
    /// When the evidence was sealed.
    #[serde(default)]
    pub sealed_at: Option<Timestamp>,
    /// Actor who sealed the evidence.
    #[serde(default)]
    pub sealed_by: Option<String>,
    /// End of the retention window.
    #[serde(default)]
    pub retention_until: Option<Timestamp>,
    /// Entity binding status.
    pub reconciliation: ReconciliationStatus,
    /// Current state.
    pub status: EvidenceStatus,
    /// Immutable log of all state transitions.
    #[serde(default)]
    pub transition_log: Vec<TransitionRecord>,
}

impl DynEvidence {
    /// Attempt a state transition with runtime validation.
    ///
    /// Returns an error if the transition is not in the allowed table.
    /// Records the transition in the log on success.
    pub fn try_transition(
        &mut self,
        to: EvidenceStatus,
        reason: &str,
    ) -> Result<(), EvidenceError> {
        let valid = matches!(
            (self.status, to),
            (EvidenceStatus::Draft, EvidenceStatus::ReadyToSeal)
                | (EvidenceStatus::Draft, EvidenceStatus::ValidationFailed)
                | (EvidenceStatus::Draft, EvidenceStatus::Quarantined)
                | (EvidenceStatus::ReadyToSeal, EvidenceStatus::Sealed)
                | (EvidenceStatus::ReadyToSeal, EvidenceStatus::ValidationFailed)
                | (EvidenceStatus::ReadyToSeal, EvidenceStatus::Quarantined)
                | (EvidenceStatus::ValidationFailed, EvidenceStatus::ReadyToSeal)
                | (EvidenceStatus::ValidationFailed, EvidenceStatus::Quarantined)
        );

        if !valid {
            return Err(EvidenceError::InvalidTransition {
                from: self.status.name().to_string(),
                to: to.name().to_string(),
            });
        }

        self.transition_log.push(TransitionRecord {
            from_state: self.status.name().to_string(),
            to_state: to.name().to_string(),
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.status = to;
        Ok(())
    }

    /// Returns the canonical state name.
    pub fn state_name(&self) -> &'static str {
        self.status.name()
    }

    /// Whether the evidence is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Convert a typed `Evidence<S>` into a `DynEvidence` for persistence.
macro_rules! impl_into_dyn_evidence {
    ($state_type:ty, $dyn_variant:ident) => {
        impl From<Evidence<$state_type>> for DynEvidence {
            fn from(e: Evidence<$state_type>) -> Self {
                DynEvidence {
                    id: e.id,
                    display_id: e.display_id,
                    tenant_id: e.tenant_id,
                    dataset: e.dataset,
                    ingestion_method: e.ingestion_method,
                    source_system: e.source_system,
                    ingested_by: e.ingested_by,
                    ingested_at: e.ingested_at,
                    payload: e.payload,
                    validation_errors: e.validation_errors,
                    quarantine_reason: e.quarantine_reason,
                    content_hash: e.content_hash,
                    metadata_hash: e.metadata_hash,
                    sealed_at: e.sealed_at,
                    sealed_by: e.sealed_by,
                    retention_until: e.retention_until,
                    reconciliation: e.reconciliation,
                    status: EvidenceStatus::$dyn_variant,
                    transition_log: e.transition_log,
                }
            }
        }
    };
}

impl_into_dyn_evidence!(Draft, Draft);
impl_into_dyn_evidence!(ReadyToSeal, ReadyToSeal);
impl_into_dyn_evidence!(ValidationFailed, ValidationFailed);
impl_into_dyn_evidence!(Quarantined, Quarantined);
impl_into_dyn_evidence!(Sealed, Sealed);

/// Downcast a `DynEvidence` into a typed `Evidence<S>`, checking the
/// stored status first.
macro_rules! impl_try_from_dyn_evidence {
    ($state_type:ty, $dyn_variant:ident) => {
        impl TryFrom<DynEvidence> for Evidence<$state_type> {
            type Error = EvidenceError;

            fn try_from(e: DynEvidence) -> Result<Self, Self::Error> {
                if e.status != EvidenceStatus::$dyn_variant {
                    return Err(EvidenceError::UnexpectedStatus {
                        id: e.id.to_string(),
                        expected: <$state_type as EvidenceState>::name().to_string(),
                        actual: e.status.name().to_string(),
                    });
                }
                Ok(Evidence {
                    id: e.id,
                    display_id: e.display_id,
                    tenant_id: e.tenant_id,
                    dataset: e.dataset,
                    ingestion_method: e.ingestion_method,
                    source_system: e.source_system,
                    ingested_by: e.ingested_by,
                    ingested_at: e.ingested_at,
                    payload: e.payload,
                    validation_errors: e.validation_errors,
                    quarantine_reason: e.quarantine_reason,
                    content_hash: e.content_hash,
                    metadata_hash: e.metadata_hash,
                    sealed_at: e.sealed_at,
                    sealed_by: e.sealed_by,
                    retention_until: e.retention_until,
                    reconciliation: e.reconciliation,
                    transition_log: e.transition_log,
                    _state: PhantomData,
                })
            }
        }
    };
}

impl_try_from_dyn_evidence!(Draft, Draft);
impl_try_from_dyn_evidence!(ReadyToSeal, ReadyToSeal);
impl_try_from_dyn_evidence!(ValidationFailed, ValidationFailed);
impl_try_from_dyn_evidence!(Quarantined, Quarantined);
impl_try_from_dyn_evidence!(Sealed, Sealed);

// ─── Tests ───────────────────────────────────────────────────────────
