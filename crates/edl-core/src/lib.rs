//! # edl-core — Foundational Types for the Evidence Decision Ledger
//!
//! This crate is the bedrock of the ledger workspace. It defines the
//! type-system primitives every other crate builds on: identifier newtypes,
//! UTC-only timestamps, canonical byte production, content digests, the
//! shared workflow vocabulary, and the pure policy arithmetic (retention,
//! SLA, readiness). Every other crate in the workspace depends on
//! `edl-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `TenantId`, `EvidenceId`,
//!    `WorkItemId`, `DecisionId` — all distinct types. No bare strings or
//!    bare UUIDs for identifiers, and exactly one internal identifier per
//!    record kind.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!    Payload and metadata hashes on sealed evidence are real SHA-256 over
//!    canonical bytes, never a placeholder hash.
//!
//! 3. **One vocabulary definition.** Dataset types, work-item types and
//!    statuses, priorities, decision outcomes, and audit event types are
//!    each defined once, here, and matched exhaustively everywhere.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision — matching the JCS canonicalization
//!    rules, so the same instant always produces the same canonical bytes.
//!
//! 5. **Pure policy functions.** Retention-end, SLA-remaining, and
//!    readiness are total functions of their inputs with no clock or store
//!    access, so they are trivially testable.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `edl-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod canonical;
pub mod digest;
pub mod display;
pub mod error;
pub mod identity;
pub mod policy;
pub mod readiness;
pub mod taxonomy;
pub mod temporal;
pub mod workflow;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use display::{format_timestamp, DateFormat, DemoIdGenerator, ABSENT_PLACEHOLDER};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{
    AuditEventId, DecisionId, DisplayId, EntityId, EvidenceId, SuggestionId, TenantId, WorkItemId,
};
pub use policy::{default_sla_hours, retention_end, sla_remaining_hours, RETENTION_YEARS};
pub use readiness::readiness_of;
pub use taxonomy::{DatasetType, EntityKind, IngestionMethod, MappingStatus, Readiness};
pub use temporal::Timestamp;
pub use workflow::{
    AuditEventType, ConflictStrategy, DecisionOutcome, Priority, WorkItemStatus, WorkItemType,
};
