//! # edl-service — Ledger Orchestration
//!
//! The operation layer of the Evidence Decision Ledger. Each method on
//! [`LedgerService`] is one unit of operator intent: ingest evidence,
//! seal it, quarantine it, resolve a conflict, review a mapping, verify
//! the audit chain, export the package. The service composes the pure
//! state machines from `edl-state`, the assignment engine from
//! `edl-routing`, and the storage seam from `edl-store`.
//!
//! ## Modules
//!
//! - **Evidence** (`evidence.rs`): intake, validation, sealing, and
//!   quarantine (which also opens a routed review item).
//! - **Work items** (`workitems.rs`): routed creation, conflict
//!   resolution, approve/reject decisions, idempotent follow-ups.
//! - **Mappings** (`mappings.rs`): suggestion review and the entity and
//!   evidence side effects of an approval.
//! - **Audit** (`audit.rs`): chain verification with a self-appending
//!   HASH_VERIFICATION event.
//! - **Export** (`export.rs`): the regulator-facing evidence package.
//!
//! ## Security Invariant
//!
//! Every mutation that matters to a regulator (seal, quarantine, work
//! item creation, decision, export, verification) appends to the
//! tenant's audit chain inside the same service call. There is no
//! public method that performs one of these mutations silently.
//!
//! ## Design Decision
//!
//! Operations validate and construct the pure domain records before the
//! first store write. A validation failure (missing comment, illegal
//! transition, dangling reference) therefore leaves the store exactly
//! as it was. The store trait object keeps the service independent of
//! the snapshot backing; tests run it against a bare in-memory store.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use edl_core::{AuditEventId, AuditEventType, TenantId};
use edl_state::{AuditEvent, AuditObjectType, NewAuditEvent};
use edl_store::LedgerRepository;

pub mod audit;
pub mod error;
pub mod evidence;
pub mod export;
pub mod mappings;
pub mod workitems;

pub use audit::ChainVerification;
pub use error::ServiceError;
pub use evidence::EvidenceSubmission;
pub use export::EvidencePackage;
pub use workitems::{ConflictResolution, DecisionRequest, WorkItemDraft};

// ─── Service ─────────────────────────────────────────────────────────

/// The ledger orchestration service.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerRepository>,
}

impl fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerService").finish_non_exhaustive()
    }
}

impl LedgerService {
    /// A service over the given store.
    pub fn new(store: Arc<dyn LedgerRepository>) -> Self {
        Self { store }
    }

    /// Every tenant with at least one record in the store.
    pub fn tenants(&self) -> Result<Vec<TenantId>, ServiceError> {
        Ok(self.store.tenants()?)
    }

    /// Append one event to the tenant's audit chain.
    pub(crate) fn audit(
        &self,
        tenant: &TenantId,
        event_type: AuditEventType,
        object_type: AuditObjectType,
        object_id: String,
        actor: &str,
        metadata: Value,
    ) -> Result<AuditEvent, ServiceError> {
        let event = self.store.append_audit(NewAuditEvent {
            id: AuditEventId::new(),
            tenant_id: tenant.clone(),
            event_type,
            object_type,
            object_id,
            actor: actor.to_string(),
            metadata,
        })?;
        Ok(event)
    }
}
