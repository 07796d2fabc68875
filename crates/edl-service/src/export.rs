//! # Evidence Package Export
//!
//! Builds the regulator-facing export: every sealed evidence record,
//! the full decision history, and the audit chain head.
//!
//! ## Security Invariant
//!
//! Each sealed record's hashes are re-verified at export time. One
//! tampered record aborts the whole export; a package that leaves the
//! building carries only records whose bytes still match their seals.

use serde::Serialize;
use serde_json::json;
use tracing::info;

use edl_core::{AuditEventType, TenantId, Timestamp};
use edl_state::{chain_head, AuditObjectType, Decision, DynEvidence, Evidence, Sealed};

use crate::{LedgerService, ServiceError};

/// A point-in-time export of the tenant's sealed ledger.
#[derive(Debug, Clone, Serialize)]
pub struct EvidencePackage {
    pub tenant_id: TenantId,
    pub generated_at: Timestamp,
    /// Sealed records, each integrity-checked at export time.
    pub sealed_evidence: Vec<DynEvidence>,
    /// Full decision history, in append order.
    pub decisions: Vec<Decision>,
    /// `this_hash` of the newest audit event at export time.
    pub audit_head: Option<String>,
}

impl LedgerService {
    /// Export the tenant's sealed evidence and decision history.
    ///
    /// Appends PACKAGE_EXPORTED to the audit chain. The chain head in
    /// the package is the head before that event.
    pub fn export_package(
        &self,
        tenant: &TenantId,
        actor: &str,
    ) -> Result<EvidencePackage, ServiceError> {
        let sealed = self.store.list_sealed_evidence(tenant)?;
        for record in &sealed {
            Evidence::<Sealed>::try_from(record.clone())?.verify_integrity()?;
        }
        let decisions = self.store.list_decisions(tenant)?;
        let events = self.store.list_audit(tenant)?;
        let package = EvidencePackage {
            tenant_id: tenant.clone(),
            generated_at: Timestamp::now(),
            sealed_evidence: sealed,
            decisions,
            audit_head: chain_head(&events).map(|h| h.to_string()),
        };

        self.audit(
            tenant,
            AuditEventType::PackageExported,
            AuditObjectType::Package,
            tenant.as_str().to_string(),
            actor,
            json!({
                "sealedEvidence": package.sealed_evidence.len(),
                "decisions": package.decisions.len(),
            }),
        )?;
        info!(
            tenant = %tenant,
            sealed = package.sealed_evidence.len(),
            decisions = package.decisions.len(),
            "exported evidence package"
        );
        Ok(package)
    }
}
