//! # Ledger Taxonomy — Datasets, Entities, Readiness
//!
//! Closed vocabularies shared by every crate in the stack. All of them
//! serialize in SCREAMING_SNAKE_CASE, which is also the wire form in the
//! REST API and the snapshot file.
//!
//! `as_str` returns exactly the serialized name so that routing keys and
//! log fields never drift from the wire format.

use serde::{Deserialize, Serialize};

/// The dataset an evidence record belongs to.
///
/// Datasets drive work item routing: the same work item type lands on a
/// different team depending on which dataset produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetType {
    /// Supplier master data records.
    SupplierMaster,
    /// Bill-of-materials structures.
    Bom,
    /// Invoice documents.
    Invoice,
    /// Records pulled from ERP synchronization feeds.
    ErpSync,
    /// Certificates and third-party attestations.
    Certificate,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::SupplierMaster => "SUPPLIER_MASTER",
            DatasetType::Bom => "BOM",
            DatasetType::Invoice => "INVOICE",
            DatasetType::ErpSync => "ERP_SYNC",
            DatasetType::Certificate => "CERTIFICATE",
        }
    }
}

/// The kind of canonical entity evidence can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Supplier,
    Sku,
    Bom,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Supplier => "SUPPLIER",
            EntityKind::Sku => "SKU",
            EntityKind::Bom => "BOM",
        }
    }
}

/// How an evidence record entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestionMethod {
    /// Manual file upload by an operator.
    Upload,
    /// Direct API submission.
    Api,
    /// Scheduled synchronization from a connected system.
    Sync,
}

impl IngestionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionMethod::Upload => "UPLOAD",
            IngestionMethod::Api => "API",
            IngestionMethod::Sync => "SYNC",
        }
    }
}

/// Progress of matching an entity to its counterpart in the target system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingStatus {
    /// No mapping candidate identified yet.
    Unmapped,
    /// A suggestion exists and awaits review.
    Pending,
    /// Mapping confirmed by an operator.
    Mapped,
}

impl MappingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingStatus::Unmapped => "UNMAPPED",
            MappingStatus::Pending => "PENDING",
            MappingStatus::Mapped => "MAPPED",
        }
    }
}

/// Derived readiness of an entity for inclusion in a compliance export.
///
/// Never stored; recomputed from entity state on every read. The variants
/// are ordered from blocking to clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Readiness {
    /// Quarantined evidence or open conflicts block the entity outright.
    NotReady,
    /// The entity has not been mapped to the target system yet.
    PendingMatch,
    /// Mapped, but required fields are still missing.
    ReadyWithGaps,
    /// Mapped with no gaps, conflicts, or quarantined evidence.
    Ready,
}

impl Readiness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Readiness::NotReady => "NOT_READY",
            Readiness::PendingMatch => "PENDING_MATCH",
            Readiness::ReadyWithGaps => "READY_WITH_GAPS",
            Readiness::Ready => "READY",
        }
    }
}

impl std::fmt::Display for DatasetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for IngestionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
