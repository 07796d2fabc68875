//! # Single-Document JSON Snapshot
//!
//! The entire store serializes as one JSON document with a fixed
//! top-level layout. There is no schema version field and no migration
//! machinery; absent collections deserialize as empty via
//! `#[serde(default)]`, which is the whole compatibility story.
//!
//! Writes are atomic at the filesystem level: serialize to a sibling
//! temp file, then rename over the destination. A crash mid-write
//! leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use edl_core::WorkItemId;
use edl_state::{AuditEvent, CanonicalEntity, Decision, DynEvidence, MappingSuggestion, WorkItem};

/// Errors from snapshot I/O.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to read snapshot at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write snapshot at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The persisted document. Also serves as the in-memory state, so
/// saving is a plain serialize of the live collections.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Sealed evidence records.
    pub evidence: Vec<DynEvidence>,
    /// Pre-seal evidence (drafts, failed validation, quarantined).
    pub evidence_drafts: Vec<DynEvidence>,
    /// Work items across all lifecycles.
    pub work_items: Vec<WorkItem>,
    /// Canonical entities.
    pub entities: Vec<CanonicalEntity>,
    /// Mapping suggestions.
    pub mapping_suggestions: Vec<MappingSuggestion>,
    /// Append-only decision records.
    pub decisions: Vec<Decision>,
    /// Hash-chained audit events, all tenants interleaved.
    pub audit_events: Vec<AuditEvent>,
    /// Follow-up idempotency side-table: key to created work item.
    pub idempotency_keys: BTreeMap<String, WorkItemId>,
}

/// Load a snapshot, or an empty one when the file does not exist yet.
pub fn load(path: &Path) -> Result<Snapshot, SnapshotError> {
    if !path.exists() {
        return Ok(Snapshot::default());
    }
    let bytes = fs::read(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the snapshot atomically: temp file in the same directory, then
/// rename over the destination.
pub fn save(snapshot: &Snapshot, path: &Path) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let body = serde_json::to_vec_pretty(snapshot).map_err(SnapshotError::Encode)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(|source| SnapshotError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = load(&dir.path().join("ledger.json")).unwrap();
        assert!(snapshot.evidence.is_empty());
        assert!(snapshot.idempotency_keys.is_empty());
    }

    #[test]
    fn top_level_keys_are_camel_case() {
        let value = serde_json::to_value(Snapshot::default()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        // serde_json maps sort keys, so the expected list is alphabetical.
        assert_eq!(
            keys,
            vec![
                "auditEvents",
                "decisions",
                "entities",
                "evidence",
                "evidenceDrafts",
                "idempotencyKeys",
                "mappingSuggestions",
                "workItems",
            ]
        );
    }

    #[test]
    fn partial_document_fills_defaults() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"workItems": []}"#).unwrap();
        assert!(snapshot.evidence.is_empty());
        assert!(snapshot.audit_events.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let snapshot = Snapshot::default();
        save(&snapshot, &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        load(&path).unwrap();
    }

    #[test]
    fn corrupt_document_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(load(&path), Err(SnapshotError::Parse { .. })));
    }
}
