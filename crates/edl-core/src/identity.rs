//! # Ledger Identifier Newtypes
//!
//! Newtype wrappers for all identifiers in the decision ledger. These
//! prevent accidental identifier confusion — you cannot pass a
//! `WorkItemId` where an `EvidenceId` is expected, and an entity id never
//! leaks into a decision lookup.
//!
//! `TenantId` is the one validated identifier: every query in the store is
//! scoped by it, so a malformed tenant slug must be impossible to
//! construct.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Unique identifier for an evidence record or draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceId(pub Uuid);

/// Unique identifier for a work item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItemId(pub Uuid);

/// Unique identifier for a logged decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub Uuid);

/// Unique identifier for an audit trail event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditEventId(pub Uuid);

/// Unique identifier for a canonical entity (supplier, SKU, BOM).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

/// Unique identifier for a mapping suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionId(pub Uuid);

/// Tenant scope for every record in the ledger.
///
/// Validated slug: lowercase ASCII letters, digits, and hyphens, 1 to 64
/// characters, no leading or trailing hyphen. Isolation is enforced by
/// filtering on this value, so the type refuses to hold anything that
/// could not have come from tenant provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TenantId(String);

/// Human-facing sequential identifier, e.g. `EV-2024-0001` or `WI-2024-0042`.
///
/// Display ids exist for operators and exports; all cross-references in
/// the ledger use the UUID-backed types above.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub String);

impl EvidenceId {
    /// Create a new random evidence identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl WorkItemId {
    /// Create a new random work item identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl DecisionId {
    /// Create a new random decision identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AuditEventId {
    /// Create a new random audit event identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl EntityId {
    /// Create a new random entity identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl SuggestionId {
    /// Create a new random suggestion identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl TenantId {
    /// Validate and wrap a tenant slug.
    pub fn new(slug: &str) -> Result<Self, CoreError> {
        if slug.is_empty() || slug.len() > 64 {
            return Err(CoreError::Validation(format!(
                "tenant slug must be 1-64 characters: {slug:?}"
            )));
        }
        if slug.starts_with('-') || slug.ends_with('-') {
            return Err(CoreError::Validation(format!(
                "tenant slug must not start or end with a hyphen: {slug:?}"
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(CoreError::Validation(format!(
                "tenant slug must be lowercase alphanumeric with hyphens: {slug:?}"
            )));
        }
        Ok(Self(slug.to_owned()))
    }

    /// The validated slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DisplayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Display id derived from a UUID prefix, e.g. `EV-1A2B3C4D`.
    ///
    /// Runtime records use this form; seeded demo data uses the
    /// sequential per-prefix counters instead.
    pub fn from_uuid(prefix: &str, uuid: &Uuid) -> Self {
        let hex = uuid.simple().to_string();
        Self(format!("{prefix}-{}", hex[..8].to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TenantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TenantId::new(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evidence:{}", self.0)
    }
}

impl std::fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "workitem:{}", self.0)
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "decision:{}", self.0)
    }
}

impl std::fmt::Display for AuditEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "audit:{}", self.0)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

impl std::fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "suggestion:{}", self.0)
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for DisplayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_slug_validation() {
        assert!(TenantId::new("tenant-demo").is_ok());
        assert!(TenantId::new("t1").is_ok());
        assert!(TenantId::new("acme-eu-2024").is_ok());

        assert!(TenantId::new("").is_err());
        assert!(TenantId::new("Tenant").is_err());
        assert!(TenantId::new("tenant_demo").is_err());
        assert!(TenantId::new("-leading").is_err());
        assert!(TenantId::new("trailing-").is_err());
        assert!(TenantId::new(&"x".repeat(65)).is_err());
    }

    #[test]
    fn tenant_deserialization_validates() {
        let ok: Result<TenantId, _> = serde_json::from_str(r#""tenant-demo""#);
        assert!(ok.is_ok());
        let bad: Result<TenantId, _> = serde_json::from_str(r#""NOT A SLUG""#);
        assert!(bad.is_err());
    }

    #[test]
    fn display_prefixes_distinguish_namespaces() {
        let ev = EvidenceId::new();
        let wi = WorkItemId::new();
        assert!(ev.to_string().starts_with("evidence:"));
        assert!(wi.to_string().starts_with("workitem:"));
    }

    #[test]
    fn ids_serialize_as_bare_uuids() {
        let id = DecisionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: DecisionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(!json.contains("decision:"));
    }

    #[test]
    fn display_id_from_uuid_prefix() {
        let uuid = Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000000").unwrap();
        let display = DisplayId::from_uuid("EV", &uuid);
        assert_eq!(display.as_str(), "EV-1A2B3C4D");
    }
}
