//! # Static Routing Table
//!
//! Maps `"{type}:{dataset}"` keys to an owning team and a base priority.
//! The table is data, not code: adding a queue is a new row, and the
//! assignment engine in [`crate::assign`] never special-cases a team.
//!
//! Also hosts the default trust ranks for known source systems, used
//! when conflict sources arrive without an explicit rank.

use edl_core::Priority;

/// One row of the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingRule {
    /// Lookup key, `"{work_item_type}:{dataset_type}"`.
    pub key: &'static str,
    /// The team that owns items matching this rule.
    pub owner: &'static str,
    /// Priority before escalation.
    pub base_priority: Priority,
    /// Human-readable routing rationale.
    pub reason: &'static str,
}

/// Owner assigned when no rule matches.
pub const FALLBACK_OWNER: &str = "Unassigned";

/// Trust rank assumed for source systems not in [`TRUST_RANKS`].
pub const DEFAULT_TRUST_RANK: u8 = 50;

const ROUTING_TABLE: &[RoutingRule] = &[
    RoutingRule {
        key: "REVIEW:SUPPLIER_MASTER",
        owner: "Supplier Data Team",
        base_priority: Priority::Medium,
        reason: "Supplier master review queue",
    },
    RoutingRule {
        key: "REVIEW:INVOICE",
        owner: "Finance Ops",
        base_priority: Priority::Medium,
        reason: "Invoice review queue",
    },
    RoutingRule {
        key: "REVIEW:CERTIFICATE",
        owner: "Compliance Review",
        base_priority: Priority::Medium,
        reason: "Certificate review queue",
    },
    RoutingRule {
        key: "EXTRACTION:INVOICE",
        owner: "Document Processing",
        base_priority: Priority::Medium,
        reason: "Invoice field extraction",
    },
    RoutingRule {
        key: "EXTRACTION:CERTIFICATE",
        owner: "Document Processing",
        base_priority: Priority::Medium,
        reason: "Certificate field extraction",
    },
    RoutingRule {
        key: "MAPPING:SUPPLIER_MASTER",
        owner: "Master Data Management",
        base_priority: Priority::Medium,
        reason: "Supplier mapping review",
    },
    RoutingRule {
        key: "MAPPING:BOM",
        owner: "Master Data Management",
        base_priority: Priority::High,
        reason: "BOM mapping blocks downstream rollups",
    },
    RoutingRule {
        key: "CONFLICT:SUPPLIER_MASTER",
        owner: "Supplier Data Team",
        base_priority: Priority::High,
        reason: "Supplier field conflict",
    },
    RoutingRule {
        key: "CONFLICT:BOM",
        owner: "Master Data Management",
        base_priority: Priority::High,
        reason: "BOM field conflict",
    },
    RoutingRule {
        key: "CONFLICT:INVOICE",
        owner: "Finance Ops",
        base_priority: Priority::High,
        reason: "Invoice field conflict",
    },
    RoutingRule {
        key: "BLOCKED:ERP_SYNC",
        owner: "Integration Support",
        base_priority: Priority::High,
        reason: "ERP sync failure",
    },
    RoutingRule {
        key: "FOLLOW_UP:SUPPLIER_MASTER",
        owner: "Supplier Data Team",
        base_priority: Priority::Low,
        reason: "Supplier follow-up",
    },
];

/// Default trust ranks by source system name (exact match).
const TRUST_RANKS: &[(&str, u8)] = &[
    ("ERP", 100),
    ("Supplier Portal", 60),
    ("Legacy CRM", 40),
    ("OCR Pipeline", 30),
];

/// Find the routing rule for a `"{type}:{dataset}"` key.
pub fn lookup(key: &str) -> Option<&'static RoutingRule> {
    ROUTING_TABLE.iter().find(|rule| rule.key == key)
}

/// The default trust rank for a source system.
pub fn rank_for(source_system: &str) -> u8 {
    TRUST_RANKS
        .iter()
        .find(|(name, _)| *name == source_system)
        .map(|(_, rank)| *rank)
        .unwrap_or(DEFAULT_TRUST_RANK)
}

// ─── Tests ───────────────────────────────────────────────────────────
