//! # edl-routing — Work Item Assignment
//!
//! Routes work items to owning teams. A static table maps
//! `"{type}:{dataset}"` keys to an owner and a base priority; conflict
//! items then pass through escalation rules driven by evidence status
//! and trust-rank spread.
//!
//! The engine is a pure function over an [`AssignmentRequest`]. It
//! reads no store and keeps no state, so the service layer can route at
//! creation time and re-route after status changes without coordination.

pub mod assign;
pub mod table;

pub use assign::{assign, Assignment, AssignmentRequest, ESCALATION_VARIANCE};
pub use table::{lookup, rank_for, RoutingRule, DEFAULT_TRUST_RANK, FALLBACK_OWNER};
