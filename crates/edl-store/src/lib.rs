//! # edl-store — Tenant-Scoped Record Store
//!
//! In-memory collections behind the [`LedgerRepository`] trait, with
//! optional persistence of the entire store as a single JSON document.
//! Reads filter by tenant id; writes serialize the full document under
//! the store's one write lock and swap it into place atomically.
//!
//! `fixtures` seeds a deterministic demo dataset, including a second
//! tenant whose records must never appear in the first tenant's lists.

pub mod fixtures;
pub mod snapshot;
pub mod store;

pub use fixtures::{seed_demo_data, SeedError, SeedSummary, DEMO_TENANT, OTHER_TENANT};
pub use snapshot::{Snapshot, SnapshotError};
pub use store::{FollowUpOutcome, LedgerRepository, LedgerStore, StoreError};
