//! # edl-cli — Decision Ledger Command-Line Interface
//!
//! Operational surface for the evidence decision ledger. Every
//! subcommand opens the same snapshot-backed store the server uses, so
//! the CLI and the API always agree on what the ledger contains.
//!
//! ## Subcommands
//!
//! - `serve` — run the REST API server over a snapshot-backed store
//! - `seed` — write the deterministic demo dataset to a snapshot
//! - `list` — tenant-scoped listings (evidence, work items, entities,
//!   decisions, audit)
//! - `verify` — audit-chain verification; non-zero exit on a broken chain
//! - `export` — evidence package export to JSON
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `edl-service`; no ledger logic lives here.
//! - `anyhow` is confined to this crate; everything below it returns
//!   typed errors.

pub mod config;
pub mod export;
pub mod list;
pub mod seed;
pub mod serve;
pub mod verify;
