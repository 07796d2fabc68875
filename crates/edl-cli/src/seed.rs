//! # Seed Subcommand
//!
//! Writes the deterministic demo dataset to a snapshot file. The
//! generator is seeded, so two runs produce byte-identical ledgers.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use edl_store::{seed_demo_data, LedgerStore};

use crate::config::DEFAULT_SNAPSHOT;

/// Arguments for the seed subcommand.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Snapshot file to create.
    #[arg(long, default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,

    /// Replace an existing snapshot file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: SeedArgs) -> anyhow::Result<()> {
    if args.snapshot.exists() {
        if !args.force {
            anyhow::bail!(
                "{} already exists, pass --force to replace it",
                args.snapshot.display()
            );
        }
        std::fs::remove_file(&args.snapshot)
            .with_context(|| format!("removing {}", args.snapshot.display()))?;
    }

    let store = LedgerStore::with_snapshot(&args.snapshot)?;
    let summary = seed_demo_data(&store)?;
    println!(
        "Seeded {}: {} entities, {} evidence records, {} work items, {} suggestions, {} decisions, {} audit events",
        args.snapshot.display(),
        summary.entities,
        summary.evidence,
        summary.work_items,
        summary.suggestions,
        summary.decisions,
        summary.audit_events,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_twice_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("ledger.json");

        run(SeedArgs {
            snapshot: snapshot.clone(),
            force: false,
        })
        .unwrap();
        assert!(snapshot.exists());

        let again = run(SeedArgs {
            snapshot: snapshot.clone(),
            force: false,
        });
        assert!(again.is_err());

        run(SeedArgs {
            snapshot,
            force: true,
        })
        .unwrap();
    }
}
