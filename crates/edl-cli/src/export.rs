//! # Export Subcommand
//!
//! Writes a tenant's evidence package (sealed evidence, decision
//! history, chain head) as JSON. Every sealed record is integrity
//! checked first; a tampered record aborts the export.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use edl_core::TenantId;
use edl_service::LedgerService;
use edl_store::LedgerStore;

use crate::config::DEFAULT_SNAPSHOT;

/// Actor recorded on the PACKAGE_EXPORTED event.
const CLI_ACTOR: &str = "edl-cli";

/// Arguments for the export subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Tenant slug.
    #[arg(long)]
    pub tenant: String,

    /// Snapshot file backing the store.
    #[arg(long, default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,

    /// Output file. Stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let tenant = TenantId::new(&args.tenant)?;
    let store = Arc::new(LedgerStore::with_snapshot(&args.snapshot)?);
    let service = LedgerService::new(store);

    let package = service.export_package(&tenant, CLI_ACTOR)?;
    let json = serde_json::to_string_pretty(&package)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "Exported {} sealed records and {} decisions to {}",
                package.sealed_evidence.len(),
                package.decisions.len(),
                path.display(),
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
