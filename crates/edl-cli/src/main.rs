//! # edl CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Evidence decision ledger toolchain.
///
/// Runs the API server and operates snapshot-backed ledgers: demo
/// seeding, tenant-scoped listings, audit-chain verification, and
/// evidence package export.
#[derive(Parser, Debug)]
#[command(name = "edl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the REST API server.
    Serve(edl_cli::serve::ServeArgs),
    /// Write the deterministic demo dataset to a snapshot.
    Seed(edl_cli::seed::SeedArgs),
    /// Tenant-scoped listings from a snapshot.
    List(edl_cli::list::ListArgs),
    /// Verify tenant audit chains. Non-zero exit on a broken chain.
    Verify(edl_cli::verify::VerifyArgs),
    /// Export a tenant's evidence package as JSON.
    Export(edl_cli::export::ExportArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => edl_cli::serve::run(args),
        Commands::Seed(args) => edl_cli::seed::run(args),
        Commands::List(args) => edl_cli::list::run(args),
        Commands::Verify(args) => edl_cli::verify::run(args),
        Commands::Export(args) => edl_cli::export::run(args),
    }
}
