//! # Serve Subcommand
//!
//! Boots the API server: open the snapshot-backed store, optionally
//! seed it when empty, install the Prometheus recorder, and run the
//! Axum application on Tokio.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use edl_api::{app, AppState};
use edl_service::LedgerService;
use edl_store::{seed_demo_data, LedgerRepository, LedgerStore};

use crate::config::ServerConfig;

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to a YAML server configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bind address, e.g. 127.0.0.1:8080. Wins over config and env.
    #[arg(long)]
    pub bind: Option<String>,

    /// Snapshot file backing the store. Wins over config and env.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Seed the demo dataset when the store is empty.
    #[arg(long)]
    pub seed: bool,
}

pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    config.apply_flags(args.bind, args.snapshot, args.seed);

    let store = Arc::new(LedgerStore::with_snapshot(&config.snapshot_path)?);
    if config.seed_on_empty && store.tenants()?.is_empty() {
        let summary = seed_demo_data(store.as_ref())?;
        info!(
            entities = summary.entities,
            evidence = summary.evidence,
            work_items = summary.work_items,
            "seeded the empty store"
        );
    }

    let recorder = PrometheusBuilder::new()
        .install_recorder()
        .context("installing the Prometheus recorder")?;

    let state = AppState::with_metrics(LedgerService::new(store), recorder);

    let runtime = tokio::runtime::Runtime::new().context("starting the Tokio runtime")?;
    runtime.block_on(serve(config.bind_addr, state))
}

async fn serve(bind_addr: String, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(addr = %bind_addr, "decision ledger API listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
