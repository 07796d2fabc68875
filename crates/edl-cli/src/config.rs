//! # Server Configuration
//!
//! Three layers, later ones winning field by field: a YAML file, then
//! `EDL_*` environment variables, then command-line flags. A missing
//! file is not an error; the defaults serve a local demo unchanged.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Default bind address for the API server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default snapshot file, relative to the working directory.
pub const DEFAULT_SNAPSHOT: &str = "edl-ledger.json";

/// Server configuration after all layers are applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the API binds to.
    #[serde(default = "default_bind")]
    pub bind_addr: String,
    /// Snapshot file backing the store.
    #[serde(default = "default_snapshot")]
    pub snapshot_path: PathBuf,
    /// Seed the demo dataset when the store holds no tenants.
    #[serde(default)]
    pub seed_on_empty: bool,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_snapshot() -> PathBuf {
    PathBuf::from(DEFAULT_SNAPSHOT)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind(),
            snapshot_path: default_snapshot(),
            seed_on_empty: false,
        }
    }
}

impl ServerConfig {
    /// Load the file layer and apply the environment layer on top.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_yaml::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(bind) = std::env::var("EDL_BIND_ADDR") {
            self.bind_addr = bind;
        }
        if let Ok(path) = std::env::var("EDL_SNAPSHOT_PATH") {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Ok(seed) = std::env::var("EDL_SEED_ON_EMPTY") {
            self.seed_on_empty = matches!(seed.as_str(), "1" | "true" | "yes");
        }
    }

    /// Apply the flag layer. Flags win over file and environment.
    pub fn apply_flags(
        &mut self,
        bind: Option<String>,
        snapshot: Option<PathBuf>,
        seed: bool,
    ) {
        if let Some(bind) = bind {
            self.bind_addr = bind;
        }
        if let Some(snapshot) = snapshot {
            self.snapshot_path = snapshot;
        }
        if seed {
            self.seed_on_empty = true;
        }
    }
}
