//! Configuration loading for Sevadir ingestion.
//! Reads sevadir.toml from the current directory or path in SEVADIR_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot the in-memory store is seeded from and persisted
    /// to after a run.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_snapshot_path() -> String {
    "./sevadir-store.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Listing pages to ingest, in order.
    pub documents: Vec<String>,
}


impl Config {
    /// Load configuration from sevadir.toml.
    /// Checks SEVADIR_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("SEVADIR_CONFIG").unwrap_or_else(|_| "sevadir.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy sevadir.example.toml to sevadir.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
