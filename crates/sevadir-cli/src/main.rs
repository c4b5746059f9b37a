//! Sevadir — NGO directory scrape ingestion.
//! Entry point for the ingestion binary.
//!
//! Performs one full ingestion pass over the configured listing pages
//! and prints the run summary. Exits non-zero only when the run aborts
//! on a store failure; per-document and per-record skips are reported
//! in the summary instead.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use sevadir_ingestion::pipeline::{run_ingestion, IngestionJob};
use sevadir_ingestion::repository::IngestionRepository;
use sevadir_store::{MemoryStore, Organization};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sevadir=debug,info")),
        )
        .init();

    info!("Sevadir ingestion starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match config::Config::load() {
        Ok(c) => {
            info!(
                documents = c.ingestion.documents.len(),
                snapshot = %c.store.snapshot_path,
                "Configuration loaded"
            );
            c
        }
        Err(e) => {
            tracing::warn!("Could not load sevadir.toml: {e}");
            tracing::warn!("Copy sevadir.example.toml to sevadir.toml and edit it.");
            return Ok(());
        }
    };

    // Seed the store from a previous snapshot when one exists.
    let store = Arc::new(load_store(&config.store.snapshot_path)?);
    let repo = Arc::new(IngestionRepository::new(store.clone()));

    let job = IngestionJob {
        documents: config.ingestion.documents.iter().map(PathBuf::from).collect(),
    };

    let summary = run_ingestion(job, repo, None).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    save_store(&store, &config.store.snapshot_path).await?;

    Ok(())
}

fn load_store(path: &str) -> anyhow::Result<MemoryStore> {
    match std::fs::read_to_string(path) {
        Ok(json) => {
            let orgs: Vec<Organization> = serde_json::from_str(&json)?;
            info!(path, organizations = orgs.len(), "Store snapshot loaded");
            Ok(MemoryStore::with_organizations(orgs))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path, "No store snapshot found, starting empty");
            Ok(MemoryStore::new())
        }
        Err(e) => Err(e.into()),
    }
}

async fn save_store(store: &MemoryStore, path: &str) -> anyhow::Result<()> {
    let orgs = store.organizations().await;
    let json = serde_json::to_string_pretty(&orgs)?;
    std::fs::write(path, json)?;
    info!(path, organizations = orgs.len(), "Store snapshot written");
    Ok(())
}
