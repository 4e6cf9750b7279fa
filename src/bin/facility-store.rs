//! Open the configured store and print every record
//!
//! ```sh
//! RUST_LOG=debug facility-store facility-store.yaml
//! ```

use anyhow::Context;
use facility_store::prelude::*;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => StoreConfig::from_yaml_file(&path)
            .with_context(|| format!("failed to read config {}", path))?,
        None if Path::new("facility-store.yaml").exists() => {
            StoreConfig::from_yaml_file("facility-store.yaml")?
        }
        None => StoreConfig::default(),
    };

    let backend = open_backend(&config.backend).await?;

    if let Some(csv) = &config.import_csv {
        if backend.load().await?.is_empty() {
            let imported = backend.migrate(csv).await?;
            tracing::info!(imported, source = %csv.display(), "Seeded empty backend from CSV");
        }
    }

    let load_timeout = config.load_timeout;
    let manager = FacilityManager::start(backend, config);
    if !manager.wait_for_load(load_timeout).await {
        anyhow::bail!("records were not loaded within {} ms", load_timeout.as_millis());
    }

    let records = manager.snapshot_records();
    for (index, record) in records.iter().enumerate() {
        println!("[{}] {}", index, record);
    }
    tracing::info!(
        records = records.len(),
        container = %manager.container_kind(),
        "Done"
    );

    manager.shutdown().await;
    Ok(())
}
