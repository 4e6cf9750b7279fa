//! Integration tests for the SQLite backend using the storage test harness.
//!
//! # Requirements
//!
//! - Feature flag `sqlite` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features sqlite --test sqlite_tests
//! ```
//!
//! The harness suite runs against a private in-memory database per test; the
//! extra tests below use a database file in a temporary directory.

#![cfg(feature = "sqlite")]

#[macro_use]
mod storage_harness;

use facility_store::config::BackendConfig;
use facility_store::core::{FormatVariant, RecordBackend};
use facility_store::storage::{SqliteBackend, open_backend};
use storage_harness::*;
use tempfile::TempDir;

backend_tests!(
    SqliteBackend::in_memory()
        .await
        .expect("Failed to open in-memory SQLite")
);

#[tokio::test]
async fn test_file_database_survives_reconnect() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("facility_records.db").display());

    let mut records = three_records();
    records[0].format = FormatVariant::Detailed;

    {
        let backend = SqliteBackend::connect(&url, 5).await.unwrap();
        backend.initialize().await.unwrap();
        backend.save(&records).await.unwrap();
    }

    let backend = SqliteBackend::connect(&url, 5).await.unwrap();
    backend.initialize().await.unwrap();
    let loaded = backend.load().await.unwrap();
    assert_eq!(loaded, records);
    assert_eq!(loaded[0].format, FormatVariant::Detailed);
}

#[tokio::test]
async fn test_open_backend_applies_schema() {
    let dir = TempDir::new().unwrap();
    let config = BackendConfig::Sqlite {
        url: format!("sqlite://{}", dir.path().join("opened.db").display()),
        pool_size: 2,
    };

    let backend = open_backend(&config).await.unwrap();
    assert_eq!(backend.name(), "sqlite");
    assert!(backend.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let backend = SqliteBackend::in_memory().await.unwrap();
    backend.initialize().await.unwrap();
    backend.save(&three_records()).await.unwrap();
    backend.initialize().await.unwrap();

    assert_eq!(backend.load().await.unwrap().len(), 3);
}
