//! Macro-generated test suite for `RecordBackend` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use facility_store::storage::InMemoryBackend;
//!
//! backend_tests!(InMemoryBackend::new());
//! ```
//!
//! # Generated Tests
//!
//! - `test_load_empty`: fresh backend loads nothing
//! - `test_save_then_load`: every attribute and the format survive
//! - `test_save_preserves_order`: load returns records in saved order
//! - `test_save_replaces_previous`: a save is a full replace, not an append
//! - `test_save_empty_clears`: saving nothing leaves nothing
//! - `test_duplicate_records_kept`: the backend does not deduplicate
//! - `test_migrate_from_csv`: the default import appends CSV rows
//! - `test_manager_round_trip`: manager shutdown persists what a new manager loads

/// Generate a full `RecordBackend` conformance test suite.
///
/// `$factory` must evaluate to a fresh backend implementing
/// `RecordBackend + 'static`. It is expanded inside each async test body, so
/// it may `.await`, and it is re-evaluated for each test to ensure isolation.
#[macro_export]
macro_rules! backend_tests {
    ($factory:expr) => {
        mod backend_contract_tests {
            use super::*;
            use facility_store::config::StoreConfig;
            use facility_store::core::{FormatVariant, RecordBackend};
            use facility_store::store::FacilityManager;
            use std::sync::Arc;
            use std::time::Duration;

            #[tokio::test]
            async fn test_load_empty() {
                let backend = $factory;
                backend.initialize().await.unwrap();
                assert!(backend.load().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_save_then_load() {
                let backend = $factory;
                backend.initialize().await.unwrap();

                let mut records = three_records();
                records[1].format = FormatVariant::Compact;
                records[2].format = FormatVariant::Detailed;
                backend.save(&records).await.unwrap();

                let loaded = backend.load().await.unwrap();
                assert_eq!(loaded.len(), 3);
                for (saved, got) in records.iter().zip(&loaded) {
                    assert_eq!(got, saved);
                    assert_eq!(got.format, saved.format);
                    assert_eq!(got.max_infants, saved.max_infants);
                    assert_eq!(got.facility_address_3, saved.facility_address_3);
                }
            }

            #[tokio::test]
            async fn test_save_preserves_order() {
                let backend = $factory;
                backend.initialize().await.unwrap();

                let records = numbered_records(25);
                backend.save(&records).await.unwrap();

                assert_eq!(licenses(&backend.load().await.unwrap()), licenses(&records));
            }

            #[tokio::test]
            async fn test_save_replaces_previous() {
                let backend = $factory;
                backend.initialize().await.unwrap();

                backend.save(&numbered_records(10)).await.unwrap();
                backend.save(&three_records()).await.unwrap();

                let loaded = backend.load().await.unwrap();
                assert_eq!(loaded, three_records());
            }

            #[tokio::test]
            async fn test_save_empty_clears() {
                let backend = $factory;
                backend.initialize().await.unwrap();

                backend.save(&three_records()).await.unwrap();
                backend.save(&[]).await.unwrap();

                assert!(backend.load().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_duplicate_records_kept() {
                let backend = $factory;
                backend.initialize().await.unwrap();

                let record = create_test_record("Region A", "123", "Facility A", 10);
                backend.save(&[record.clone(), record.clone()]).await.unwrap();

                assert_eq!(backend.load().await.unwrap(), vec![record.clone(), record]);
            }

            #[tokio::test]
            async fn test_migrate_from_csv() {
                let backend = $factory;
                backend.initialize().await.unwrap();
                backend
                    .save(&[create_test_record("Region Z", "999", "Existing", 3)])
                    .await
                    .unwrap();

                let dir = tempfile::tempdir().unwrap();
                let csv = dir.path().join("import.csv");
                write_import_csv(&csv);

                let imported = backend.migrate(&csv).await.unwrap();
                assert_eq!(imported, 3);

                let loaded = backend.load().await.unwrap();
                assert_eq!(
                    licenses(&loaded),
                    vec!["999".to_string(), "123".to_string(), "456".to_string(), "789".to_string()]
                );
                assert_eq!(loaded[1..].to_vec(), three_records());
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_manager_round_trip() {
                let backend: Arc<dyn RecordBackend> = Arc::new($factory);
                backend.initialize().await.unwrap();

                let config = StoreConfig::default().with_load_timeout(Duration::from_secs(5));
                let manager = FacilityManager::start(backend.clone(), config.clone());
                for record in three_records() {
                    manager.add_record(record).await.unwrap();
                }
                manager.shutdown().await;

                let reopened = FacilityManager::start(backend, config);
                assert!(reopened.wait_for_load(Duration::from_secs(5)).await);
                assert_eq!(reopened.snapshot_records(), three_records());
                reopened.shutdown().await;
            }
        }
    };
}
