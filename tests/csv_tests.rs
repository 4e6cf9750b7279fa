//! Integration tests for the CSV file backend using the storage test harness.
//!
//! Each test gets a fresh temporary directory; the backend file does not
//! exist until the first save.

#[macro_use]
mod storage_harness;

use facility_store::core::{FormatVariant, RecordBackend};
use facility_store::storage::CsvBackend;
use storage_harness::*;
use tempfile::TempDir;

fn fresh_csv_backend() -> CsvBackend {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("facility_records.csv");
    // Keep the directory for the duration of the test
    std::mem::forget(dir);
    CsvBackend::new(path)
}

backend_tests!(fresh_csv_backend());

#[tokio::test]
async fn test_initialize_creates_parent_directory() {
    let backend = fresh_csv_backend();
    backend.initialize().await.unwrap();

    let parent = backend.path().parent().unwrap();
    assert!(parent.is_dir());
    assert!(!backend.path().exists());
}

#[tokio::test]
async fn test_file_is_readable_csv() {
    let backend = fresh_csv_backend();
    backend.initialize().await.unwrap();

    let mut records = three_records();
    records[0].facility_name = "Sunny, \"Day\" Care".to_string();
    records[0].format = FormatVariant::Compact;
    backend.save(&records).await.unwrap();

    let contents = std::fs::read_to_string(backend.path()).unwrap();
    let mut lines = contents.lines();
    assert!(lines.next().unwrap().starts_with("Region,District,License Number"));
    assert!(lines.next().unwrap().ends_with(",compact"));

    let loaded = backend.load().await.unwrap();
    assert_eq!(loaded[0].facility_name, "Sunny, \"Day\" Care");
    assert_eq!(loaded, records);
}

#[tokio::test]
async fn test_malformed_capacity_loads_as_zero() {
    let backend = fresh_csv_backend();
    backend.initialize().await.unwrap();

    let header = "Region,District,License Number,Facility Name,Facility Type,Address 1,Address 2,Address 3,\
                  Max Children,Max Infants,Max Preschool,Max School Age,Language of Service,Operator ID,Designated Facility";
    let row = "Region A,D,123,Facility A,Centre,,,, 12 ,lots,,-3,English,op,No";
    std::fs::write(backend.path(), format!("{}\n{}\n", header, row)).unwrap();

    let loaded = backend.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].max_children, 12);
    assert_eq!(loaded[0].max_infants, 0);
    assert_eq!(loaded[0].max_preschool, 0);
    assert_eq!(loaded[0].max_school_age, 0);
    assert_eq!(loaded[0].format, FormatVariant::Standard);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_load_during_save_sees_whole_file() {
    const COUNT: usize = 5_000;
    let backend = fresh_csv_backend();
    backend.initialize().await.unwrap();

    let records = numbered_records(COUNT);
    backend.save(&records).await.unwrap();

    let writer = {
        let backend = backend.clone();
        let records = records.clone();
        tokio::spawn(async move {
            for _ in 0..20 {
                backend.save(&records).await.unwrap();
            }
        })
    };

    while !writer.is_finished() {
        let loaded = backend.load().await.unwrap();
        assert_eq!(loaded.len(), COUNT, "load observed a partially written file");
    }
    writer.await.unwrap();

    assert_eq!(backend.load().await.unwrap(), records);
}
