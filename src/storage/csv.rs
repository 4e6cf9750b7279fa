//! CSV file backend and import reader
//!
//! Layout: one header row, then 15 columns per record in declaration order.
//! Files written by [`CsvBackend`] add a trailing `Record Type` column holding
//! the format tag; plain open-data exports without it load as `Standard`.
//!
//! Saves write a temporary file in the target's directory and rename it over
//! the target, so a concurrent reader sees either the old or the new file and
//! an interrupted save leaves the old file in place.

use crate::core::error::BackendError;
use crate::core::record::{FacilityRecord, FormatVariant, parse_capacity};
use crate::core::service::RecordBackend;
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const HEADER: [&str; 16] = [
    "Region",
    "District",
    "License Number",
    "Facility Name",
    "Facility Type",
    "Address 1",
    "Address 2",
    "Address 3",
    "Max Children",
    "Max Infants",
    "Max Preschool",
    "Max School Age",
    "Language of Service",
    "Operator ID",
    "Designated Facility",
    "Record Type",
];

fn record_from_row(row: &StringRecord) -> FacilityRecord {
    let text = |i: usize| row.get(i).unwrap_or("").to_string();
    let count = |i: usize| row.get(i).map(parse_capacity).unwrap_or(0);

    FacilityRecord {
        region: text(0),
        district: text(1),
        license_number: text(2),
        facility_name: text(3),
        facility_type: text(4),
        facility_address_1: text(5),
        facility_address_2: text(6),
        facility_address_3: text(7),
        max_children: count(8),
        max_infants: count(9),
        max_preschool: count(10),
        max_school_age: count(11),
        language_of_service: text(12),
        operator_id: text(13),
        designated_facility: text(14),
        format: row
            .get(15)
            .map(FormatVariant::from_tag)
            .unwrap_or_default(),
    }
}

/// Read every record from a CSV file, skipping the header row
///
/// Short rows are padded with empty text and zero capacities.
pub fn read_csv_records(path: &Path) -> Result<Vec<FacilityRecord>, BackendError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(record_from_row(&row?));
    }
    Ok(records)
}

/// Atomically replace the CSV file at `path` with `records`
pub fn write_csv_records(path: &Path, records: &[FacilityRecord]) -> Result<(), BackendError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let staging = NamedTempFile::new_in(dir)?;

    let mut writer = WriterBuilder::new().from_writer(staging);
    writer.write_record(HEADER)?;

    for r in records {
        let counts = [
            r.max_children.to_string(),
            r.max_infants.to_string(),
            r.max_preschool.to_string(),
            r.max_school_age.to_string(),
        ];
        writer.write_record([
            r.region.as_str(),
            &r.district,
            &r.license_number,
            &r.facility_name,
            &r.facility_type,
            &r.facility_address_1,
            &r.facility_address_2,
            &r.facility_address_3,
            &counts[0],
            &counts[1],
            &counts[2],
            &counts[3],
            &r.language_of_service,
            &r.operator_id,
            &r.designated_facility,
            r.format.as_tag(),
        ])?;
    }

    writer.flush()?;
    let staging = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    staging.as_file().sync_all()?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// CSV-file-backed record storage
///
/// Every save rewrites the whole file. File I/O runs on the blocking pool.
#[derive(Clone, Debug)]
pub struct CsvBackend {
    path: PathBuf,
}

impl CsvBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn task_error(e: tokio::task::JoinError) -> BackendError {
    BackendError::Task {
        backend: "csv",
        message: e.to_string(),
    }
}

#[async_trait]
impl RecordBackend for CsvBackend {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn initialize(&self) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn load(&self) -> Result<Vec<FacilityRecord>, BackendError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_csv_records(&path))
            .await
            .map_err(task_error)?
    }

    async fn save(&self, records: &[FacilityRecord]) -> Result<(), BackendError> {
        let path = self.path.clone();
        let records = records.to_vec();
        tokio::task::spawn_blocking(move || write_csv_records(&path, &records))
            .await
            .map_err(task_error)?
    }
}
