//! Shared test harness for record backend testing
//!
//! Provides fixture records and the `backend_tests!` macro that validates any
//! `RecordBackend` implementation against the same contract.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod backend_tests;

use facility_store::core::{FacilityRecord, FormatVariant};

// ---------------------------------------------------------------------------
// Fixture records
// ---------------------------------------------------------------------------

/// A record with every attribute populated
pub fn create_test_record(
    region: &str,
    license_number: &str,
    facility_name: &str,
    max_children: u32,
) -> FacilityRecord {
    FacilityRecord {
        region: region.to_string(),
        district: format!("{} District", region),
        license_number: license_number.to_string(),
        facility_name: facility_name.to_string(),
        facility_type: "Child Care Centre".to_string(),
        facility_address_1: format!("{} Main Street", license_number),
        facility_address_2: "Unit 4".to_string(),
        facility_address_3: "Springfield".to_string(),
        max_children,
        max_infants: max_children / 5,
        max_preschool: max_children / 2,
        max_school_age: max_children / 4,
        language_of_service: "English".to_string(),
        operator_id: format!("OP-{}", license_number),
        designated_facility: "Yes".to_string(),
        format: FormatVariant::Standard,
    }
}

/// The canonical three records: capacities 10, 20, 15
pub fn three_records() -> Vec<FacilityRecord> {
    vec![
        create_test_record("Region A", "123", "Facility A", 10),
        create_test_record("Region B", "456", "Facility B", 20),
        create_test_record("Region C", "789", "Facility C", 15),
    ]
}

/// `count` records with distinct license numbers
pub fn numbered_records(count: usize) -> Vec<FacilityRecord> {
    (0..count)
        .map(|i| {
            create_test_record(
                "Region N",
                &format!("L-{:04}", i),
                &format!("Facility {}", i),
                (i % 50) as u32,
            )
        })
        .collect()
}

/// Capacities in snapshot order
pub fn capacities(records: &[FacilityRecord]) -> Vec<u32> {
    records.iter().map(|r| r.max_children).collect()
}

/// License numbers in snapshot order
pub fn licenses(records: &[FacilityRecord]) -> Vec<String> {
    records.iter().map(|r| r.license_number.clone()).collect()
}

/// Write a header plus the canonical three records as a plain CSV export
pub fn write_import_csv(path: &std::path::Path) {
    let mut body = String::from(
        "Region,District,License Number,Facility Name,Facility Type,Address 1,Address 2,Address 3,\
         Max Children,Max Infants,Max Preschool,Max School Age,Language of Service,Operator ID,Designated Facility\n",
    );
    for r in three_records() {
        body.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            r.region,
            r.district,
            r.license_number,
            r.facility_name,
            r.facility_type,
            r.facility_address_1,
            r.facility_address_2,
            r.facility_address_3,
            r.max_children,
            r.max_infants,
            r.max_preschool,
            r.max_school_age,
            r.language_of_service,
            r.operator_id,
            r.designated_facility,
        ));
    }
    std::fs::write(path, body).expect("failed to write import csv");
}
