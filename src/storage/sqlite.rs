//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteBackend` backed by a pooled `sqlx::SqlitePool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag:
//! ```toml
//! [dependencies]
//! facility-store = { version = "0.1", features = ["sqlite"] }
//! ```
//!
//! # Schema
//!
//! One row per record in `FacilityRecords`, one column per attribute plus a
//! `record_type` column holding the format tag. Row order (`id`) is the
//! stored sequence order.

use crate::core::error::BackendError;
use crate::core::record::{FacilityRecord, FormatVariant};
use crate::core::service::RecordBackend;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

const COLUMNS: &str = "region, district, license_number, facility_name, facility_type, \
     facility_address_1, facility_address_2, facility_address_3, \
     max_children, max_infants, max_preschool, max_school_age, \
     language_of_service, operator_id, designated_facility, record_type";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required table and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), BackendError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS FacilityRecords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            region TEXT NOT NULL DEFAULT '',
            district TEXT NOT NULL DEFAULT '',
            license_number TEXT NOT NULL DEFAULT '',
            facility_name TEXT NOT NULL DEFAULT '',
            facility_type TEXT NOT NULL DEFAULT '',
            facility_address_1 TEXT NOT NULL DEFAULT '',
            facility_address_2 TEXT NOT NULL DEFAULT '',
            facility_address_3 TEXT NOT NULL DEFAULT '',
            max_children INTEGER NOT NULL DEFAULT 0,
            max_infants INTEGER NOT NULL DEFAULT 0,
            max_preschool INTEGER NOT NULL DEFAULT 0,
            max_school_age INTEGER NOT NULL DEFAULT 0,
            language_of_service TEXT NOT NULL DEFAULT '',
            operator_id TEXT NOT NULL DEFAULT '',
            designated_facility TEXT NOT NULL DEFAULT '',
            record_type TEXT NOT NULL DEFAULT 'standard'
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_license_number ON FacilityRecords(license_number)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_facility_name ON FacilityRecords(facility_name)")
        .execute(pool)
        .await?;

    Ok(())
}

fn capacity(row: &SqliteRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: Option<i64> = row.try_get(column)?;
    Ok(value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0))
}

fn record_from_row(row: &SqliteRow) -> Result<FacilityRecord, sqlx::Error> {
    let record_type: String = row.try_get("record_type")?;

    Ok(FacilityRecord {
        region: row.try_get("region")?,
        district: row.try_get("district")?,
        license_number: row.try_get("license_number")?,
        facility_name: row.try_get("facility_name")?,
        facility_type: row.try_get("facility_type")?,
        facility_address_1: row.try_get("facility_address_1")?,
        facility_address_2: row.try_get("facility_address_2")?,
        facility_address_3: row.try_get("facility_address_3")?,
        max_children: capacity(row, "max_children")?,
        max_infants: capacity(row, "max_infants")?,
        max_preschool: capacity(row, "max_preschool")?,
        max_school_age: capacity(row, "max_school_age")?,
        language_of_service: row.try_get("language_of_service")?,
        operator_id: row.try_get("operator_id")?,
        designated_facility: row.try_get("designated_facility")?,
        format: FormatVariant::from_tag(&record_type),
    })
}

// ---------------------------------------------------------------------------
// SqliteBackend
// ---------------------------------------------------------------------------

/// Record storage backed by SQLite.
///
/// # Example
///
/// ```rust,ignore
/// use facility_store::storage::SqliteBackend;
///
/// let backend = SqliteBackend::connect("sqlite://facility_records.db", 5).await?;
/// backend.initialize().await?;
/// ```
#[derive(Clone, Debug)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Create a new backend from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`, creating the database file if missing
    pub async fn connect(url: &str, pool_size: u32) -> Result<Self, BackendError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// In-memory database on a single connection that is never recycled
    pub async fn in_memory() -> Result<Self, BackendError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), BackendError> {
        ensure_schema(&self.pool).await
    }

    async fn load(&self) -> Result<Vec<FacilityRecord>, BackendError> {
        let sql = format!("SELECT {} FROM FacilityRecords ORDER BY id", COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| record_from_row(row).map_err(BackendError::from))
            .collect()
    }

    async fn save(&self, records: &[FacilityRecord]) -> Result<(), BackendError> {
        let insert = format!(
            "INSERT INTO FacilityRecords ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            COLUMNS
        );

        // Full replace in one transaction; a failure leaves the old rows.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM FacilityRecords")
            .execute(&mut *tx)
            .await?;

        for r in records {
            sqlx::query(&insert)
                .bind(&r.region)
                .bind(&r.district)
                .bind(&r.license_number)
                .bind(&r.facility_name)
                .bind(&r.facility_type)
                .bind(&r.facility_address_1)
                .bind(&r.facility_address_2)
                .bind(&r.facility_address_3)
                .bind(i64::from(r.max_children))
                .bind(i64::from(r.max_infants))
                .bind(i64::from(r.max_preschool))
                .bind(i64::from(r.max_school_age))
                .bind(&r.language_of_service)
                .bind(&r.operator_id)
                .bind(&r.designated_facility)
                .bind(r.format.as_tag())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
