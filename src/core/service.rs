//! Durable backend contract consumed by the record store

use crate::core::error::BackendError;
use crate::core::record::FacilityRecord;
use async_trait::async_trait;
use std::path::Path;

/// Service trait for durable record storage
///
/// A backend owns its target (file, database, environment) from construction.
/// The store never holds its guard across any of these calls.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &'static str;

    /// Prepare schema or files; safe to call on every startup
    async fn initialize(&self) -> Result<(), BackendError>;

    /// Read every stored record in stored order
    async fn load(&self) -> Result<Vec<FacilityRecord>, BackendError>;

    /// Replace the stored contents with `records`
    async fn save(&self, records: &[FacilityRecord]) -> Result<(), BackendError>;

    /// Append the rows of a CSV export to the stored contents
    ///
    /// Returns the number of records imported.
    async fn migrate(&self, csv_path: &Path) -> Result<usize, BackendError> {
        let path = csv_path.to_path_buf();
        let imported = tokio::task::spawn_blocking(move || crate::storage::read_csv_records(&path))
            .await
            .map_err(|e| BackendError::Task {
                backend: "csv",
                message: e.to_string(),
            })??;

        let count = imported.len();
        let mut records = self.load().await?;
        records.extend(imported);
        self.save(&records).await?;

        tracing::info!(
            backend = self.name(),
            source = %csv_path.display(),
            imported = count,
            "Migrated CSV records"
        );
        Ok(count)
    }
}
