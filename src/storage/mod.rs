//! Storage implementations for different backends

pub mod csv;
pub mod in_memory;
#[cfg(feature = "lmdb")]
pub mod lmdb;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use self::csv::{CsvBackend, read_csv_records, write_csv_records};
pub use in_memory::InMemoryBackend;
#[cfg(feature = "lmdb")]
pub use lmdb::LmdbBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;

use crate::config::BackendConfig;
use crate::core::error::BackendError;
use crate::core::service::RecordBackend;
use std::sync::Arc;

/// Open and initialize the configured backend
pub async fn open_backend(config: &BackendConfig) -> Result<Arc<dyn RecordBackend>, BackendError> {
    let backend: Arc<dyn RecordBackend> = match config {
        BackendConfig::InMemory => Arc::new(InMemoryBackend::new()),
        BackendConfig::Csv { path } => Arc::new(CsvBackend::new(path.clone())),
        #[cfg(feature = "sqlite")]
        BackendConfig::Sqlite { url, pool_size } => {
            Arc::new(SqliteBackend::connect(url, *pool_size).await?)
        }
        #[cfg(not(feature = "sqlite"))]
        BackendConfig::Sqlite { .. } => {
            return Err(BackendError::Unavailable {
                backend: "sqlite",
                message: "compiled without the `sqlite` feature".to_string(),
            });
        }
        #[cfg(feature = "lmdb")]
        BackendConfig::Lmdb { path } => Arc::new(LmdbBackend::open(path)?),
        #[cfg(not(feature = "lmdb"))]
        BackendConfig::Lmdb { .. } => {
            return Err(BackendError::Unavailable {
                backend: "lmdb",
                message: "compiled without the `lmdb` feature".to_string(),
            });
        }
    };

    backend.initialize().await?;
    tracing::debug!(backend = backend.name(), "Backend initialized");
    Ok(backend)
}
