//! Typed error handling for the facility record store
//!
//! Two layers mirror how the store is built:
//!
//! - [`StoreError`]: everything a caller of the store can observe. Each variant
//!   is recoverable; the in-memory store is never left half-updated.
//! - [`BackendError`]: failures raised by a durable backend while loading or
//!   saving. These surface to callers wrapped in [`StoreError::Persistence`]
//!   and are only logged when they happen on the background worker.
//!
//! # Example
//!
//! ```rust,ignore
//! use facility_store::prelude::*;
//!
//! match manager.delete_record(42).await {
//!     Ok(removed) => println!("Removed {}", removed.license_number),
//!     Err(StoreError::IndexOutOfRange { index, len }) => {
//!         println!("No record at {} (store holds {})", index, len);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// The error type returned by store operations
#[derive(Debug)]
pub enum StoreError {
    /// Positional index outside `[0, len)`
    IndexOutOfRange { index: usize, len: usize },

    /// Unknown record attribute requested as a sort key
    InvalidSortField { field: String },

    /// Unknown container representation requested
    UnsupportedContainerKind { kind: String },

    /// Initial population did not finish within the bounded wait
    LoadTimeout { waited: Duration },

    /// A record to remove was not present in the active container
    RecordNotFound { license_number: String },

    /// Durable backend failure
    Persistence(BackendError),

    /// Internal errors (a background task panicked or was torn down)
    Internal(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for {} records", index, len)
            }
            StoreError::InvalidSortField { field } => {
                write!(f, "'{}' is not a sortable record field", field)
            }
            StoreError::UnsupportedContainerKind { kind } => {
                write!(f, "Unsupported container kind: {}", kind)
            }
            StoreError::LoadTimeout { waited } => {
                write!(
                    f,
                    "Records were not loaded within {} ms",
                    waited.as_millis()
                )
            }
            StoreError::RecordNotFound { license_number } => {
                write!(f, "Record with license '{}' not found", license_number)
            }
            StoreError::Persistence(e) => write!(f, "Persistence error: {}", e),
            StoreError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl StoreError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            StoreError::InvalidSortField { .. } => "INVALID_SORT_FIELD",
            StoreError::UnsupportedContainerKind { .. } => "UNSUPPORTED_CONTAINER_KIND",
            StoreError::LoadTimeout { .. } => "LOAD_TIMEOUT",
            StoreError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            StoreError::Persistence(_) => "PERSISTENCE_ERROR",
            StoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the same call later can succeed without caller changes
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::LoadTimeout { .. } | StoreError::Persistence(_)
        )
    }
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        StoreError::Persistence(err)
    }
}

/// Errors raised by durable backends
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[cfg(feature = "lmdb")]
    #[error("LMDB error: {0}")]
    Lmdb(#[from] heed::Error),

    /// A blocking backend call could not be joined
    #[error("{backend} task failed: {message}")]
    Task {
        backend: &'static str,
        message: String,
    },

    /// Backend refused the call (injected failures, closed pools)
    #[error("{backend} backend is unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },
}
