//! # Facility Store
//!
//! A concurrent in-memory store of licensed facility records with durable
//! backing storage.
//!
//! ## Features
//!
//! - **Single Guard**: every read and write goes through one mutex, held only
//!   for the in-memory operation and never across backend I/O
//! - **Asynchronous Load**: the store populates itself in the background;
//!   mutations wait for it with a bounded timeout
//! - **Background Persistence**: a worker drains `Save` tokens and writes the
//!   latest snapshot, collapsing bursts into fewer writes
//! - **Background Sorting**: quick, merge or built-in stable sort by any
//!   attribute, installed atomically without blocking the caller
//! - **Switchable Containers**: sequence, license-keyed map or value set
//! - **Pluggable Backends**: in-memory, CSV, SQLite (`sqlite`), LMDB (`lmdb`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use facility_store::prelude::*;
//!
//! let backend = open_backend(&BackendConfig::Csv { path: "records.csv".into() }).await?;
//! let manager = FacilityManager::start(backend, StoreConfig::default());
//!
//! manager.add_record(FacilityRecord {
//!     license_number: "L-100".to_string(),
//!     facility_name: "Sunrise Centre".to_string(),
//!     max_children: 24,
//!     ..Default::default()
//! }).await?;
//!
//! let sorted = manager.sort_records("max_children", SortAlgorithm::Merge, None).await?;
//! sorted.wait().await?;
//!
//! for record in manager.snapshot_records() {
//!     println!("{}", record);
//! }
//!
//! manager.shutdown().await;
//! ```

pub mod config;
pub mod core;
pub mod storage;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BackendError, Container, ContainerKind, FacilityRecord, FieldValue, FormatVariant,
        RecordBackend, RecordField, SortAlgorithm, StoreError, render, sortable_fields,
    };

    // === Store ===
    pub use crate::store::{
        FacilityManager, LoadState, PersistStats, RecordStore, SortCallback, SortHandle,
        SortOutcome,
    };

    // === Storage ===
    pub use crate::storage::{CsvBackend, InMemoryBackend, open_backend};
    #[cfg(feature = "lmdb")]
    pub use crate::storage::LmdbBackend;
    #[cfg(feature = "sqlite")]
    pub use crate::storage::SqliteBackend;

    // === Config ===
    pub use crate::config::{BackendConfig, StoreConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
