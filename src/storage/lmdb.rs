//! LMDB storage backend using heed (memory-mapped B-tree).
//!
//! LMDB is an embedded key-value store; no external server is required.
//! All operations are synchronous (memory-mapped I/O) and are wrapped in
//! `tokio::task::spawn_blocking` for async compatibility.
//!
//! # Databases (named LMDB sub-databases)
//!
//! - `records`: key = zero-padded sequence position, value = JSON record
//!
//! Zero-padded keys make LMDB's lexicographic key order equal to the stored
//! sequence order.
//!
//! # Feature flag
//!
//! Enable with `--features lmdb`. Requires the `heed` crate.

use crate::core::error::BackendError;
use crate::core::record::FacilityRecord;
use crate::core::service::RecordBackend;
use async_trait::async_trait;
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

/// Encode a record as JSON bytes for LMDB storage.
fn lmdb_encode(record: &FacilityRecord) -> Result<Vec<u8>, BackendError> {
    Ok(serde_json::to_vec(record)?)
}

/// Decode a record from JSON bytes.
fn lmdb_decode(bytes: &[u8]) -> Result<FacilityRecord, BackendError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn position_key(position: usize) -> String {
    format!("{:010}", position)
}

fn task_error(e: tokio::task::JoinError) -> BackendError {
    BackendError::Task {
        backend: "lmdb",
        message: e.to_string(),
    }
}

/// LMDB-backed record storage.
///
/// The `Env` is wrapped in an `Arc` for cheap cloning across blocking tasks.
///
/// # Example
///
/// ```rust,ignore
/// use facility_store::storage::LmdbBackend;
///
/// let backend = LmdbBackend::open("/tmp/facility-lmdb")?;
/// backend.save(&records).await?;
/// ```
#[derive(Clone)]
pub struct LmdbBackend {
    env: Arc<Env>,
    db: Database<Str, Bytes>,
}

impl LmdbBackend {
    /// Open (or create) an LMDB environment at `path` and initialise the
    /// `records` named database.
    ///
    /// The map size defaults to 256 MB. LMDB will not actually allocate that
    /// much; it is a virtual address space reservation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        std::fs::create_dir_all(path.as_ref())?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(256 * 1024 * 1024)
                .max_dbs(4)
                .max_readers(126)
                .open(path.as_ref())?
        };

        let mut wtxn = env.write_txn()?;
        let db: Database<Str, Bytes> = env.create_database(&mut wtxn, Some("records"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            db,
        })
    }
}

#[async_trait]
impl RecordBackend for LmdbBackend {
    fn name(&self) -> &'static str {
        "lmdb"
    }

    /// The database is created by [`LmdbBackend::open`]; this only checks
    /// that the environment still accepts a read transaction.
    async fn initialize(&self) -> Result<(), BackendError> {
        let env = self.env.clone();

        tokio::task::spawn_blocking(move || {
            let rtxn = env.read_txn()?;
            drop(rtxn);
            Ok(())
        })
        .await
        .map_err(task_error)?
    }

    async fn load(&self) -> Result<Vec<FacilityRecord>, BackendError> {
        let env = self.env.clone();
        let db = self.db;

        tokio::task::spawn_blocking(move || {
            let rtxn = env.read_txn()?;
            let mut results = Vec::new();
            for item in db.iter(&rtxn)? {
                let (_key, bytes) = item?;
                results.push(lmdb_decode(bytes)?);
            }
            Ok(results)
        })
        .await
        .map_err(task_error)?
    }

    async fn save(&self, records: &[FacilityRecord]) -> Result<(), BackendError> {
        let env = self.env.clone();
        let db = self.db;
        let encoded = records
            .iter()
            .map(lmdb_encode)
            .collect::<Result<Vec<_>, _>>()?;

        tokio::task::spawn_blocking(move || {
            let mut wtxn = env.write_txn()?;
            db.clear(&mut wtxn)?;
            for (position, bytes) in encoded.iter().enumerate() {
                db.put(&mut wtxn, &position_key(position), bytes)?;
            }
            wtxn.commit()?;
            Ok(())
        })
        .await
        .map_err(task_error)?
    }
}
