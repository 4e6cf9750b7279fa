//! Public entry point tying the store, loader, persistence and sorting together

use crate::config::StoreConfig;
use crate::core::container::ContainerKind;
use crate::core::error::{BackendError, StoreError};
use crate::core::field::{RecordField, sortable_fields};
use crate::core::record::{FacilityRecord, FormatVariant};
use crate::core::service::RecordBackend;
use crate::core::sorting::SortAlgorithm;
use crate::store::loader::{LoadCoordinator, LoadState};
use crate::store::persistence::{PersistStats, PersistenceHandle, PersistenceWorker};
use crate::store::record_store::RecordStore;
use crate::store::sort::{SortCallback, SortCoordinator, SortHandle};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Concurrent facility record manager
///
/// Construction starts the persistence worker and the initial load. Every
/// mutating call first waits (bounded by `load_timeout`) for the load to
/// finish, holds the store guard only for the in-memory change, then
/// enqueues a background save.
///
/// Must be created inside a tokio runtime.
///
/// # Example
///
/// ```rust,ignore
/// use facility_store::prelude::*;
///
/// let backend = Arc::new(InMemoryBackend::new());
/// let manager = FacilityManager::start(backend, StoreConfig::default());
///
/// manager.add_record(record).await?;
/// manager
///     .sort_records("max_children", SortAlgorithm::Merge, None)
///     .await?
///     .wait()
///     .await?;
/// manager.shutdown().await;
/// ```
pub struct FacilityManager {
    store: Arc<RecordStore>,
    backend: Arc<dyn RecordBackend>,
    loader: LoadCoordinator,
    persistence: PersistenceHandle,
    stats: Arc<PersistStats>,
    sorter: SortCoordinator,
    worker: Mutex<Option<JoinHandle<()>>>,
    load_timeout: Duration,
}

impl FacilityManager {
    /// Initialize the backend, then start the manager
    pub async fn open(
        backend: Arc<dyn RecordBackend>,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        backend.initialize().await?;
        Ok(Self::start(backend, config))
    }

    /// Start the persistence worker and the initial load
    pub fn start(backend: Arc<dyn RecordBackend>, config: StoreConfig) -> Self {
        let store = Arc::new(RecordStore::new(config.container));
        let (persistence, stats, worker) = PersistenceWorker::spawn(store.clone(), backend.clone());
        let (loader, _load_task) = LoadCoordinator::start(store.clone(), backend.clone());
        let sorter = SortCoordinator::new(store.clone(), persistence.clone());

        tracing::info!(
            backend = backend.name(),
            container = %config.container,
            load_timeout_ms = config.load_timeout.as_millis() as u64,
            "Facility manager started"
        );

        Self {
            store,
            backend,
            loader,
            persistence,
            stats,
            sorter,
            worker: Mutex::new(Some(worker)),
            load_timeout: config.load_timeout,
        }
    }

    async fn ensure_loaded(&self) -> Result<(), StoreError> {
        if self.loader.wait_until_loaded(self.load_timeout).await {
            Ok(())
        } else {
            tracing::warn!(
                waited_ms = self.load_timeout.as_millis() as u64,
                "Records not loaded in time, operation aborted"
            );
            Err(StoreError::LoadTimeout {
                waited: self.load_timeout,
            })
        }
    }

    /// Append a record
    pub async fn add_record(&self, record: FacilityRecord) -> Result<(), StoreError> {
        self.ensure_loaded().await?;
        self.store.add(record);
        self.persistence.request_save();
        Ok(())
    }

    /// Remove the record at `index`, returning it
    pub async fn delete_record(&self, index: usize) -> Result<FacilityRecord, StoreError> {
        self.ensure_loaded().await?;
        let removed = self.store.delete(index)?;
        self.persistence.request_save();
        Ok(removed)
    }

    /// Replace the record at `index`, returning the previous one
    pub async fn edit_record(
        &self,
        index: usize,
        record: FacilityRecord,
    ) -> Result<FacilityRecord, StoreError> {
        self.ensure_loaded().await?;
        let previous = self.store.edit(index, record)?;
        self.persistence.request_save();
        Ok(previous)
    }

    /// Copy of the record at `index`
    pub fn get_record(&self, index: usize) -> Result<FacilityRecord, StoreError> {
        self.store.get(index)
    }

    /// Start a background sort by attribute name
    ///
    /// Fails fast with `InvalidSortField` before anything is spawned. The
    /// returned handle may be awaited or dropped.
    pub async fn sort_records(
        &self,
        field: &str,
        algorithm: SortAlgorithm,
        on_complete: Option<SortCallback>,
    ) -> Result<SortHandle, StoreError> {
        let field: RecordField = field.parse()?;
        self.ensure_loaded().await?;
        Ok(self.sorter.spawn(field, algorithm, on_complete))
    }

    /// Rebuild the collection in another representation
    ///
    /// Returns the number of records the rebuild dropped (duplicate license
    /// numbers for `Map`, duplicate values for `Set`).
    pub async fn change_container_kind(&self, kind: ContainerKind) -> Result<usize, StoreError> {
        self.ensure_loaded().await?;
        let (from, dropped) = self.store.change_kind(kind);
        if dropped > 0 {
            tracing::warn!(%from, to = %kind, dropped, "Container change dropped duplicate records");
        } else {
            tracing::info!(%from, to = %kind, "Container kind changed");
        }
        self.persistence.request_save();
        Ok(dropped)
    }

    /// Switch every record to a presentation format
    pub async fn change_format(&self, format: FormatVariant) -> Result<(), StoreError> {
        self.ensure_loaded().await?;
        self.store.set_format(format);
        self.persistence.request_save();
        Ok(())
    }

    /// Copy of every record, taken under the guard
    pub fn snapshot_records(&self) -> Vec<FacilityRecord> {
        self.store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Attribute names accepted by [`FacilityManager::sort_records`]
    pub fn sortable_fields(&self) -> Vec<&'static str> {
        sortable_fields()
    }

    pub fn container_kind(&self) -> ContainerKind {
        self.store.kind()
    }

    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    pub async fn wait_for_load(&self, timeout: Duration) -> bool {
        self.loader.wait_until_loaded(timeout).await
    }

    pub fn persistence_stats(&self) -> &PersistStats {
        &self.stats
    }

    /// Discard in-memory state and repopulate from the backend
    pub async fn reload(&self) -> Result<usize, StoreError> {
        self.ensure_loaded().await?;
        let records = self.backend.load().await?;
        let held = self.store.install(records);
        tracing::info!(backend = self.backend.name(), records = held, "Records reloaded");
        Ok(held)
    }

    /// Write the current snapshot now, surfacing any backend error
    ///
    /// The write goes through the persistence worker after every queued
    /// `Save`, so it is never overtaken by an older snapshot. Fails once the
    /// worker has been shut down.
    pub async fn save_now(&self) -> Result<(), StoreError> {
        self.ensure_loaded().await?;
        match self.persistence.flush().await {
            Some(result) => {
                result?;
                tracing::info!(backend = self.backend.name(), "Records saved");
                Ok(())
            }
            None => Err(StoreError::Persistence(BackendError::Unavailable {
                backend: self.backend.name(),
                message: "persistence worker stopped".to_string(),
            })),
        }
    }

    /// Stop the persistence worker after it drains queued saves
    pub async fn shutdown(&self) {
        self.persistence.stop();
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Persistence worker terminated abnormally");
            }
        }
    }
}

impl Drop for FacilityManager {
    fn drop(&mut self) {
        let running = self
            .worker
            .get_mut()
            .map(|w| w.is_some())
            .unwrap_or(false);
        if running {
            self.persistence.stop();
        }
    }
}
