//! Background sorting off the caller's path
//!
//! Each request becomes one task: snapshot, order with the chosen strategy on
//! the blocking pool, install under the guard, then enqueue a `Save`.
//!
//! Sort tasks are not serialized against each other or against direct
//! mutations. Two concurrent sorts both snapshot and both install; the last
//! install wins. A mutation landing between a sort's snapshot and its install
//! is overwritten by that install. Each install is atomic, so readers only
//! ever see a complete ordering.

use crate::core::error::StoreError;
use crate::core::field::RecordField;
use crate::core::sorting::SortAlgorithm;
use crate::store::persistence::PersistenceHandle;
use crate::store::record_store::RecordStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Summary of a finished sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    pub field: RecordField,
    pub algorithm: SortAlgorithm,
    pub records: usize,
    pub elapsed: Duration,
}

/// Completion callback, invoked from the sort task
pub type SortCallback = Box<dyn FnOnce(&Result<SortOutcome, StoreError>) + Send + 'static>;

/// Handle to a running sort
///
/// Dropping the handle detaches the task; it still runs to completion.
#[derive(Debug)]
pub struct SortHandle {
    handle: JoinHandle<Result<SortOutcome, StoreError>>,
}

impl SortHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the sort to be installed
    pub async fn wait(self) -> Result<SortOutcome, StoreError> {
        self.handle
            .await
            .map_err(|e| StoreError::Internal(format!("sort task failed: {}", e)))?
    }
}

/// Spawns sort tasks against a shared store
#[derive(Debug, Clone)]
pub struct SortCoordinator {
    store: Arc<RecordStore>,
    persistence: PersistenceHandle,
}

impl SortCoordinator {
    pub fn new(store: Arc<RecordStore>, persistence: PersistenceHandle) -> Self {
        Self { store, persistence }
    }

    /// Start a sort and return immediately
    pub fn spawn(
        &self,
        field: RecordField,
        algorithm: SortAlgorithm,
        on_complete: Option<SortCallback>,
    ) -> SortHandle {
        let store = self.store.clone();
        let persistence = self.persistence.clone();

        let handle = tokio::spawn(async move {
            let result = run_sort(&store, &persistence, field, algorithm).await;
            if let Some(callback) = on_complete {
                callback(&result);
            }
            result
        });

        SortHandle { handle }
    }
}

async fn run_sort(
    store: &RecordStore,
    persistence: &PersistenceHandle,
    field: RecordField,
    algorithm: SortAlgorithm,
) -> Result<SortOutcome, StoreError> {
    let started = Instant::now();
    let snapshot = store.snapshot();
    tracing::debug!(%field, %algorithm, records = snapshot.len(), "Sort started");

    let sorted = tokio::task::spawn_blocking(move || algorithm.sort(snapshot, field))
        .await
        .map_err(|e| {
            tracing::error!(%field, %algorithm, error = %e, "Sort computation failed");
            StoreError::Internal(format!("sort computation failed: {}", e))
        })?;

    let records = store.install(sorted);
    persistence.request_save();

    let outcome = SortOutcome {
        field,
        algorithm,
        records,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        %field,
        %algorithm,
        records,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Sort installed"
    );
    Ok(outcome)
}
