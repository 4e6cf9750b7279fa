//! One-shot asynchronous initial population

use crate::core::service::RecordBackend;
use crate::store::record_store::RecordStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Progress of the initial load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotStarted,
    Loading,
    Loaded,
}

/// Populates the store from the backend exactly once
///
/// The state always ends at [`LoadState::Loaded`], even when the backend
/// fails (the store then stays empty), so waiters are never stranded.
#[derive(Debug)]
pub struct LoadCoordinator {
    state: watch::Receiver<LoadState>,
}

impl LoadCoordinator {
    /// Spawn the load task on the current tokio runtime
    pub fn start(store: Arc<RecordStore>, backend: Arc<dyn RecordBackend>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = watch::channel(LoadState::NotStarted);

        let handle = tokio::spawn(async move {
            tx.send_replace(LoadState::Loading);
            tracing::debug!(backend = backend.name(), "Initial load started");
            let started = Instant::now();

            // Backend I/O runs on its own task, before the guard is taken for
            // the install. A panic there still ends in `Loaded`.
            let load = {
                let backend = backend.clone();
                tokio::spawn(async move { backend.load().await })
            };

            match load.await {
                Ok(Ok(records)) => {
                    let held = store.install(records);
                    tracing::info!(
                        backend = backend.name(),
                        records = held,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Initial load complete"
                    );
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        backend = backend.name(),
                        error = %e,
                        "Initial load failed, starting with an empty store"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        backend = backend.name(),
                        error = %e,
                        "Initial load task aborted, starting with an empty store"
                    );
                }
            }

            tx.send_replace(LoadState::Loaded);
        });

        (Self { state: rx }, handle)
    }

    pub fn state(&self) -> LoadState {
        *self.state.borrow()
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == LoadState::Loaded
    }

    /// Wait up to `timeout` for the load to finish
    ///
    /// Returns immediately when already loaded; `false` on expiry or if the
    /// load task died before finishing.
    pub async fn wait_until_loaded(&self, timeout: Duration) -> bool {
        if self.is_loaded() {
            return true;
        }

        let mut state = self.state.clone();
        matches!(
            tokio::time::timeout(timeout, state.wait_for(|s| *s == LoadState::Loaded)).await,
            Ok(Ok(_))
        )
    }
}
