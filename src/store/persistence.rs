//! Background persistence worker
//!
//! A single long-lived task drains a queue of [`PersistCommand`]s. A `Save`
//! carries no payload: the worker snapshots whatever the store holds when the
//! token is dequeued, so a burst of mutations may collapse into fewer writes.
//! Writers never wait on storage I/O.
//!
//! The worker is the only writer to the backend. An explicit flush is queued
//! as a `SaveAck` so it is ordered after every earlier `Save`.
//!
//! ```text
//! add/delete/edit/sort ──Save──▶ queue ──▶ worker ──snapshot──▶ backend.save
//!                                  ▲
//! shutdown ───────────────Stop─────┘
//! ```

use crate::core::error::BackendError;
use crate::core::service::RecordBackend;
use crate::store::record_store::RecordStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Messages understood by the worker
#[derive(Debug)]
pub enum PersistCommand {
    /// Write the current snapshot
    Save,
    /// Write the current snapshot and report the outcome
    SaveAck(oneshot::Sender<Result<(), BackendError>>),
    /// Exit after everything queued before this token
    Stop,
}

/// What draining the queue behind a write turned up
enum Drained {
    /// Only `Save` tokens, all folded
    Empty,
    /// A `Stop` token
    Stop,
    /// A command that needs its own write
    Next(PersistCommand),
}

/// Counters published by the worker
#[derive(Debug, Default)]
pub struct PersistStats {
    writes: AtomicU64,
    failures: AtomicU64,
    coalesced: AtomicU64,
}

impl PersistStats {
    /// Successful backend writes
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Backend writes that failed
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// `Save` tokens folded into a neighbouring write
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }
}

/// Cheap cloneable sender side of the worker queue
#[derive(Debug, Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistenceHandle {
    /// Enqueue a `Save`; returns `false` when the worker has already exited
    pub fn request_save(&self) -> bool {
        let sent = self.tx.send(PersistCommand::Save).is_ok();
        if !sent {
            tracing::debug!("Persistence worker stopped, save request dropped");
        }
        sent
    }

    /// Enqueue a `Stop`
    pub fn stop(&self) -> bool {
        self.tx.send(PersistCommand::Stop).is_ok()
    }

    /// Enqueue a `SaveAck` and wait for that write to finish
    ///
    /// Returns `None` when the worker exited before handling the request.
    pub async fn flush(&self) -> Option<Result<(), BackendError>> {
        let (ack, done) = oneshot::channel();
        self.tx.send(PersistCommand::SaveAck(ack)).ok()?;
        done.await.ok()
    }
}

/// The worker task state
pub struct PersistenceWorker {
    store: Arc<RecordStore>,
    backend: Arc<dyn RecordBackend>,
    rx: mpsc::UnboundedReceiver<PersistCommand>,
    stats: Arc<PersistStats>,
}

impl PersistenceWorker {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(
        store: Arc<RecordStore>,
        backend: Arc<dyn RecordBackend>,
    ) -> (PersistenceHandle, Arc<PersistStats>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(PersistStats::default());

        let worker = Self {
            store,
            backend,
            rx,
            stats: stats.clone(),
        };
        let handle = tokio::spawn(worker.run());

        (PersistenceHandle { tx }, stats, handle)
    }

    async fn run(mut self) {
        tracing::debug!(backend = self.backend.name(), "Persistence worker started");

        let mut carried = None;
        loop {
            let command = match carried.take() {
                Some(command) => command,
                // Channel closure (every handle dropped) also ends the loop.
                None => match self.rx.recv().await {
                    Some(command) => command,
                    None => break,
                },
            };

            let ack = match command {
                PersistCommand::Save => None,
                PersistCommand::SaveAck(ack) => Some(ack),
                PersistCommand::Stop => break,
            };

            let drained = self.coalesce_pending();
            let result = self.persist().await;
            if let Some(ack) = ack {
                let _ = ack.send(result);
            }

            match drained {
                Drained::Empty => {}
                Drained::Stop => break,
                Drained::Next(command) => carried = Some(command),
            }
        }

        tracing::debug!(
            backend = self.backend.name(),
            writes = self.stats.writes(),
            failures = self.stats.failures(),
            "Persistence worker stopped"
        );
    }

    /// Fold already-queued `Save` tokens into the write about to happen
    ///
    /// Stops at the first `Stop` or `SaveAck`; a `SaveAck` gets a write of
    /// its own so its outcome is reported exactly.
    fn coalesce_pending(&mut self) -> Drained {
        let mut folded = 0;
        let mut drained = Drained::Empty;

        while let Ok(next) = self.rx.try_recv() {
            match next {
                PersistCommand::Save => folded += 1,
                PersistCommand::Stop => {
                    drained = Drained::Stop;
                    break;
                }
                command @ PersistCommand::SaveAck(_) => {
                    drained = Drained::Next(command);
                    break;
                }
            }
        }

        if folded > 0 {
            self.stats.coalesced.fetch_add(folded, Ordering::Relaxed);
        }
        drained
    }

    async fn persist(&mut self) -> Result<(), BackendError> {
        // Guard is released before the backend call.
        let snapshot = self.store.snapshot();

        let result = self.backend.save(&snapshot).await;
        match &result {
            Ok(()) => {
                self.stats.writes.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    backend = self.backend.name(),
                    records = snapshot.len(),
                    coalesced = self.stats.coalesced(),
                    "Snapshot persisted"
                );
            }
            Err(e) => {
                // No retry: the next mutation's Save writes the newer state.
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    backend = self.backend.name(),
                    records = snapshot.len(),
                    error = %e,
                    "Failed to persist snapshot"
                );
            }
        }
        result
    }
}
