//! In-memory implementation of RecordBackend for testing and development

use crate::core::error::BackendError;
use crate::core::record::FacilityRecord;
use crate::core::service::RecordBackend;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// In-memory record backend
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Clones share the same storage, so a test can keep one clone to inspect
/// what the store persisted.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    records: Arc<RwLock<Vec<FacilityRecord>>>,
    load_delay: Option<Duration>,
    save_delay: Option<Duration>,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with `records`
    pub fn with_records(records: Vec<FacilityRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::default()
        }
    }

    /// Delay every `load` by `delay`
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Delay every `save` by `delay` before it writes
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of what is currently stored
    pub fn stored(&self) -> Vec<FacilityRecord> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    async fn initialize(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<FacilityRecord>, BackendError> {
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }

        let records = self.records.read().map_err(|e| BackendError::Unavailable {
            backend: "in_memory",
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(records.clone())
    }

    async fn save(&self, records: &[FacilityRecord]) -> Result<(), BackendError> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable {
                backend: "in_memory",
                message: "saves are disabled".to_string(),
            });
        }

        let mut stored = self.records.write().map_err(|e| BackendError::Unavailable {
            backend: "in_memory",
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        *stored = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}
