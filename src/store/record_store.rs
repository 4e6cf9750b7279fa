//! The single guarded record collection
//!
//! Every read and write goes through one mutex around the active
//! [`Container`]. Callers only ever receive copies; the guard is held for the
//! in-memory operation alone and never across backend I/O.
//!
//! Indices are positional. Any delete, edit or sort shifts the meaning of
//! later indices, so callers must not cache them across operations that can
//! race with a background sort.

use crate::core::container::{Container, ContainerKind};
use crate::core::error::StoreError;
use crate::core::record::{FacilityRecord, FormatVariant};
use std::sync::{Mutex, PoisonError};

/// Shared mutable sequence of records plus its guard
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: Mutex<Container>,
}

impl RecordStore {
    /// Create an empty store in the given representation
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            inner: Mutex::new(Container::new(kind)),
        }
    }

    /// Run `f` against the container while holding the guard
    ///
    /// A poisoned guard is recovered: each mutation completes or does not
    /// start, so the container is never left half-updated.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut Container) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Append a record
    pub fn add(&self, record: FacilityRecord) {
        self.with_lock(|c| {
            c.add(record);
        });
    }

    /// Remove the record at `index`
    pub fn delete(&self, index: usize) -> Result<FacilityRecord, StoreError> {
        self.with_lock(|c| {
            let len = c.len();
            c.remove_at(index)
                .ok_or(StoreError::IndexOutOfRange { index, len })
        })
    }

    /// Replace the record at `index`, returning the previous one
    pub fn edit(&self, index: usize, record: FacilityRecord) -> Result<FacilityRecord, StoreError> {
        self.with_lock(|c| {
            let len = c.len();
            c.replace_at(index, record)
                .ok_or(StoreError::IndexOutOfRange { index, len })
        })
    }

    /// Copy of the record at `index`
    pub fn get(&self, index: usize) -> Result<FacilityRecord, StoreError> {
        self.with_lock(|c| {
            c.get(index).cloned().ok_or(StoreError::IndexOutOfRange {
                index,
                len: c.len(),
            })
        })
    }

    /// Shallow copy of the current sequence for iteration outside the guard
    pub fn snapshot(&self) -> Vec<FacilityRecord> {
        self.with_lock(|c| c.get_all())
    }

    pub fn len(&self) -> usize {
        self.with_lock(|c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ContainerKind {
        self.with_lock(|c| c.kind())
    }

    /// Replace the whole contents, rebuilding in the active representation
    ///
    /// Returns the number of records held afterwards.
    pub fn install(&self, records: Vec<FacilityRecord>) -> usize {
        self.with_lock(|c| {
            *c = Container::from_records(c.kind(), records);
            c.len()
        })
    }

    /// Switch representation
    ///
    /// Returns the previous kind and how many records the rebuild dropped.
    pub fn change_kind(&self, kind: ContainerKind) -> (ContainerKind, usize) {
        self.with_lock(|c| {
            let from = c.kind();
            let before = c.len();
            let current = std::mem::take(c);
            *c = current.convert(kind);
            (from, before - c.len())
        })
    }

    /// Set the presentation format of every record
    pub fn set_format(&self, format: FormatVariant) {
        self.with_lock(|c| c.for_each_mut(|r| r.format = format));
    }
}
