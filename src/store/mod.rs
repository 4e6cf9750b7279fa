//! Concurrent record store: guard, loader, persistence worker and sorting

pub mod loader;
pub mod manager;
pub mod persistence;
pub mod record_store;
pub mod sort;

pub use loader::{LoadCoordinator, LoadState};
pub use manager::FacilityManager;
pub use persistence::{PersistCommand, PersistStats, PersistenceHandle, PersistenceWorker};
pub use record_store::RecordStore;
pub use sort::{SortCallback, SortCoordinator, SortHandle, SortOutcome};
