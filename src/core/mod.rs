//! Core module containing the record model, container shapes and sorting

pub mod container;
pub mod error;
pub mod field;
pub mod record;
pub mod service;
pub mod sorting;

pub use container::{Container, ContainerKind};
pub use error::{BackendError, StoreError};
pub use field::{FieldValue, RecordField, sortable_fields};
pub use record::{FacilityRecord, FormatVariant, parse_capacity, render};
pub use service::RecordBackend;
pub use sorting::SortAlgorithm;
