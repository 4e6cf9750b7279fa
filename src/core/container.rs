//! Switchable storage representations for the record collection
//!
//! Three shapes sit behind one small capability set:
//!
//! - [`ContainerKind::Sequence`]: insertion/sort order, duplicates allowed
//! - [`ContainerKind::Map`]: unique by license number, last write wins
//! - [`ContainerKind::Set`]: unique by full value, duplicates dropped
//!
//! Map and set keep insertion order (`indexmap`), so positional access works
//! the same way in every shape. Switching kind is a bulk rebuild and is lossy
//! whenever the target shape rejects duplicates.

use crate::core::error::StoreError;
use crate::core::record::FacilityRecord;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag naming a container shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    #[default]
    #[serde(alias = "list")]
    Sequence,
    #[serde(alias = "ordered_dict")]
    Map,
    Set,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Sequence => "sequence",
            ContainerKind::Map => "map",
            ContainerKind::Set => "set",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequence" | "list" => Ok(ContainerKind::Sequence),
            "map" | "ordered_dict" => Ok(ContainerKind::Map),
            "set" => Ok(ContainerKind::Set),
            _ => Err(StoreError::UnsupportedContainerKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// The record collection in one of three shapes
#[derive(Debug, Clone)]
pub enum Container {
    Sequence(Vec<FacilityRecord>),
    Map(IndexMap<String, FacilityRecord>),
    Set(IndexSet<FacilityRecord>),
}

impl Default for Container {
    fn default() -> Self {
        Container::new(ContainerKind::default())
    }
}

impl Container {
    /// Create an empty container of the given kind
    pub fn new(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Sequence => Container::Sequence(Vec::new()),
            ContainerKind::Map => Container::Map(IndexMap::new()),
            ContainerKind::Set => Container::Set(IndexSet::new()),
        }
    }

    /// Build a container by inserting every record in order
    pub fn from_records(kind: ContainerKind, records: impl IntoIterator<Item = FacilityRecord>) -> Self {
        let mut container = Container::new(kind);
        for record in records {
            container.add(record);
        }
        container
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Sequence(_) => ContainerKind::Sequence,
            Container::Map(_) => ContainerKind::Map,
            Container::Set(_) => ContainerKind::Set,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Container::Sequence(records) => records.len(),
            Container::Map(records) => records.len(),
            Container::Set(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a record
    ///
    /// Returns `false` when the record replaced (map) or was dropped as a
    /// duplicate of (set) an existing entry.
    pub fn add(&mut self, record: FacilityRecord) -> bool {
        match self {
            Container::Sequence(records) => {
                records.push(record);
                true
            }
            Container::Map(records) => records
                .insert(record.license_number.clone(), record)
                .is_none(),
            Container::Set(records) => records.insert(record),
        }
    }

    /// Remove a record: first value match (sequence), by license (map) or by
    /// value (set)
    pub fn remove(&mut self, record: &FacilityRecord) -> Result<FacilityRecord, StoreError> {
        let removed = match self {
            Container::Sequence(records) => records
                .iter()
                .position(|r| r == record)
                .map(|i| records.remove(i)),
            Container::Map(records) => records.shift_remove(&record.license_number),
            Container::Set(records) => records.shift_take(record),
        };

        removed.ok_or_else(|| StoreError::RecordNotFound {
            license_number: record.license_number.clone(),
        })
    }

    pub fn get(&self, index: usize) -> Option<&FacilityRecord> {
        match self {
            Container::Sequence(records) => records.get(index),
            Container::Map(records) => records.get_index(index).map(|(_, r)| r),
            Container::Set(records) => records.get_index(index),
        }
    }

    /// Remove the record at a position
    pub fn remove_at(&mut self, index: usize) -> Option<FacilityRecord> {
        match self {
            Container::Sequence(records) => (index < records.len()).then(|| records.remove(index)),
            Container::Map(records) => records.shift_remove_index(index).map(|(_, r)| r),
            Container::Set(records) => records.shift_remove_index(index),
        }
    }

    /// Replace the record at a position, returning the previous one
    ///
    /// In the map and set shapes the replacement obeys the shape's uniqueness
    /// rule: a key already held elsewhere is overwritten there, an equal value
    /// already held elsewhere absorbs the replacement.
    pub fn replace_at(&mut self, index: usize, record: FacilityRecord) -> Option<FacilityRecord> {
        match self {
            Container::Sequence(records) => records
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, record)),
            Container::Map(records) => {
                let (_, previous) = records.shift_remove_index(index)?;
                let key = record.license_number.clone();
                if records.contains_key(&key) {
                    records.insert(key, record);
                } else {
                    records.shift_insert(index, key, record);
                }
                Some(previous)
            }
            Container::Set(records) => {
                let previous = records.shift_remove_index(index)?;
                if !records.contains(&record) {
                    records.shift_insert(index, record);
                }
                Some(previous)
            }
        }
    }

    /// Copy out every record in container order
    pub fn get_all(&self) -> Vec<FacilityRecord> {
        match self {
            Container::Sequence(records) => records.clone(),
            Container::Map(records) => records.values().cloned().collect(),
            Container::Set(records) => records.iter().cloned().collect(),
        }
    }

    /// Drain into a plain sequence
    pub fn into_records(self) -> Vec<FacilityRecord> {
        match self {
            Container::Sequence(records) => records,
            Container::Map(records) => records.into_values().collect(),
            Container::Set(records) => records.into_iter().collect(),
        }
    }

    /// Rebuild into another shape
    pub fn convert(self, kind: ContainerKind) -> Container {
        if self.kind() == kind {
            return self;
        }
        Container::from_records(kind, self.into_records())
    }

    /// Apply `f` to every record in place
    ///
    /// `f` must not change the license number or any identity field used by
    /// the map and set shapes.
    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut FacilityRecord)) {
        match self {
            Container::Sequence(records) => records.iter_mut().for_each(f),
            Container::Map(records) => records.values_mut().for_each(f),
            Container::Set(records) => {
                let rebuilt: IndexSet<FacilityRecord> = std::mem::take(records)
                    .into_iter()
                    .map(|mut r| {
                        f(&mut r);
                        r
                    })
                    .collect();
                *records = rebuilt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(license: &str, children: u32) -> FacilityRecord {
        FacilityRecord {
            license_number: license.to_string(),
            facility_name: format!("Facility {}", license),
            max_children: children,
            ..Default::default()
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("list".parse::<ContainerKind>().unwrap(), ContainerKind::Sequence);
        assert_eq!("ordered_dict".parse::<ContainerKind>().unwrap(), ContainerKind::Map);
        assert_eq!("SET".parse::<ContainerKind>().unwrap(), ContainerKind::Set);

        let err = "tree".parse::<ContainerKind>().unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONTAINER_KIND");
    }

    #[test]
    fn test_sequence_keeps_duplicates() {
        let mut container = Container::new(ContainerKind::Sequence);
        assert!(container.add(record("A", 1)));
        assert!(container.add(record("A", 1)));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_map_last_write_wins() {
        let mut container = Container::new(ContainerKind::Map);
        assert!(container.add(record("A", 1)));
        assert!(container.add(record("B", 2)));
        assert!(!container.add(record("A", 9)));

        let all = container.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].license_number, "A");
        assert_eq!(all[0].max_children, 9);
    }

    #[test]
    fn test_set_drops_equal_values() {
        let mut container = Container::new(ContainerKind::Set);
        assert!(container.add(record("A", 1)));
        assert!(!container.add(record("A", 1)));
        assert!(container.add(record("A", 2)));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_remove_reports_missing() {
        for kind in [ContainerKind::Sequence, ContainerKind::Map, ContainerKind::Set] {
            let mut container = Container::from_records(kind, vec![record("A", 1)]);
            let err = container.remove(&record("Z", 1)).unwrap_err();
            assert!(matches!(err, StoreError::RecordNotFound { .. }), "{kind}");

            let removed = container.remove(&record("A", 1)).unwrap();
            assert_eq!(removed.license_number, "A");
            assert!(container.is_empty());
        }
    }

    #[test]
    fn test_positional_access_in_every_shape() {
        for kind in [ContainerKind::Sequence, ContainerKind::Map, ContainerKind::Set] {
            let mut container =
                Container::from_records(kind, vec![record("A", 1), record("B", 2), record("C", 3)]);

            assert_eq!(container.get(1).unwrap().license_number, "B");

            let previous = container.replace_at(1, record("D", 4)).unwrap();
            assert_eq!(previous.license_number, "B");
            assert_eq!(container.get(1).unwrap().license_number, "D");

            let removed = container.remove_at(0).unwrap();
            assert_eq!(removed.license_number, "A");
            assert_eq!(container.get(0).unwrap().license_number, "D");

            assert!(container.remove_at(5).is_none());
            assert!(container.replace_at(5, record("E", 5)).is_none());
        }
    }

    #[test]
    fn test_convert_to_map_is_lossy_for_duplicate_keys() {
        let container = Container::from_records(
            ContainerKind::Sequence,
            vec![record("A", 1), record("B", 2), record("A", 3)],
        );

        let map = container.convert(ContainerKind::Map);
        assert_eq!(map.len(), 2);

        let back = map.convert(ContainerKind::Sequence);
        assert_eq!(back.kind(), ContainerKind::Sequence);
        assert_eq!(back.len(), 2);
        assert_eq!(back.get(0).unwrap().max_children, 3);
    }
}
