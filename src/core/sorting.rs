//! Sorting strategies over record attributes
//!
//! All strategies are pure and stable: records that compare equal keep their
//! relative input order.

use crate::core::field::RecordField;
use crate::core::record::FacilityRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sorting algorithm selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    #[default]
    Quick,
    Merge,
    Builtin,
}

impl SortAlgorithm {
    /// Resolve an algorithm name, falling back to `Builtin` for unknown names
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "quick" | "quicksort" | "quick_sort" => SortAlgorithm::Quick,
            "merge" | "mergesort" | "merge_sort" => SortAlgorithm::Merge,
            _ => SortAlgorithm::Builtin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortAlgorithm::Quick => "quick",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::Builtin => "builtin",
        }
    }

    /// Produce a new ordering of `records` by `field`
    pub fn sort(&self, records: Vec<FacilityRecord>, field: RecordField) -> Vec<FacilityRecord> {
        match self {
            SortAlgorithm::Quick => quick_sort(records, field),
            SortAlgorithm::Merge => merge_sort(records, field),
            SortAlgorithm::Builtin => builtin_sort(records, field),
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-way partition around the middle element, not in place
pub fn quick_sort(records: Vec<FacilityRecord>, field: RecordField) -> Vec<FacilityRecord> {
    if records.len() <= 1 {
        return records;
    }

    let pivot = records[records.len() / 2].clone();
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();

    for record in records {
        match field.compare(&record, &pivot) {
            Ordering::Less => less.push(record),
            Ordering::Equal => equal.push(record),
            Ordering::Greater => greater.push(record),
        }
    }

    let mut sorted = quick_sort(less, field);
    sorted.append(&mut equal);
    sorted.append(&mut quick_sort(greater, field));
    sorted
}

/// Top-down merge sort; ties take the left half first
pub fn merge_sort(mut records: Vec<FacilityRecord>, field: RecordField) -> Vec<FacilityRecord> {
    if records.len() <= 1 {
        return records;
    }

    let right = records.split_off(records.len() / 2);
    merge(merge_sort(records, field), merge_sort(right, field), field)
}

fn merge(
    left: Vec<FacilityRecord>,
    right: Vec<FacilityRecord>,
    field: RecordField,
) -> Vec<FacilityRecord> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => field.compare(l, r) != Ordering::Greater,
            _ => break,
        };
        merged.extend(if take_left { left.next() } else { right.next() });
    }

    merged.extend(left);
    merged.extend(right);
    merged
}

/// Standard library stable sort
pub fn builtin_sort(mut records: Vec<FacilityRecord>, field: RecordField) -> Vec<FacilityRecord> {
    records.sort_by(|a, b| field.compare(a, b));
    records
}
