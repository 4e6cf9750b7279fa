//! Record attributes addressable by name

use crate::core::error::StoreError;
use crate::core::record::FacilityRecord;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A borrowed attribute value
///
/// Values taken from the same [`RecordField`] always share a variant, so the
/// derived ordering is lexicographic for text and numeric for capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Count(u32),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Count(n) => write!(f, "{}", n),
        }
    }
}

/// The stored attributes of a [`FacilityRecord`], in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Region,
    District,
    LicenseNumber,
    FacilityName,
    FacilityType,
    FacilityAddress1,
    FacilityAddress2,
    FacilityAddress3,
    MaxChildren,
    MaxInfants,
    MaxPreschool,
    MaxSchoolAge,
    LanguageOfService,
    OperatorId,
    DesignatedFacility,
}

impl RecordField {
    pub const ALL: [RecordField; 15] = [
        RecordField::Region,
        RecordField::District,
        RecordField::LicenseNumber,
        RecordField::FacilityName,
        RecordField::FacilityType,
        RecordField::FacilityAddress1,
        RecordField::FacilityAddress2,
        RecordField::FacilityAddress3,
        RecordField::MaxChildren,
        RecordField::MaxInfants,
        RecordField::MaxPreschool,
        RecordField::MaxSchoolAge,
        RecordField::LanguageOfService,
        RecordField::OperatorId,
        RecordField::DesignatedFacility,
    ];

    /// Attribute name as exposed to callers
    pub fn name(&self) -> &'static str {
        match self {
            RecordField::Region => "region",
            RecordField::District => "district",
            RecordField::LicenseNumber => "license_number",
            RecordField::FacilityName => "facility_name",
            RecordField::FacilityType => "facility_type",
            RecordField::FacilityAddress1 => "facility_address_1",
            RecordField::FacilityAddress2 => "facility_address_2",
            RecordField::FacilityAddress3 => "facility_address_3",
            RecordField::MaxChildren => "max_children",
            RecordField::MaxInfants => "max_infants",
            RecordField::MaxPreschool => "max_preschool",
            RecordField::MaxSchoolAge => "max_school_age",
            RecordField::LanguageOfService => "language_of_service",
            RecordField::OperatorId => "operator_id",
            RecordField::DesignatedFacility => "designated_facility",
        }
    }

    /// Read this attribute from a record
    pub fn value<'a>(&self, record: &'a FacilityRecord) -> FieldValue<'a> {
        match self {
            RecordField::Region => FieldValue::Text(&record.region),
            RecordField::District => FieldValue::Text(&record.district),
            RecordField::LicenseNumber => FieldValue::Text(&record.license_number),
            RecordField::FacilityName => FieldValue::Text(&record.facility_name),
            RecordField::FacilityType => FieldValue::Text(&record.facility_type),
            RecordField::FacilityAddress1 => FieldValue::Text(&record.facility_address_1),
            RecordField::FacilityAddress2 => FieldValue::Text(&record.facility_address_2),
            RecordField::FacilityAddress3 => FieldValue::Text(&record.facility_address_3),
            RecordField::MaxChildren => FieldValue::Count(record.max_children),
            RecordField::MaxInfants => FieldValue::Count(record.max_infants),
            RecordField::MaxPreschool => FieldValue::Count(record.max_preschool),
            RecordField::MaxSchoolAge => FieldValue::Count(record.max_school_age),
            RecordField::LanguageOfService => FieldValue::Text(&record.language_of_service),
            RecordField::OperatorId => FieldValue::Text(&record.operator_id),
            RecordField::DesignatedFacility => FieldValue::Text(&record.designated_facility),
        }
    }

    /// Total order of two records by this attribute
    pub fn compare(&self, a: &FacilityRecord, b: &FacilityRecord) -> Ordering {
        self.value(a).cmp(&self.value(b))
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordField {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| StoreError::InvalidSortField {
                field: s.to_string(),
            })
    }
}

/// Names of every sortable attribute, in declaration order
pub fn sortable_fields() -> Vec<&'static str> {
    RecordField::ALL.iter().map(RecordField::name).collect()
}
