//! Facility record model and text rendering

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Presentation format attached to a record
///
/// Only affects [`render`]; never identity, equality or stored fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatVariant {
    #[default]
    Standard,
    Compact,
    Detailed,
}

impl FormatVariant {
    pub const ALL: [FormatVariant; 3] = [
        FormatVariant::Standard,
        FormatVariant::Compact,
        FormatVariant::Detailed,
    ];

    /// Tag written to durable storage
    pub fn as_tag(&self) -> &'static str {
        match self {
            FormatVariant::Standard => "standard",
            FormatVariant::Compact => "compact",
            FormatVariant::Detailed => "detailed",
        }
    }

    /// Parse a stored tag; anything unrecognised loads as `Standard`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "compact" | "compactfacilityrecord" => FormatVariant::Compact,
            "detailed" | "detailedfacilityrecord" => FormatVariant::Detailed,
            _ => FormatVariant::Standard,
        }
    }
}

/// One licensed facility
///
/// Equality and hashing cover every stored attribute and ignore `format`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub region: String,
    pub district: String,
    /// Natural key; the keyed container indexes by it
    pub license_number: String,
    pub facility_name: String,
    pub facility_type: String,
    pub facility_address_1: String,
    pub facility_address_2: String,
    pub facility_address_3: String,
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub max_children: u32,
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub max_infants: u32,
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub max_preschool: u32,
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub max_school_age: u32,
    pub language_of_service: String,
    pub operator_id: String,
    pub designated_facility: String,
    #[serde(default)]
    pub format: FormatVariant,
}

impl FacilityRecord {
    /// Render using the record's own format variant
    pub fn render(&self) -> String {
        render(self, self.format)
    }

    /// Same record with a different presentation format
    pub fn with_format(mut self, format: FormatVariant) -> Self {
        self.format = format;
        self
    }

    fn identity(&self) -> impl PartialEq + Hash + '_ {
        (
            (
                &self.region,
                &self.district,
                &self.license_number,
                &self.facility_name,
                &self.facility_type,
            ),
            (
                &self.facility_address_1,
                &self.facility_address_2,
                &self.facility_address_3,
            ),
            (
                self.max_children,
                self.max_infants,
                self.max_preschool,
                self.max_school_age,
            ),
            (
                &self.language_of_service,
                &self.operator_id,
                &self.designated_facility,
            ),
        )
    }
}

impl PartialEq for FacilityRecord {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for FacilityRecord {}

impl Hash for FacilityRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for FacilityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Coerce raw capacity text to a count
///
/// Anything that is not a valid non-negative integer becomes `0`.
pub fn parse_capacity(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

fn lenient_capacity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) => u32::try_from(n).unwrap_or(0),
        Raw::Text(s) => parse_capacity(&s),
        Raw::Other(_) => 0,
    })
}

/// Render a record as text in the given format
pub fn render(record: &FacilityRecord, variant: FormatVariant) -> String {
    match variant {
        FormatVariant::Standard => format!(
            "Region: {}, District: {}, License #: {}, Facility Name: {}, Type: {}, \
             Address: {}, {}, {}, Max Children: {}, Infants: {}, Preschool: {}, \
             School Age: {}, Language: {}, Operator ID: {}, Designated Facility: {}",
            record.region,
            record.district,
            record.license_number,
            record.facility_name,
            record.facility_type,
            record.facility_address_1,
            record.facility_address_2,
            record.facility_address_3,
            record.max_children,
            record.max_infants,
            record.max_preschool,
            record.max_school_age,
            record.language_of_service,
            record.operator_id,
            record.designated_facility,
        ),
        FormatVariant::Compact => format!(
            "{} ({}) | Capacity: {} | Region: {}",
            record.facility_name, record.license_number, record.max_children, record.region,
        ),
        FormatVariant::Detailed => {
            let address = [
                record.facility_address_1.as_str(),
                record.facility_address_2.as_str(),
                record.facility_address_3.as_str(),
            ]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

            format!(
                "Facility Details:\n  \
                 Name: {}\n  \
                 License #: {}\n  \
                 Type: {}\n  \
                 Region: {}\n  \
                 District: {}\n  \
                 Address: {}\n\
                 Capacity Information:\n  \
                 Total: {}\n  \
                 Infants: {}\n  \
                 Preschool: {}\n  \
                 School Age: {}\n\
                 Service Information:\n  \
                 Language: {}\n  \
                 Operator ID: {}\n  \
                 Designated Facility: {}",
                record.facility_name,
                record.license_number,
                record.facility_type,
                record.region,
                record.district,
                address,
                record.max_children,
                record.max_infants,
                record.max_preschool,
                record.max_school_age,
                record.language_of_service,
                record.operator_id,
                record.designated_facility,
            )
        }
    }
}
