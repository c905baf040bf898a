use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for property acquisition dates, shared by import and export.
pub const ACQUISITION_DATE_FORMAT: &str = "%d/%m/%Y";

/// Identifier wrapper for persisted districts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DistrictId(pub i32);

/// Identifier wrapper for persisted properties; citizen batches reference
/// properties by this raw integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub i32);

/// Identifier wrapper for persisted citizens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CitizenId(pub i32);

/// Raised when an input label does not exactly match a known enumeration value.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized {kind} label '{label}'")]
pub struct UnknownLabel {
    kind: &'static str,
    label: String,
}

/// Administrative quadrant a district belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::NorthEast => "NorthEast",
            Region::NorthWest => "NorthWest",
            Region::SouthEast => "SouthEast",
            Region::SouthWest => "SouthWest",
        }
    }

    /// Strict, case-sensitive lookup; no normalization is applied.
    pub fn from_label(value: &str) -> Result<Self, UnknownLabel> {
        match value {
            "NorthEast" => Ok(Region::NorthEast),
            "NorthWest" => Ok(Region::NorthWest),
            "SouthEast" => Ok(Region::SouthEast),
            "SouthWest" => Ok(Region::SouthWest),
            other => Err(UnknownLabel {
                kind: "region",
                label: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    Unmarried,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MaritalStatus::Unmarried => "Unmarried",
            MaritalStatus::Married => "Married",
            MaritalStatus::Divorced => "Divorced",
            MaritalStatus::Widowed => "Widowed",
        }
    }

    /// Strict, case-sensitive lookup; no normalization is applied.
    pub fn from_label(value: &str) -> Result<Self, UnknownLabel> {
        match value {
            "Unmarried" => Ok(MaritalStatus::Unmarried),
            "Married" => Ok(MaritalStatus::Married),
            "Divorced" => Ok(MaritalStatus::Divorced),
            "Widowed" => Ok(MaritalStatus::Widowed),
            other => Err(UnknownLabel {
                kind: "marital status",
                label: other.to_string(),
            }),
        }
    }
}

/// Persisted district row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct District {
    pub id: DistrictId,
    pub name: String,
    pub postal_code: String,
    pub region: Region,
}

/// Persisted property row; belongs to exactly one district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub id: PropertyId,
    pub identifier: String,
    pub area: i32,
    pub details: Option<String>,
    pub address: String,
    pub date_of_acquisition: NaiveDate,
    pub district_id: DistrictId,
}

/// Persisted citizen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citizen {
    pub id: CitizenId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub marital_status: MaritalStatus,
}

/// Join row pairing one property with one citizen. Two foreign keys, no
/// back-pointers; never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyLink {
    pub property_id: PropertyId,
    pub citizen_id: CitizenId,
}

/// District accepted by an import batch, not yet committed; owns its
/// accepted properties so the store persists the whole graph in one add.
#[derive(Debug, Clone)]
pub struct NewDistrict {
    pub region: Region,
    pub name: String,
    pub postal_code: String,
    pub properties: Vec<NewProperty>,
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub identifier: String,
    pub area: i32,
    pub details: Option<String>,
    pub address: String,
    pub date_of_acquisition: NaiveDate,
}

/// Citizen accepted by an import batch, not yet committed. Property links
/// reference ids that already exist in the store; citizen import never
/// creates properties.
#[derive(Debug, Clone)]
pub struct NewCitizen {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub marital_status: MaritalStatus,
    pub property_ids: Vec<PropertyId>,
}
