use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::Deserialize;

use super::{ImportError, ImportReport};
use crate::domain::{NewDistrict, NewProperty, Region, ACQUISITION_DATE_FORMAT};
use crate::repository::CadastreRepository;
use crate::validation::{ConstraintSet, FieldValue, Rule};

const REGION_LABEL_PATTERN: &str = r"^(SouthEast|SouthWest|NorthEast|NorthWest)\b";
const POSTAL_CODE_PATTERN: &str = r"^([A-Z][A-Z]-\d{5})\b";

/// Document root: `<Districts>` wrapping zero or more `<District>` elements.
#[derive(Debug, Deserialize)]
struct DistrictBatch {
    #[serde(rename = "District", default)]
    districts: Vec<DistrictRecord>,
}

/// Raw district element. Every field is optional so that an absent value
/// reaches the constraint checker instead of failing deserialization; only a
/// document that does not parse at all aborts the batch.
#[derive(Debug, Deserialize)]
struct DistrictRecord {
    #[serde(rename = "@Region")]
    region: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "PostalCode")]
    postal_code: Option<String>,
    #[serde(rename = "Properties", default)]
    properties: PropertyListRecord,
}

#[derive(Debug, Default, Deserialize)]
struct PropertyListRecord {
    #[serde(rename = "Property", default)]
    entries: Vec<PropertyRecord>,
}

#[derive(Debug, Deserialize)]
struct PropertyRecord {
    #[serde(rename = "PropertyIdentifier")]
    identifier: Option<String>,
    #[serde(rename = "Area")]
    area: Option<i64>,
    #[serde(rename = "Details")]
    details: Option<String>,
    #[serde(rename = "Address")]
    address: Option<String>,
    #[serde(rename = "DateOfAcquisition")]
    date_of_acquisition: Option<String>,
}

fn district_constraints() -> &'static ConstraintSet<DistrictRecord> {
    static CONSTRAINTS: OnceLock<ConstraintSet<DistrictRecord>> = OnceLock::new();
    CONSTRAINTS.get_or_init(|| {
        ConstraintSet::new()
            .field(
                "Region",
                |record: &DistrictRecord| FieldValue::Text(record.region.clone()),
                vec![Rule::Required, Rule::pattern(REGION_LABEL_PATTERN)],
            )
            .field(
                "Name",
                |record| FieldValue::Text(record.name.clone()),
                vec![Rule::Required, Rule::Length { min: 2, max: 80 }],
            )
            .field(
                "PostalCode",
                |record| FieldValue::Text(record.postal_code.clone()),
                vec![
                    Rule::Required,
                    Rule::Length { min: 0, max: 8 },
                    Rule::pattern(POSTAL_CODE_PATTERN),
                ],
            )
    })
}

fn property_constraints() -> &'static ConstraintSet<PropertyRecord> {
    static CONSTRAINTS: OnceLock<ConstraintSet<PropertyRecord>> = OnceLock::new();
    CONSTRAINTS.get_or_init(|| {
        ConstraintSet::new()
            .field(
                "PropertyIdentifier",
                |record: &PropertyRecord| FieldValue::Text(record.identifier.clone()),
                vec![Rule::Required, Rule::Length { min: 16, max: 20 }],
            )
            .field(
                "Area",
                |record| FieldValue::Integer(record.area),
                vec![
                    Rule::Required,
                    Rule::Range {
                        min: 0,
                        max: 2_000_000_000,
                    },
                ],
            )
            .field(
                "Details",
                |record| FieldValue::Text(record.details.clone()),
                vec![Rule::Length { min: 5, max: 500 }],
            )
            .field(
                "Address",
                |record| FieldValue::Text(record.address.clone()),
                vec![Rule::Required, Rule::Length { min: 5, max: 200 }],
            )
            .field(
                "DateOfAcquisition",
                |record| FieldValue::Text(record.date_of_acquisition.clone()),
                vec![Rule::Required],
            )
    })
}

/// Imports a district batch with nested properties from an XML document.
///
/// Records are processed in input order; each rejected district or property
/// contributes one report line and processing continues. All accepted
/// districts are persisted in a single commit at the end.
pub struct DistrictImporter;

impl DistrictImporter {
    pub fn from_path<R, P>(repository: &mut R, path: P) -> Result<String, ImportError>
    where
        R: CadastreRepository,
        P: AsRef<Path>,
    {
        let document = std::fs::read_to_string(path)?;
        Self::from_str(repository, &document)
    }

    pub fn from_str<R>(repository: &mut R, document: &str) -> Result<String, ImportError>
    where
        R: CadastreRepository,
    {
        let batch: DistrictBatch = quick_xml::de::from_str(document)?;
        let mut report = ImportReport::new();
        let mut accepted: Vec<NewDistrict> = Vec::new();

        for record in &batch.districts {
            if !district_constraints().is_valid(record) {
                report.rejected();
                continue;
            }

            let (Some(region_label), Some(name), Some(postal_code)) = (
                record.region.as_deref(),
                record.name.as_deref(),
                record.postal_code.as_deref(),
            ) else {
                report.rejected();
                continue;
            };

            // First occurrence of a name wins for the whole batch.
            if accepted.iter().any(|district| district.name == name) {
                report.rejected();
                continue;
            }

            let Ok(region) = Region::from_label(region_label) else {
                report.rejected();
                continue;
            };

            let mut district = NewDistrict {
                region,
                name: name.to_string(),
                postal_code: postal_code.to_string(),
                properties: Vec::new(),
            };

            for property in &record.properties.entries {
                if !property_constraints().is_valid(property) {
                    report.rejected();
                    continue;
                }

                let (Some(identifier), Some(area), Some(address), Some(raw_date)) = (
                    property.identifier.as_deref(),
                    property.area,
                    property.address.as_deref(),
                    property.date_of_acquisition.as_deref(),
                ) else {
                    report.rejected();
                    continue;
                };

                // Dedup checks run against this district's already-accepted
                // properties only.
                if district.properties.iter().any(|kept| kept.address == address) {
                    report.rejected();
                    continue;
                }

                let Ok(date_of_acquisition) =
                    NaiveDate::parse_from_str(raw_date, ACQUISITION_DATE_FORMAT)
                else {
                    report.rejected();
                    continue;
                };

                if district
                    .properties
                    .iter()
                    .any(|kept| kept.identifier == identifier)
                {
                    report.rejected();
                    continue;
                }

                district.properties.push(NewProperty {
                    identifier: identifier.to_string(),
                    area: area as i32,
                    details: property.details.clone(),
                    address: address.to_string(),
                    date_of_acquisition,
                });
            }

            report.accepted(format!(
                "Successfully imported district - {} with {} properties.",
                district.name,
                district.properties.len()
            ));
            accepted.push(district);
        }

        repository.add_districts(accepted)?;
        repository.save_changes()?;

        Ok(report.render())
    }
}
