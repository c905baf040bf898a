use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::Deserialize;

use super::{ImportError, ImportReport};
use crate::domain::{MaritalStatus, NewCitizen, PropertyId};
use crate::repository::CadastreRepository;
use crate::validation::{ConstraintSet, FieldValue, Rule};

const MARITAL_STATUS_PATTERN: &str = r"^(Unmarried|Married|Divorced|Widowed)\b";
const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";

/// Raw citizen object from the JSON array. Optional fields reach the
/// constraint checker; malformed JSON aborts the batch.
#[derive(Debug, Deserialize)]
struct CitizenRecord {
    #[serde(rename = "FirstName")]
    first_name: Option<String>,
    #[serde(rename = "LastName")]
    last_name: Option<String>,
    #[serde(rename = "BirthDate")]
    birth_date: Option<String>,
    #[serde(rename = "MaritalStatus")]
    marital_status: Option<String>,
    #[serde(rename = "Properties", default)]
    properties: Vec<PropertyId>,
}

fn citizen_constraints() -> &'static ConstraintSet<CitizenRecord> {
    static CONSTRAINTS: OnceLock<ConstraintSet<CitizenRecord>> = OnceLock::new();
    CONSTRAINTS.get_or_init(|| {
        ConstraintSet::new()
            .field(
                "FirstName",
                |record: &CitizenRecord| FieldValue::Text(record.first_name.clone()),
                vec![Rule::Required, Rule::Length { min: 2, max: 30 }],
            )
            .field(
                "LastName",
                |record| FieldValue::Text(record.last_name.clone()),
                vec![Rule::Required, Rule::Length { min: 2, max: 30 }],
            )
            .field(
                "BirthDate",
                |record| FieldValue::Text(record.birth_date.clone()),
                vec![Rule::Required],
            )
            .field(
                "MaritalStatus",
                |record| FieldValue::Text(record.marital_status.clone()),
                vec![Rule::pattern(MARITAL_STATUS_PATTERN)],
            )
    })
}

/// Imports a citizen batch from a JSON document, linking citizens to
/// properties that already exist in the store.
///
/// The set of existing property ids is snapshotted once before the loop and
/// never refreshed during the batch; this importer does not create
/// properties, so the snapshot cannot go stale from within.
pub struct CitizenImporter;

impl CitizenImporter {
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
        let batch: Vec<CitizenRecord> = serde_json::from_str(document)?;
        let existing: HashSet<PropertyId> = repository.property_ids()?.into_iter().collect();

        let mut report = ImportReport::new();
        let mut accepted: Vec<NewCitizen> = Vec::new();

        for record in &batch {
            if !citizen_constraints().is_valid(record) {
                report.rejected();
                continue;
            }

            let (Some(first_name), Some(last_name), Some(raw_birth_date)) = (
                record.first_name.as_deref(),
                record.last_name.as_deref(),
                record.birth_date.as_deref(),
            ) else {
                report.rejected();
                continue;
            };

            let Ok(birth_date) = NaiveDate::parse_from_str(raw_birth_date, BIRTH_DATE_FORMAT)
            else {
                report.rejected();
                continue;
            };

            // The label pattern lets an absent status through; the strict
            // lookup turns both absent and unknown labels into a rejection.
            let Some(marital_status) = record
                .marital_status
                .as_deref()
                .and_then(|label| MaritalStatus::from_label(label).ok())
            else {
                report.rejected();
                continue;
            };

            let mut citizen = NewCitizen {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                birth_date,
                marital_status,
                property_ids: Vec::new(),
            };

            // Duplicate references within one citizen collapse silently;
            // unresolved references are rejected one line each without
            // rejecting the citizen.
            let mut referenced: HashSet<PropertyId> = HashSet::new();
            for property_id in &record.properties {
                if !referenced.insert(*property_id) {
                    continue;
                }
                if !existing.contains(property_id) {
                    report.rejected();
                    continue;
                }
                citizen.property_ids.push(*property_id);
            }

            // "Succefully" is the literal report consumers already parse;
            // keep it verbatim.
            report.accepted(format!(
                "Succefully imported citizen - {} {} with {} properties.",
                citizen.first_name,
                citizen.last_name,
                citizen.property_ids.len()
            ));
            accepted.push(citizen);
        }

        repository.add_citizens(accepted)?;
        repository.save_changes()?;

        Ok(report.render())
    }
}
