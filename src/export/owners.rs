use chrono::NaiveDate;
use serde::Serialize;

use super::ExportError;
use crate::domain::ACQUISITION_DATE_FORMAT;
use crate::repository::CadastreRepository;

/// Serialized shape of one exported property and its owners.
#[derive(Debug, Serialize)]
struct PropertyWithOwners {
    #[serde(rename = "PropertyIdentifier")]
    identifier: String,
    #[serde(rename = "Area")]
    area: i64,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "DateOfAcquisition")]
    date_of_acquisition: String,
    #[serde(rename = "Owners")]
    owners: Vec<OwnerEntry>,
}

#[derive(Debug, Serialize)]
struct OwnerEntry {
    #[serde(rename = "LastName")]
    last_name: String,
    #[serde(rename = "MaritalStatus")]
    marital_status: &'static str,
}

/// Properties acquired on or after 2000-01-01 as an indented JSON array,
/// newest acquisition first with the identifier as tie-break, each carrying
/// its owners ordered by last name.
pub fn properties_with_owners<R>(repository: &R) -> Result<String, ExportError>
where
    R: CadastreRepository,
{
    let cutoff = acquisition_cutoff();
    let mut properties: Vec<_> = repository
        .properties()?
        .into_iter()
        .filter(|property| property.date_of_acquisition >= cutoff)
        .collect();
    properties.sort_by(|a, b| {
        b.date_of_acquisition
            .cmp(&a.date_of_acquisition)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    let mut views = Vec::with_capacity(properties.len());
    for property in properties {
        let mut owners = repository.owners_of(property.id)?;
        owners.sort_by(|a, b| a.last_name.cmp(&b.last_name));

        views.push(PropertyWithOwners {
            identifier: property.identifier,
            area: i64::from(property.area),
            address: property.address,
            date_of_acquisition: property
                .date_of_acquisition
                .format(ACQUISITION_DATE_FORMAT)
                .to_string(),
            owners: owners
                .into_iter()
                .map(|citizen| OwnerEntry {
                    last_name: citizen.last_name,
                    marital_status: citizen.marital_status.label(),
                })
                .collect(),
        });
    }

    Ok(serde_json::to_string_pretty(&views)?)
}

fn acquisition_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("fixed cutoff date")
}
