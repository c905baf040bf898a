use quick_xml::se::Serializer;
use serde::Serialize;

use super::ExportError;
use crate::domain::ACQUISITION_DATE_FORMAT;
use crate::repository::CadastreRepository;

#[derive(Debug, Serialize)]
#[serde(rename = "Properties")]
struct PropertyDocument {
    #[serde(rename = "Property")]
    properties: Vec<PropertyWithDistrict>,
}

/// One `<Property>` element: the owning district's postal code as an
/// attribute, everything else as child elements.
#[derive(Debug, Serialize)]
struct PropertyWithDistrict {
    #[serde(rename = "@postal-code")]
    postal_code: String,
    #[serde(rename = "PropertyIdentifier")]
    identifier: String,
    #[serde(rename = "Area")]
    area: i64,
    #[serde(rename = "DateOfAcquisition")]
    date_of_acquisition: String,
}

/// Properties with an area of at least 100 as a tab-indented XML document,
/// largest area first with the acquisition date as tie-break. No namespace
/// is declared and trailing whitespace is trimmed.
pub fn filtered_properties_with_district<R>(repository: &R) -> Result<String, ExportError>
where
    R: CadastreRepository,
{
    let mut properties: Vec<_> = repository
        .properties()?
        .into_iter()
        .filter(|property| property.area >= 100)
        .collect();
    properties.sort_by(|a, b| {
        b.area
            .cmp(&a.area)
            .then_with(|| a.date_of_acquisition.cmp(&b.date_of_acquisition))
    });

    let mut views = Vec::with_capacity(properties.len());
    for property in properties {
        let Some(district) = repository.district(property.district_id)? else {
            continue;
        };
        views.push(PropertyWithDistrict {
            postal_code: district.postal_code,
            identifier: property.identifier,
            area: i64::from(property.area),
            date_of_acquisition: property
                .date_of_acquisition
                .format(ACQUISITION_DATE_FORMAT)
                .to_string(),
        });
    }

    let document = PropertyDocument { properties: views };
    let mut buffer = String::new();
    let mut serializer = Serializer::new(&mut buffer);
    serializer.indent('\t', 1);
    document.serialize(serializer)?;

    Ok(buffer.trim_end().to_string())
}
