use cadastre::repository::CadastreRepository;
use cadastre::{DistrictImporter, InMemoryCadastre};

const SOFIA_BATCH: &str = r#"<Districts>
	<District Region="SouthEast">
		<Name>Sofia</Name>
		<PostalCode>SF-12345</PostalCode>
		<Properties>
			<Property>
				<PropertyIdentifier>ABCDEFGHIJKLMNOP</PropertyIdentifier>
				<Area>120</Area>
				<Details>Lovely old house</Details>
				<Address>5 Main St, Sofia</Address>
				<DateOfAcquisition>15/06/2010</DateOfAcquisition>
			</Property>
		</Properties>
	</District>
</Districts>"#;

fn property_element(identifier: &str, address: &str, area: i64, date: &str) -> String {
    format!(
        "<Property>\
         <PropertyIdentifier>{identifier}</PropertyIdentifier>\
         <Area>{area}</Area>\
         <Address>{address}</Address>\
         <DateOfAcquisition>{date}</DateOfAcquisition>\
         </Property>"
    )
}

fn district_element(region: &str, name: &str, postal_code: &str, properties: &str) -> String {
    format!(
        "<District Region=\"{region}\">\
         <Name>{name}</Name>\
         <PostalCode>{postal_code}</PostalCode>\
         <Properties>{properties}</Properties>\
         </District>"
    )
}

#[test]
fn imports_valid_district_with_property() {
    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, SOFIA_BATCH).expect("import succeeds");

    assert_eq!(
        report,
        "Successfully imported district - Sofia with 1 properties."
    );

    let properties = store.properties().expect("store readable");
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].identifier, "ABCDEFGHIJKLMNOP");
    assert_eq!(properties[0].area, 120);
    assert_eq!(properties[0].address, "5 Main St, Sofia");

    let district = store
        .district(properties[0].district_id)
        .expect("store readable")
        .expect("district persisted");
    assert_eq!(district.name, "Sofia");
    assert_eq!(district.postal_code, "SF-12345");
}

#[test]
fn duplicate_district_names_keep_only_the_first() {
    let batch = format!(
        "<Districts>{}{}</Districts>",
        district_element("SouthEast", "Sofia", "SF-12345", ""),
        district_element("NorthWest", "Sofia", "SF-54321", ""),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(
        report,
        "Successfully imported district - Sofia with 0 properties.\nInvalid Data!"
    );
    assert_eq!(store.property_ids().expect("readable").len(), 0);
}

#[test]
fn invalid_district_skips_its_nested_properties() {
    // Postal code violates the XX-NNNNN shape; the whole district is one
    // failure line, the nested property never gets its own.
    let batch = format!(
        "<Districts>{}</Districts>",
        district_element(
            "SouthEast",
            "Sofia",
            "SF12345",
            &property_element("ABCDEFGHIJKLMNOP", "5 Main St, Sofia", 120, "15/06/2010"),
        ),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(report, "Invalid Data!");
    assert!(store.properties().expect("readable").is_empty());
}

#[test]
fn unknown_region_label_rejects_the_district() {
    let batch = format!(
        "<Districts>{}</Districts>",
        district_element("Central", "Sofia", "SF-12345", ""),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");
    assert_eq!(report, "Invalid Data!");
}

#[test]
fn duplicate_address_within_a_district_is_rejected() {
    let properties = [
        property_element("ABCDEFGHIJKLMNOP", "5 Main St, Sofia", 120, "15/06/2010"),
        property_element("QRSTUVWXYZABCDEF", "5 Main St, Sofia", 200, "16/06/2010"),
    ]
    .concat();
    let batch = format!(
        "<Districts>{}</Districts>",
        district_element("SouthEast", "Sofia", "SF-12345", &properties),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(
        report,
        "Invalid Data!\nSuccessfully imported district - Sofia with 1 properties."
    );
}

#[test]
fn duplicate_identifier_within_a_district_is_rejected() {
    let properties = [
        property_element("ABCDEFGHIJKLMNOP", "5 Main St, Sofia", 120, "15/06/2010"),
        property_element("ABCDEFGHIJKLMNOP", "7 Hill St, Sofia", 200, "16/06/2010"),
    ]
    .concat();
    let batch = format!(
        "<Districts>{}</Districts>",
        district_element("SouthEast", "Sofia", "SF-12345", &properties),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(
        report,
        "Invalid Data!\nSuccessfully imported district - Sofia with 1 properties."
    );
}

#[test]
fn identical_values_across_districts_are_both_accepted() {
    let batch = format!(
        "<Districts>{}{}</Districts>",
        district_element(
            "SouthEast",
            "Sofia",
            "SF-12345",
            &property_element("ABCDEFGHIJKLMNOP", "5 Main St", 120, "15/06/2010"),
        ),
        district_element(
            "NorthWest",
            "Plovdiv",
            "PL-12345",
            &property_element("ABCDEFGHIJKLMNOP", "5 Main St", 120, "15/06/2010"),
        ),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(
        report,
        "Successfully imported district - Sofia with 1 properties.\n\
         Successfully imported district - Plovdiv with 1 properties."
    );
    assert_eq!(store.property_ids().expect("readable").len(), 2);
}

#[test]
fn unparseable_acquisition_date_rejects_only_that_property() {
    let properties = [
        property_element("ABCDEFGHIJKLMNOP", "5 Main St, Sofia", 120, "2010-06-15"),
        property_element("QRSTUVWXYZABCDEF", "7 Hill St, Sofia", 200, "31/02/2010"),
        property_element("AAAABBBBCCCCDDDD", "9 Oak St, Sofia", 300, "16/06/2010"),
    ]
    .concat();
    let batch = format!(
        "<Districts>{}</Districts>",
        district_element("SouthEast", "Sofia", "SF-12345", &properties),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(
        report,
        "Invalid Data!\nInvalid Data!\nSuccessfully imported district - Sofia with 1 properties."
    );
}

#[test]
fn district_with_zero_valid_properties_is_still_imported() {
    let batch = format!(
        "<Districts>{}</Districts>",
        district_element(
            "SouthEast",
            "Sofia",
            "SF-12345",
            // Identifier shorter than 16 characters.
            &property_element("SHORT", "5 Main St, Sofia", 120, "15/06/2010"),
        ),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(
        report,
        "Invalid Data!\nSuccessfully imported district - Sofia with 0 properties."
    );

    let properties = store.properties().expect("readable");
    assert!(properties.is_empty());
    assert_eq!(
        store
            .district(cadastre::domain::DistrictId(1))
            .expect("readable")
            .expect("district persisted")
            .name,
        "Sofia"
    );
}

#[test]
fn details_shorter_than_five_characters_reject_the_property() {
    let batch = r#"<Districts>
	<District Region="SouthEast">
		<Name>Sofia</Name>
		<PostalCode>SF-12345</PostalCode>
		<Properties>
			<Property>
				<PropertyIdentifier>ABCDEFGHIJKLMNOP</PropertyIdentifier>
				<Area>120</Area>
				<Details>tiny</Details>
				<Address>5 Main St, Sofia</Address>
				<DateOfAcquisition>15/06/2010</DateOfAcquisition>
			</Property>
		</Properties>
	</District>
</Districts>"#;

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, batch).expect("import succeeds");

    assert_eq!(
        report,
        "Invalid Data!\nSuccessfully imported district - Sofia with 0 properties."
    );
}

#[test]
fn absent_details_element_is_accepted() {
    let batch = format!(
        "<Districts>{}</Districts>",
        district_element(
            "SouthEast",
            "Sofia",
            "SF-12345",
            &property_element("ABCDEFGHIJKLMNOP", "5 Main St, Sofia", 120, "15/06/2010"),
        ),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(
        report,
        "Successfully imported district - Sofia with 1 properties."
    );
    assert_eq!(store.properties().expect("readable")[0].details, None);
}

#[test]
fn one_line_per_record_outcome() {
    // Two districts (one invalid) plus three properties of which one fails
    // after its district was accepted: three report lines in total.
    let properties = [
        property_element("ABCDEFGHIJKLMNOP", "5 Main St, Sofia", 120, "15/06/2010"),
        property_element("QRSTUVWXYZABCDEF", "7 Hill St, Sofia", -5, "16/06/2010"),
        property_element("AAAABBBBCCCCDDDD", "9 Oak St, Sofia", 300, "17/06/2010"),
    ]
    .concat();
    let batch = format!(
        "<Districts>{}{}</Districts>",
        district_element("SouthEast", "Sofia", "SF-12345", &properties),
        district_element("Wrong", "Plovdiv", "PL-12345", ""),
    );

    let mut store = InMemoryCadastre::new();
    let report = DistrictImporter::from_str(&mut store, &batch).expect("import succeeds");

    assert_eq!(report.lines().count(), 3);
    assert_eq!(
        report.lines().filter(|line| *line == "Invalid Data!").count(),
        2
    );
    assert!(report
        .lines()
        .any(|line| line == "Successfully imported district - Sofia with 2 properties."));
}

#[test]
fn malformed_document_aborts_the_batch() {
    let mut store = InMemoryCadastre::new();
    let error = DistrictImporter::from_str(&mut store, "<Districts><District>")
        .expect_err("truncated document");
    assert!(matches!(error, cadastre::ImportError::Xml(_)));
}
