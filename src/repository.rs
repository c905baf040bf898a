use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::domain::{
    Citizen, CitizenId, District, DistrictId, NewCitizen, NewDistrict, Property, PropertyId,
    PropertyLink,
};

/// Error enumeration for persistence failures. A commit failure aborts the
/// whole batch; importers never retry.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("citizen link references unknown property {property_id:?}")]
    ForeignKey { property_id: PropertyId },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction so importers and exporters can be exercised in
/// isolation. Adds are staged in memory; `save_changes` durably persists all
/// pending adds in one step and fails atomically on constraint violation.
pub trait CadastreRepository {
    fn add_districts(&mut self, districts: Vec<NewDistrict>) -> Result<(), RepositoryError>;
    fn add_citizens(&mut self, citizens: Vec<NewCitizen>) -> Result<(), RepositoryError>;
    /// Ids of all committed properties; pending adds are not visible.
    fn property_ids(&self) -> Result<Vec<PropertyId>, RepositoryError>;
    fn properties(&self) -> Result<Vec<Property>, RepositoryError>;
    fn district(&self, id: DistrictId) -> Result<Option<District>, RepositoryError>;
    fn owners_of(&self, id: PropertyId) -> Result<Vec<Citizen>, RepositoryError>;
    fn save_changes(&mut self) -> Result<(), RepositoryError>;
}

/// In-memory reference store backing the console runner and the test suite.
/// Ids are assigned monotonically starting at 1, in staging order.
#[derive(Debug, Default)]
pub struct InMemoryCadastre {
    districts: BTreeMap<DistrictId, District>,
    properties: BTreeMap<PropertyId, Property>,
    citizens: BTreeMap<CitizenId, Citizen>,
    links: Vec<PropertyLink>,
    pending_districts: Vec<NewDistrict>,
    pending_citizens: Vec<NewCitizen>,
    last_district_id: i32,
    last_property_id: i32,
    last_citizen_id: i32,
}

impl InMemoryCadastre {
    pub fn new() -> Self {
        Self::default()
    }

    /// All join rows, in creation order.
    pub fn links(&self) -> &[PropertyLink] {
        &self.links
    }
}

impl CadastreRepository for InMemoryCadastre {
    fn add_districts(&mut self, districts: Vec<NewDistrict>) -> Result<(), RepositoryError> {
        self.pending_districts.extend(districts);
        Ok(())
    }

    fn add_citizens(&mut self, citizens: Vec<NewCitizen>) -> Result<(), RepositoryError> {
        self.pending_citizens.extend(citizens);
        Ok(())
    }

    fn property_ids(&self) -> Result<Vec<PropertyId>, RepositoryError> {
        Ok(self.properties.keys().copied().collect())
    }

    fn properties(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.properties.values().cloned().collect())
    }

    fn district(&self, id: DistrictId) -> Result<Option<District>, RepositoryError> {
        Ok(self.districts.get(&id).cloned())
    }

    fn owners_of(&self, id: PropertyId) -> Result<Vec<Citizen>, RepositoryError> {
        Ok(self
            .links
            .iter()
            .filter(|link| link.property_id == id)
            .filter_map(|link| self.citizens.get(&link.citizen_id).cloned())
            .collect())
    }

    fn save_changes(&mut self) -> Result<(), RepositoryError> {
        // Two-phase commit: materialize every staged row first so a
        // constraint violation leaves both committed and pending state
        // untouched.
        let mut districts = Vec::new();
        let mut properties = Vec::new();
        let mut next_district_id = self.last_district_id;
        let mut next_property_id = self.last_property_id;

        for staged in &self.pending_districts {
            next_district_id += 1;
            let district_id = DistrictId(next_district_id);
            districts.push(District {
                id: district_id,
                name: staged.name.clone(),
                postal_code: staged.postal_code.clone(),
                region: staged.region,
            });

            for property in &staged.properties {
                next_property_id += 1;
                properties.push(Property {
                    id: PropertyId(next_property_id),
                    identifier: property.identifier.clone(),
                    area: property.area,
                    details: property.details.clone(),
                    address: property.address.clone(),
                    date_of_acquisition: property.date_of_acquisition,
                    district_id,
                });
            }
        }

        let staged_property_ids: HashSet<PropertyId> =
            properties.iter().map(|property| property.id).collect();
        let mut citizens = Vec::new();
        let mut links = Vec::new();
        let mut next_citizen_id = self.last_citizen_id;

        for staged in &self.pending_citizens {
            next_citizen_id += 1;
            let citizen_id = CitizenId(next_citizen_id);
            citizens.push(Citizen {
                id: citizen_id,
                first_name: staged.first_name.clone(),
                last_name: staged.last_name.clone(),
                birth_date: staged.birth_date,
                marital_status: staged.marital_status,
            });

            for property_id in &staged.property_ids {
                if !self.properties.contains_key(property_id)
                    && !staged_property_ids.contains(property_id)
                {
                    return Err(RepositoryError::ForeignKey {
                        property_id: *property_id,
                    });
                }
                links.push(PropertyLink {
                    property_id: *property_id,
                    citizen_id,
                });
            }
        }

        debug!(
            districts = districts.len(),
            properties = properties.len(),
            citizens = citizens.len(),
            links = links.len(),
            "committing pending adds"
        );

        self.last_district_id = next_district_id;
        self.last_property_id = next_property_id;
        self.last_citizen_id = next_citizen_id;
        self.districts
            .extend(districts.into_iter().map(|district| (district.id, district)));
        self.properties
            .extend(properties.into_iter().map(|property| (property.id, property)));
        self.citizens
            .extend(citizens.into_iter().map(|citizen| (citizen.id, citizen)));
        self.links.extend(links);
        self.pending_districts.clear();
        self.pending_citizens.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MaritalStatus, NewProperty, Region};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn sample_district(name: &str, properties: Vec<NewProperty>) -> NewDistrict {
        NewDistrict {
            region: Region::SouthEast,
            name: name.to_string(),
            postal_code: "SF-12345".to_string(),
            properties,
        }
    }

    fn sample_property(identifier: &str, address: &str) -> NewProperty {
        NewProperty {
            identifier: identifier.to_string(),
            area: 120,
            details: None,
            address: address.to_string(),
            date_of_acquisition: date(2010, 6, 15),
        }
    }

    fn sample_citizen(property_ids: Vec<PropertyId>) -> NewCitizen {
        NewCitizen {
            first_name: "Ana".to_string(),
            last_name: "Petrova".to_string(),
            birth_date: date(1990, 1, 1),
            marital_status: MaritalStatus::Married,
            property_ids,
        }
    }

    #[test]
    fn commit_assigns_sequential_ids_across_batches() {
        let mut store = InMemoryCadastre::new();
        store
            .add_districts(vec![sample_district(
                "Sofia",
                vec![sample_property("ABCDEFGHIJKLMNOP", "5 Main St, Sofia")],
            )])
            .expect("adds stage");
        store.save_changes().expect("first commit");

        store
            .add_districts(vec![sample_district(
                "Plovdiv",
                vec![sample_property("QRSTUVWXYZABCDEF", "7 Hill St, Plovdiv")],
            )])
            .expect("adds stage");
        store.save_changes().expect("second commit");

        let ids = store.property_ids().expect("ids readable");
        assert_eq!(ids, vec![PropertyId(1), PropertyId(2)]);

        let properties = store.properties().expect("properties readable");
        assert_eq!(properties[0].district_id, DistrictId(1));
        assert_eq!(properties[1].district_id, DistrictId(2));
    }

    #[test]
    fn pending_adds_are_invisible_until_commit() {
        let mut store = InMemoryCadastre::new();
        store
            .add_districts(vec![sample_district(
                "Sofia",
                vec![sample_property("ABCDEFGHIJKLMNOP", "5 Main St, Sofia")],
            )])
            .expect("adds stage");

        assert!(store.property_ids().expect("ids readable").is_empty());
        store.save_changes().expect("commit");
        assert_eq!(store.property_ids().expect("ids readable").len(), 1);
    }

    #[test]
    fn citizen_links_resolve_through_owners_of() {
        let mut store = InMemoryCadastre::new();
        store
            .add_districts(vec![sample_district(
                "Sofia",
                vec![sample_property("ABCDEFGHIJKLMNOP", "5 Main St, Sofia")],
            )])
            .expect("adds stage");
        store.save_changes().expect("district commit");

        store
            .add_citizens(vec![sample_citizen(vec![PropertyId(1)])])
            .expect("adds stage");
        store.save_changes().expect("citizen commit");

        let owners = store.owners_of(PropertyId(1)).expect("owners readable");
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].last_name, "Petrova");
        assert_eq!(store.links().len(), 1);
    }

    #[test]
    fn foreign_key_violation_fails_atomically() {
        let mut store = InMemoryCadastre::new();
        store
            .add_citizens(vec![sample_citizen(vec![PropertyId(999)])])
            .expect("adds stage");

        let error = store.save_changes().expect_err("commit must fail");
        assert!(matches!(
            error,
            RepositoryError::ForeignKey {
                property_id: PropertyId(999)
            }
        ));

        // Nothing was applied and the pending batch is still staged.
        assert!(store.properties().expect("properties readable").is_empty());
        assert!(store.links().is_empty());
        assert!(store.owners_of(PropertyId(999)).expect("readable").is_empty());
    }

    #[test]
    fn citizen_may_link_a_property_staged_in_the_same_commit() {
        let mut store = InMemoryCadastre::new();
        store
            .add_districts(vec![sample_district(
                "Sofia",
                vec![sample_property("ABCDEFGHIJKLMNOP", "5 Main St, Sofia")],
            )])
            .expect("adds stage");
        store
            .add_citizens(vec![sample_citizen(vec![PropertyId(1)])])
            .expect("adds stage");

        store.save_changes().expect("combined commit");
        assert_eq!(store.owners_of(PropertyId(1)).expect("readable").len(), 1);
    }
}
