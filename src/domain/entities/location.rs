//! Location entity.
//!
//! Maps to the `location` table:
//! - id: BIGSERIAL PRIMARY KEY
//! - street_address, postal_code, city, state_province: VARCHAR NULL
//! - country_id: BIGINT UNIQUE NULL REFERENCES country(id)
//!
//! The `department` relation is owned by `department.location_id`.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Entity, SortValue};

/// A street address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Option<i64>,

    pub street_address: Option<String>,

    pub postal_code: Option<String>,

    pub city: Option<String>,

    pub state_province: Option<String>,

    /// Owning side of the one-to-one with Country.
    pub country_id: Option<i64>,

    /// Id of the department located here (inverse one-to-one).
    pub department_id: Option<i64>,
}

impl Entity for Location {
    const NAME: &'static str = "Location";
    const SORTABLE: &'static [&'static str] =
        &["id", "streetAddress", "postalCode", "city", "stateProvince"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn searchable_text(&self) -> Vec<String> {
        [
            &self.street_address,
            &self.postal_code,
            &self.city,
            &self.state_province,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }

    fn sort_value(&self, property: &str) -> SortValue {
        match property {
            "id" => self.id.into(),
            "streetAddress" => self.street_address.as_ref().into(),
            "postalCode" => self.postal_code.as_ref().into(),
            "city" => self.city.as_ref().into(),
            "stateProvince" => self.state_province.as_ref().into(),
            _ => SortValue::Null,
        }
    }

    fn retain_inverse_relations(&mut self, stored: &Self) {
        self.department_id = stored.department_id;
    }
}
