//! Country entity.
//!
//! Maps to the `country` table. The `location` relation is owned by
//! `location.country_id`; it is read-only from this side.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Entity, SortValue};

/// A country a location may belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: Option<i64>,

    pub country_name: Option<String>,

    /// Id of the location pointing at this country (inverse one-to-one).
    pub location_id: Option<i64>,
}

impl Entity for Country {
    const NAME: &'static str = "Country";
    const SORTABLE: &'static [&'static str] = &["id", "countryName"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn searchable_text(&self) -> Vec<String> {
        self.country_name.iter().cloned().collect()
    }

    fn sort_value(&self, property: &str) -> SortValue {
        match property {
            "id" => self.id.into(),
            "countryName" => self.country_name.as_ref().into(),
            _ => SortValue::Null,
        }
    }

    fn retain_inverse_relations(&mut self, stored: &Self) {
        self.location_id = stored.location_id;
    }
}
