//! Department entity.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Entity, SortValue};

/// An organisational unit, optionally bound to one location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: Option<i64>,

    /// Department name (required)
    pub department_name: String,

    /// Owning side of the one-to-one with Location.
    pub location_id: Option<i64>,

    /// Id of the job history entry referencing this department (inverse one-to-one).
    pub job_history_id: Option<i64>,
}

impl Entity for Department {
    const NAME: &'static str = "Department";
    const SORTABLE: &'static [&'static str] = &["id", "departmentName"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn searchable_text(&self) -> Vec<String> {
        vec![self.department_name.clone()]
    }

    fn sort_value(&self, property: &str) -> SortValue {
        match property {
            "id" => self.id.into(),
            "departmentName" => self.department_name.as_str().into(),
            _ => SortValue::Null,
        }
    }

    fn retain_inverse_relations(&mut self, stored: &Self) {
        self.job_history_id = stored.job_history_id;
    }
}
