use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ResourceDto;

/// Department DTO
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: Option<i64>,

    /// Required on create and full update; optional on partial update.
    #[validate(length(min = 1, max = 100, message = "Department name must be 1-100 characters"))]
    pub department_name: Option<String>,

    pub location_id: Option<i64>,
}

impl ResourceDto for DepartmentDto {
    fn id(&self) -> Option<i64> {
        self.id
    }
}
