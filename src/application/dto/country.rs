use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ResourceDto;

/// Country DTO
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CountryDto {
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 100, message = "Country name must be 1-100 characters"))]
    pub country_name: Option<String>,
}

impl ResourceDto for CountryDto {
    fn id(&self) -> Option<i64> {
        self.id
    }
}
