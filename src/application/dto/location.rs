use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ResourceDto;

/// Location DTO
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub id: Option<i64>,

    #[validate(length(max = 255, message = "Street address must be at most 255 characters"))]
    pub street_address: Option<String>,

    #[validate(length(max = 20, message = "Postal code must be at most 20 characters"))]
    pub postal_code: Option<String>,

    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 100, message = "State/province must be at most 100 characters"))]
    pub state_province: Option<String>,

    pub country_id: Option<i64>,
}

impl ResourceDto for LocationDto {
    fn id(&self) -> Option<i64> {
        self.id
    }
}
