use super::{merge_opt, EntityMapper};
use crate::application::dto::CountryDto;
use crate::domain::Country;
use crate::shared::error::ServiceError;

/// Maps [`Country`] ↔ [`CountryDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryMapper;

impl EntityMapper for CountryMapper {
    type Entity = Country;
    type Dto = CountryDto;

    fn to_entity(&self, dto: CountryDto) -> Result<Country, ServiceError> {
        Ok(Country {
            id: dto.id,
            country_name: dto.country_name,
            location_id: None,
        })
    }

    fn to_dto(&self, entity: Country) -> CountryDto {
        CountryDto {
            id: entity.id,
            country_name: entity.country_name,
        }
    }

    fn partial_update(&self, entity: &mut Country, dto: CountryDto) {
        merge_opt(&mut entity.country_name, dto.country_name);
    }
}
