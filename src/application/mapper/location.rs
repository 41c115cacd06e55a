use super::{merge_opt, EntityMapper};
use crate::application::dto::LocationDto;
use crate::domain::Location;
use crate::shared::error::ServiceError;

/// Maps [`Location`] ↔ [`LocationDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationMapper;

impl EntityMapper for LocationMapper {
    type Entity = Location;
    type Dto = LocationDto;

    fn to_entity(&self, dto: LocationDto) -> Result<Location, ServiceError> {
        Ok(Location {
            id: dto.id,
            street_address: dto.street_address,
            postal_code: dto.postal_code,
            city: dto.city,
            state_province: dto.state_province,
            country_id: dto.country_id,
            department_id: None,
        })
    }

    fn to_dto(&self, entity: Location) -> LocationDto {
        LocationDto {
            id: entity.id,
            street_address: entity.street_address,
            postal_code: entity.postal_code,
            city: entity.city,
            state_province: entity.state_province,
            country_id: entity.country_id,
        }
    }

    fn partial_update(&self, entity: &mut Location, dto: LocationDto) {
        merge_opt(&mut entity.street_address, dto.street_address);
        merge_opt(&mut entity.postal_code, dto.postal_code);
        merge_opt(&mut entity.city, dto.city);
        merge_opt(&mut entity.state_province, dto.state_province);
        merge_opt(&mut entity.country_id, dto.country_id);
    }
}
