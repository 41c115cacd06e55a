//! Location Service
//!
//! Business logic for locations.

use async_trait::async_trait;
use tracing::debug;

use super::entity_service::{CrudService, EntityService};
use crate::application::dto::LocationDto;
use crate::application::mapper::LocationMapper;
use crate::domain::{EntityRepository, Location, SearchIndex};
use crate::shared::error::ServiceError;

/// Location service trait
#[async_trait]
pub trait LocationService: CrudService<LocationDto> {
    /// Locations no department points at.
    async fn find_all_where_department_is_null(&self) -> Result<Vec<LocationDto>, ServiceError>;
}

/// Location service implementation
pub type LocationServiceImpl<R, S> = EntityService<LocationMapper, R, S>;

#[async_trait]
impl<R, S> LocationService for EntityService<LocationMapper, R, S>
where
    R: EntityRepository<Location> + 'static,
    S: SearchIndex<Location> + 'static + ?Sized,
{
    async fn find_all_where_department_is_null(&self) -> Result<Vec<LocationDto>, ServiceError> {
        debug!("Request to get all locations where Department is null");
        self.find_all_where("find_all_where_department_is_null", |l: &Location| {
            l.department_id.is_none()
        })
        .await
    }
}
