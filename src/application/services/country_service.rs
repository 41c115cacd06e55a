//! Country Service
//!
//! Business logic for countries.

use async_trait::async_trait;
use tracing::debug;

use super::entity_service::{CrudService, EntityService};
use crate::application::dto::CountryDto;
use crate::application::mapper::CountryMapper;
use crate::domain::{Country, EntityRepository, SearchIndex};
use crate::shared::error::ServiceError;

/// Country service trait
#[async_trait]
pub trait CountryService: CrudService<CountryDto> {
    /// Countries no location points at.
    async fn find_all_where_location_is_null(&self) -> Result<Vec<CountryDto>, ServiceError>;
}

/// Country service implementation
pub type CountryServiceImpl<R, S> = EntityService<CountryMapper, R, S>;

#[async_trait]
impl<R, S> CountryService for EntityService<CountryMapper, R, S>
where
    R: EntityRepository<Country> + 'static,
    S: SearchIndex<Country> + 'static + ?Sized,
{
    async fn find_all_where_location_is_null(&self) -> Result<Vec<CountryDto>, ServiceError> {
        debug!("Request to get all countries where Location is null");
        self.find_all_where("find_all_where_location_is_null", |c: &Country| {
            c.location_id.is_none()
        })
        .await
    }
}
