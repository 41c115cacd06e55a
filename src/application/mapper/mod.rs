//! Entity ↔ DTO mappers.
//!
//! One stateless mapper per entity. `partial_update` merges only the
//! attributes present in the DTO; absent attributes keep their stored value.

pub mod country;
pub mod department;
pub mod job;
pub mod location;

pub use country::CountryMapper;
pub use department::DepartmentMapper;
pub use job::JobMapper;
pub use location::LocationMapper;

use crate::application::dto::ResourceDto;
use crate::domain::Entity;
use crate::shared::error::ServiceError;

/// Bidirectional conversion between an entity and its DTO.
pub trait EntityMapper: Send + Sync + 'static {
    type Entity: Entity;
    type Dto: ResourceDto;

    /// Build an entity from a DTO. Fails when a required attribute is absent.
    fn to_entity(&self, dto: Self::Dto) -> Result<Self::Entity, ServiceError>;

    fn to_dto(&self, entity: Self::Entity) -> Self::Dto;

    /// Merge the attributes present in `dto` into `entity`.
    fn partial_update(&self, entity: &mut Self::Entity, dto: Self::Dto);
}

/// Overwrite `target` only when `value` is present.
pub(crate) fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Same as [`merge`] for nullable attributes.
pub(crate) fn merge_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}
