//! Data Transfer Objects
//!
//! Transport-facing projections of the entities. Relations are flattened
//! to ids. Every attribute is optional so the same shape serves create,
//! full update and partial update; required attributes are enforced by the
//! mappers.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

pub mod country;
pub mod department;
pub mod job;
pub mod location;

pub use country::CountryDto;
pub use department::DepartmentDto;
pub use job::{JobDto, TaskDto};
pub use location::LocationDto;

/// Behaviour shared by every DTO exposed over HTTP.
pub trait ResourceDto:
    Validate + Serialize + DeserializeOwned + Debug + Clone + Send + Sync + 'static
{
    fn id(&self) -> Option<i64>;
}
