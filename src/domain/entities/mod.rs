//! # Domain Entities
//!
//! Business objects of the HR directory. All entities map directly to
//! their database tables; their serialized form is also the search document.
//!
//! - **Country**: country name; inverse side of Location → Country
//! - **Location**: postal address; owns Location → Country
//! - **Department**: named unit; owns Department → Location
//! - **Job**: job title and salary band; many-to-many with tasks
//!
//! One-to-one relations are stored on the owning side only. The inverse
//! side carries the related id for reads, resolved by the repository.

mod country;
mod department;
mod job;
mod location;

pub use country::Country;
pub use department::Department;
pub use job::{Job, TaskRef};
pub use location::Location;
