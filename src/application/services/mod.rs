//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **EntityService**: generic CRUD + search over one entity type
//! - **CountryService**: countries, plus the location-is-null finder
//! - **LocationService**: locations, plus the department-is-null finder
//! - **DepartmentService**: departments, plus the job-history-is-null finder
//! - **JobService**: paged jobs with eager task loading

pub mod country_service;
pub mod department_service;
pub mod entity_service;
pub mod job_service;
pub mod location_service;

pub use entity_service::{CrudService, EntityService, UpdatePolicy};

pub use country_service::{CountryService, CountryServiceImpl};
pub use department_service::{DepartmentService, DepartmentServiceImpl};
pub use job_service::{JobService, JobServiceImpl};
pub use location_service::{LocationService, LocationServiceImpl};
