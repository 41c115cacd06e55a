//! Repository Implementations
//!
//! Implementations of the domain `EntityRepository` trait.
//!
//! ## Available Repositories
//!
//! - **MemoryRepository** - generic in-process store, used in tests and the
//!   `memory` backend; **MemoryStore** links the four of them
//! - **PgCountryRepository**, **PgLocationRepository**,
//!   **PgDepartmentRepository**, **PgJobRepository** - PostgreSQL
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use hr_directory::infrastructure::repositories::{PgCountryRepository, PgJobRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let countries = PgCountryRepository::new(pool.clone());
//!     let jobs = PgJobRepository::new(pool);
//! }
//! ```

pub mod memory;

pub mod country_repository;
pub mod department_repository;
pub mod job_repository;
pub mod location_repository;

mod sql;

pub use country_repository::PgCountryRepository;
pub use department_repository::PgDepartmentRepository;
pub use job_repository::PgJobRepository;
pub use location_repository::PgLocationRepository;
pub use memory::{
    ForeignKey, ForeignKeys, InverseRelation, MemoryRepository, MemoryStore, MemoryTx,
};
