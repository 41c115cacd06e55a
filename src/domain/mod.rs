//! # Domain Layer
//!
//! Entities plus the contracts the entity services are written against.
//! It is independent of any concrete database or search engine.
//!
//! ## Structure
//!
//! - **entities**: Country, Location, Department, Job
//! - **entity**: the [`Entity`] trait and sorting helpers
//! - **repository**: [`EntityRepository`] and the [`UnitOfWork`] boundary
//! - **search**: [`SearchIndex`], the free-text mirror of the store
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository and index traits define data access contracts
//! - Implementations live in the infrastructure layer

pub mod entities;
pub mod entity;
pub mod repository;
pub mod search;

// Re-export commonly used types
pub use entities::*;
pub use entity::{check_sort, sort_entities, Entity, SortValue, UnknownSortProperty};
pub use repository::{EntityRepository, TxMode, UnitOfWork};
pub use search::SearchIndex;
