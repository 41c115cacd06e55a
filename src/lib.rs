//! # HR Directory Library
//!
//! Entity services for an HR directory of countries, locations,
//! departments and jobs:
//! - RESTful CRUD endpoints with paging and relationship filters
//! - PostgreSQL (or in-memory) durable store
//! - Redis (or in-memory) full-text search index mirrored on every write
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities, repository and search index traits
//! - **Application Layer**: Entity services, DTOs and mappers
//! - **Infrastructure Layer**: Store, search index and metrics implementations
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! hr_directory/
//! +-- config/         Configuration management
//! +-- domain/         Entities and storage/search traits
//! +-- application/    Entity services, DTOs and mappers
//! +-- infrastructure/ Database, search index and metrics implementations
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, paging, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Entities and traits
pub mod domain;

// Application layer - Entity services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
