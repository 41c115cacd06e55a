//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod country;
pub mod department;
pub mod health;
pub mod job;
pub mod location;
pub mod resource;
