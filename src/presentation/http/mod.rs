//! HTTP API
//!
//! Entity resources under `/api`, plus health and metrics endpoints.

pub mod handlers;
pub mod routes;
