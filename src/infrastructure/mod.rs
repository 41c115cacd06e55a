//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Durable store repositories (PostgreSQL, in-memory)
//! - Search indexes (Redis, in-memory)
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
pub mod search;
