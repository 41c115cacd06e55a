//! Search Module
//!
//! Implementations of the domain `SearchIndex` trait.
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! |  EntityService    |
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! | SearchIndex trait |  <-- Abstract interface
//! +-------------------+
//!          |
//!     +----+-----+
//!     v          v
//! +--------+ +--------------+
//! | Memory | | Redis        |  <-- term sets + lexicographic vocabulary
//! +--------+ +--------------+
//! ```
//!
//! Both adapters share the query syntax of [`analyzer`].

pub mod analyzer;
mod memory_index;
mod redis_index;

pub use memory_index::MemorySearchIndex;
pub use redis_index::RedisSearchIndex;

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::SearchSettings;

/// Creates a Redis connection manager with automatic reconnection.
///
/// # Errors
/// Returns `redis::RedisError` if the URL is invalid or the server is unreachable.
#[instrument(skip(settings), fields(url = %settings.redis_url))]
pub async fn create_redis_client(
    settings: &SearchSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.redis_url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}
