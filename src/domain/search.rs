//! Search index contract.

use std::sync::Arc;

use async_trait::async_trait;

use super::entity::Entity;
use crate::shared::error::IndexError;
use crate::shared::pagination::{Page, PageRequest};

/// Secondary free-text index holding search documents for one entity type.
///
/// The index is never the source of truth; services mirror every durable
/// write and delete into it.
#[async_trait]
pub trait SearchIndex<E: Entity>: Send + Sync {
    /// Insert or replace the search document of an entity.
    async fn index(&self, entity: &E) -> Result<(), IndexError>;

    /// All documents matching the query, in id order.
    async fn search(&self, query: &str) -> Result<Vec<E>, IndexError>;

    /// One page of documents matching the query.
    async fn search_paged(&self, query: &str, page: &PageRequest) -> Result<Page<E>, IndexError>;

    /// Remove a document. Removing a missing document is a no-op.
    async fn delete_from_index_by_id(&self, id: i64) -> Result<(), IndexError>;
}

#[async_trait]
impl<E, T> SearchIndex<E> for Arc<T>
where
    E: Entity,
    T: SearchIndex<E> + ?Sized,
{
    async fn index(&self, entity: &E) -> Result<(), IndexError> {
        (**self).index(entity).await
    }

    async fn search(&self, query: &str) -> Result<Vec<E>, IndexError> {
        (**self).search(query).await
    }

    async fn search_paged(&self, query: &str, page: &PageRequest) -> Result<Page<E>, IndexError> {
        (**self).search_paged(query, page).await
    }

    async fn delete_from_index_by_id(&self, id: i64) -> Result<(), IndexError> {
        (**self).delete_from_index_by_id(id).await
    }
}
