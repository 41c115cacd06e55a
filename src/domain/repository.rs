//! Repository and unit-of-work contracts.
//!
//! Every repository is also a [`UnitOfWork`]: services open a transaction
//! per call, pass it to each repository operation and commit it on success.
//! Dropping an uncommitted transaction rolls it back.

use async_trait::async_trait;

use super::entity::Entity;
use crate::shared::error::StoreError;
use crate::shared::pagination::{Page, PageRequest};

/// Access mode of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

/// Transaction boundary against the durable store.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Open transaction handle. Dropping it without commit discards its writes.
    type Tx: Send;

    /// Begin a new transaction.
    async fn begin(&self, mode: TxMode) -> Result<Self::Tx, StoreError>;

    /// Commit the transaction.
    async fn commit(&self, tx: Self::Tx) -> Result<(), StoreError>;

    /// Rollback the transaction.
    async fn rollback(&self, tx: Self::Tx) -> Result<(), StoreError>;
}

/// Durable store access for one entity type.
#[async_trait]
pub trait EntityRepository<E: Entity>: UnitOfWork {
    /// Find an entity by id. Many-to-many relations are loaded as well.
    async fn find_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<Option<E>, StoreError>;

    /// All entities in id order.
    async fn find_all(&self, tx: &mut Self::Tx) -> Result<Vec<E>, StoreError>;

    /// One page of entities; many-to-many relations are left unloaded.
    async fn find_all_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<E>, StoreError>;

    /// Find an entity by id together with its many-to-many relations.
    async fn find_one_with_eager_relationships(
        &self,
        tx: &mut Self::Tx,
        id: i64,
    ) -> Result<Option<E>, StoreError> {
        self.find_by_id(tx, id).await
    }

    /// One page of entities with their many-to-many relations loaded.
    async fn find_all_with_eager_relationships_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<E>, StoreError> {
        self.find_all_paged(tx, page).await
    }

    /// Insert (no id) or overwrite (id set) an entity. Returns the stored row.
    async fn save(&self, tx: &mut Self::Tx, entity: E) -> Result<E, StoreError>;

    /// Delete by id. Deleting a missing id is a no-op.
    async fn delete_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<(), StoreError>;
}
