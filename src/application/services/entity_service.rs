//! Generic Entity Service
//!
//! Orchestrates mapper, repository and search index for one entity type.
//! Every write opens a unit of work, commits the durable write and only then
//! mirrors it into the search index. An index failure is reported to the
//! caller but never undoes the committed write.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn, Span};

use crate::application::dto::ResourceDto;
use crate::application::mapper::EntityMapper;
use crate::domain::{Entity, EntityRepository, SearchIndex, TxMode};
use crate::infrastructure::metrics;
use crate::shared::error::{ServiceError, StoreError};
use crate::shared::pagination::{Page, PageRequest};

/// How `update` treats an id that is not in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdatePolicy {
    /// Write the row regardless, like `save` with an id.
    Upsert,
    /// Fail with `NotFound` and write nothing.
    #[default]
    RequireExisting,
}

/// CRUD + search operations exposed for one DTO type.
#[async_trait]
pub trait CrudService<D>: Send + Sync {
    /// Create an entity (or overwrite it when the DTO carries an id).
    async fn save(&self, dto: D) -> Result<D, ServiceError>;

    /// Overwrite an existing entity. The DTO must carry an id.
    async fn update(&self, dto: D) -> Result<D, ServiceError>;

    /// Merge the present attributes into a stored entity.
    /// Returns `None` without writing when the id is unknown.
    async fn partial_update(&self, dto: D) -> Result<Option<D>, ServiceError>;

    /// All entities in id order.
    async fn find_all(&self) -> Result<Vec<D>, ServiceError>;

    /// One page of entities.
    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<D>, ServiceError>;

    /// One entity, with eager relationships.
    async fn find_one(&self, id: i64) -> Result<Option<D>, ServiceError>;

    /// Delete from the store, then from the search index.
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;

    /// Free-text search through the index.
    async fn search(&self, query: &str) -> Result<Vec<D>, ServiceError>;

    /// Paged free-text search through the index.
    async fn search_paged(&self, query: &str, page: PageRequest) -> Result<Page<D>, ServiceError>;
}

/// Service for one entity type, generic over its collaborators.
pub struct EntityService<M, R, S>
where
    M: EntityMapper,
    R: EntityRepository<M::Entity>,
    S: SearchIndex<M::Entity> + ?Sized,
{
    mapper: M,
    repository: Arc<R>,
    search_index: Arc<S>,
    update_policy: UpdatePolicy,
    span: Span,
}

impl<M, R, S> EntityService<M, R, S>
where
    M: EntityMapper,
    R: EntityRepository<M::Entity>,
    S: SearchIndex<M::Entity> + ?Sized,
{
    const NAME: &'static str = <M::Entity as Entity>::NAME;

    /// Create a service logging under its own `entity_service` span.
    pub fn new(mapper: M, repository: Arc<R>, search_index: Arc<S>) -> Self {
        let span = tracing::info_span!("entity_service", entity = <M::Entity as Entity>::NAME);
        Self::with_span(mapper, repository, search_index, span)
    }

    /// Create a service whose operations log as children of `span`.
    pub fn with_span(mapper: M, repository: Arc<R>, search_index: Arc<S>, span: Span) -> Self {
        Self {
            mapper,
            repository,
            search_index,
            update_policy: UpdatePolicy::default(),
            span,
        }
    }

    pub fn with_update_policy(mut self, update_policy: UpdatePolicy) -> Self {
        self.update_policy = update_policy;
        self
    }

    pub fn update_policy(&self) -> UpdatePolicy {
        self.update_policy
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn search_index(&self) -> &Arc<S> {
        &self.search_index
    }

    /// Commit on success, roll back on failure.
    async fn finish<T>(&self, tx: R::Tx, result: Result<T, StoreError>) -> Result<T, ServiceError> {
        match result {
            Ok(value) => {
                self.repository.commit(tx).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.repository.rollback(tx).await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err.into())
            }
        }
    }

    /// Time an operation and count its outcome.
    async fn observed<T, F>(&self, operation: &'static str, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        let started = Instant::now();
        let result = fut.await;
        metrics::record_service_operation(
            Self::NAME,
            operation,
            result.is_ok(),
            started.elapsed().as_secs_f64(),
        );
        result
    }

    /// Mirror a committed write into the search index.
    async fn mirror(&self, operation: &'static str, entity: &M::Entity) -> Result<(), ServiceError> {
        if let Err(err) = self.search_index.index(entity).await {
            metrics::record_index_mirror_failure(Self::NAME, operation);
            warn!(
                id = ?entity.id(),
                error = %err,
                "Store write committed but search index was not updated"
            );
            return Err(err.into());
        }
        Ok(())
    }

    async fn write(
        &self,
        operation: &'static str,
        entity: M::Entity,
        must_exist: bool,
    ) -> Result<M::Dto, ServiceError> {
        let required_id = match (must_exist, entity.id()) {
            (false, _) => None,
            (true, Some(id)) => Some(id),
            (true, None) => return Err(ServiceError::MissingId(Self::NAME)),
        };

        let mut tx = self.repository.begin(TxMode::ReadWrite).await?;

        if let Some(id) = required_id {
            match self.repository.find_by_id(&mut tx, id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    self.repository.rollback(tx).await?;
                    return Err(ServiceError::NotFound {
                        entity: Self::NAME,
                        id,
                    });
                }
                Err(err) => return self.finish(tx, Err(err)).await,
            }
        }

        let result = self.repository.save(&mut tx, entity).await;
        let saved = self.finish(tx, result).await?;
        self.mirror(operation, &saved).await?;
        Ok(self.mapper.to_dto(saved))
    }

    #[instrument(name = "save", parent = &self.span, skip_all)]
    pub async fn save(&self, dto: M::Dto) -> Result<M::Dto, ServiceError> {
        debug!(?dto, "Request to save {}", Self::NAME);
        self.observed("save", async {
            let entity = self.mapper.to_entity(dto)?;
            self.write("save", entity, false).await
        })
        .await
    }

    #[instrument(name = "update", parent = &self.span, skip_all)]
    pub async fn update(&self, dto: M::Dto) -> Result<M::Dto, ServiceError> {
        debug!(?dto, policy = ?self.update_policy, "Request to update {}", Self::NAME);
        self.observed("update", async {
            if dto.id().is_none() {
                return Err(ServiceError::MissingId(Self::NAME));
            }
            let entity = self.mapper.to_entity(dto)?;
            let must_exist = self.update_policy == UpdatePolicy::RequireExisting;
            self.write("update", entity, must_exist).await
        })
        .await
    }

    #[instrument(name = "partial_update", parent = &self.span, skip_all)]
    pub async fn partial_update(&self, dto: M::Dto) -> Result<Option<M::Dto>, ServiceError> {
        debug!(?dto, "Request to partially update {}", Self::NAME);
        self.observed("partial_update", async {
            let id = dto.id().ok_or(ServiceError::MissingId(Self::NAME))?;
            let mut tx = self.repository.begin(TxMode::ReadWrite).await?;

            let result = async {
                match self.repository.find_by_id(&mut tx, id).await? {
                    Some(mut existing) => {
                        self.mapper.partial_update(&mut existing, dto);
                        self.repository.save(&mut tx, existing).await.map(Some)
                    }
                    None => Ok(None),
                }
            }
            .await;

            match self.finish(tx, result).await? {
                Some(saved) => {
                    self.mirror("partial_update", &saved).await?;
                    Ok(Some(self.mapper.to_dto(saved)))
                }
                None => Ok(None),
            }
        })
        .await
    }

    #[instrument(name = "find_all", parent = &self.span, skip_all)]
    pub async fn find_all(&self) -> Result<Vec<M::Dto>, ServiceError> {
        debug!("Request to get all {}", Self::NAME);
        self.observed("find_all", async {
            let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
            let result = self.repository.find_all(&mut tx).await;
            let entities = self.finish(tx, result).await?;
            Ok(entities.into_iter().map(|e| self.mapper.to_dto(e)).collect())
        })
        .await
    }

    #[instrument(name = "find_all_paged", parent = &self.span, skip_all, fields(page = page.page, size = page.size))]
    pub async fn find_all_paged(&self, page: PageRequest) -> Result<Page<M::Dto>, ServiceError> {
        debug!("Request to get a page of {}", Self::NAME);
        self.observed("find_all_paged", async {
            let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
            let result = self.repository.find_all_paged(&mut tx, &page).await;
            let entities = self.finish(tx, result).await?;
            Ok(entities.map(|e| self.mapper.to_dto(e)))
        })
        .await
    }

    #[instrument(name = "find_all_with_eager_relationships", parent = &self.span, skip_all, fields(page = page.page, size = page.size))]
    pub async fn find_all_with_eager_relationships(
        &self,
        page: PageRequest,
    ) -> Result<Page<M::Dto>, ServiceError> {
        debug!("Request to get a page of {} with eager relationships", Self::NAME);
        self.observed("find_all_with_eager_relationships", async {
            let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
            let result = self
                .repository
                .find_all_with_eager_relationships_paged(&mut tx, &page)
                .await;
            let entities = self.finish(tx, result).await?;
            Ok(entities.map(|e| self.mapper.to_dto(e)))
        })
        .await
    }

    /// Load every entity and keep those matching `predicate`.
    ///
    /// Always a full scan; the filter is not pushed down to the store.
    #[instrument(name = "find_all_where", parent = &self.span, skip_all, fields(filter = operation))]
    pub async fn find_all_where<F>(
        &self,
        operation: &'static str,
        predicate: F,
    ) -> Result<Vec<M::Dto>, ServiceError>
    where
        F: Fn(&M::Entity) -> bool + Send,
    {
        self.observed(operation, async {
            let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
            let result = self.repository.find_all(&mut tx).await;
            let entities = self.finish(tx, result).await?;
            Ok(entities
                .into_iter()
                .filter(|e| predicate(e))
                .map(|e| self.mapper.to_dto(e))
                .collect())
        })
        .await
    }

    #[instrument(name = "find_one", parent = &self.span, skip_all, fields(id = id))]
    pub async fn find_one(&self, id: i64) -> Result<Option<M::Dto>, ServiceError> {
        debug!("Request to get {} : {}", Self::NAME, id);
        self.observed("find_one", async {
            let mut tx = self.repository.begin(TxMode::ReadOnly).await?;
            let result = self
                .repository
                .find_one_with_eager_relationships(&mut tx, id)
                .await;
            let entity = self.finish(tx, result).await?;
            Ok(entity.map(|e| self.mapper.to_dto(e)))
        })
        .await
    }

    #[instrument(name = "delete", parent = &self.span, skip_all, fields(id = id))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        debug!("Request to delete {} : {}", Self::NAME, id);
        self.observed("delete", async {
            let mut tx = self.repository.begin(TxMode::ReadWrite).await?;
            let result = self.repository.delete_by_id(&mut tx, id).await;
            self.finish(tx, result).await?;

            if let Err(err) = self.search_index.delete_from_index_by_id(id).await {
                metrics::record_index_mirror_failure(Self::NAME, "delete");
                warn!(id, error = %err, "Store delete committed but search document was not removed");
                return Err(err.into());
            }
            Ok(())
        })
        .await
    }

    #[instrument(name = "search", parent = &self.span, skip_all, fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<M::Dto>, ServiceError> {
        debug!("Request to search {} for query {}", Self::NAME, query);
        self.observed("search", async {
            let hits = self.search_index.search(query).await?;
            Ok(hits.into_iter().map(|e| self.mapper.to_dto(e)).collect())
        })
        .await
    }

    #[instrument(name = "search_paged", parent = &self.span, skip_all, fields(query = %query, page = page.page, size = page.size))]
    pub async fn search_paged(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<M::Dto>, ServiceError> {
        debug!("Request to search for a page of {} for query {}", Self::NAME, query);
        self.observed("search_paged", async {
            let hits = self.search_index.search_paged(query, &page).await?;
            Ok(hits.map(|e| self.mapper.to_dto(e)))
        })
        .await
    }
}

#[async_trait]
impl<M, R, S> CrudService<M::Dto> for EntityService<M, R, S>
where
    M: EntityMapper,
    R: EntityRepository<M::Entity> + 'static,
    S: SearchIndex<M::Entity> + 'static + ?Sized,
{
    async fn save(&self, dto: M::Dto) -> Result<M::Dto, ServiceError> {
        EntityService::save(self, dto).await
    }

    async fn update(&self, dto: M::Dto) -> Result<M::Dto, ServiceError> {
        EntityService::update(self, dto).await
    }

    async fn partial_update(&self, dto: M::Dto) -> Result<Option<M::Dto>, ServiceError> {
        EntityService::partial_update(self, dto).await
    }

    async fn find_all(&self) -> Result<Vec<M::Dto>, ServiceError> {
        EntityService::find_all(self).await
    }

    async fn find_all_paged(&self, page: PageRequest) -> Result<Page<M::Dto>, ServiceError> {
        EntityService::find_all_paged(self, page).await
    }

    async fn find_one(&self, id: i64) -> Result<Option<M::Dto>, ServiceError> {
        EntityService::find_one(self, id).await
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        EntityService::delete(self, id).await
    }

    async fn search(&self, query: &str) -> Result<Vec<M::Dto>, ServiceError> {
        EntityService::search(self, query).await
    }

    async fn search_paged(&self, query: &str, page: PageRequest) -> Result<Page<M::Dto>, ServiceError> {
        EntityService::search_paged(self, query, page).await
    }
}
