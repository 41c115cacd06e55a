//! In-process search index backed by a `DashMap`.

use async_trait::async_trait;
use dashmap::DashMap;

use super::analyzer::{document_tokens, Query};
use crate::domain::{sort_entities, Entity, SearchIndex};
use crate::shared::error::IndexError;
use crate::shared::pagination::{Page, PageRequest};

/// Search documents kept in memory, keyed by entity id.
pub struct MemorySearchIndex<E: Entity> {
    documents: DashMap<i64, E>,
}

impl<E: Entity> Default for MemorySearchIndex<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemorySearchIndex<E> {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Stored document for `id`.
    pub fn get(&self, id: i64) -> Option<E> {
        self.documents.get(&id).map(|doc| doc.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matching(&self, query: &str) -> Vec<E> {
        let query = Query::parse(query);
        let mut hits: Vec<E> = self
            .documents
            .iter()
            .filter(|doc| query.matches(&document_tokens(doc.value())))
            .map(|doc| doc.value().clone())
            .collect();
        hits.sort_by_key(|e| e.id());
        hits
    }
}

#[async_trait]
impl<E: Entity> SearchIndex<E> for MemorySearchIndex<E> {
    async fn index(&self, entity: &E) -> Result<(), IndexError> {
        let id = entity.id().ok_or(IndexError::MissingId(E::NAME))?;
        self.documents.insert(id, entity.clone());
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<E>, IndexError> {
        Ok(self.matching(query))
    }

    async fn search_paged(&self, query: &str, page: &PageRequest) -> Result<Page<E>, IndexError> {
        let mut hits = self.matching(query);
        sort_entities(&mut hits, &page.sort)?;
        Ok(Page::from_ordered(hits, page))
    }

    async fn delete_from_index_by_id(&self, id: i64) -> Result<(), IndexError> {
        self.documents.remove(&id);
        Ok(())
    }
}
