//! In-memory repository.
//!
//! Rows live in an ordered map behind a `parking_lot` lock. A transaction
//! stages its writes and applies them atomically on commit; reads inside the
//! transaction see committed rows overlaid with the staged writes.
//!
//! Stores are linked through [`InverseRelation`]s the way the schema links
//! its tables: the inverse side of a one-to-one is read from the owning
//! store's foreign keys, and deleting a row clears the keys pointing at it
//! (`ON DELETE SET NULL`). [`MemoryStore`] wires the four entity stores.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{
    sort_entities, Country, Department, Entity, EntityRepository, Job, Location, TxMode, UnitOfWork,
};
use crate::shared::error::StoreError;
use crate::shared::pagination::{Page, PageRequest};

enum Staged<E> {
    Put(E),
    Delete(i64),
}

/// Transaction handle for [`MemoryRepository`].
pub struct MemoryTx<E> {
    mode: TxMode,
    staged: Vec<Staged<E>>,
}

impl<E> MemoryTx<E> {
    fn writable(&self) -> Result<(), StoreError> {
        match self.mode {
            TxMode::ReadWrite => Ok(()),
            TxMode::ReadOnly => Err(StoreError::ReadOnly),
        }
    }
}

/// Foreign keys held by the rows of another store.
pub trait ForeignKeys: Send + Sync {
    /// Referenced id to the lowest referencing row id, over committed rows.
    fn references(&self) -> HashMap<i64, i64>;

    /// Clear the key on every committed row that references `target`.
    fn clear_references(&self, target: i64);
}

/// A nullable foreign key column of the store `O`.
pub struct ForeignKey<O: Entity> {
    owner: Arc<MemoryRepository<O>>,
    key: fn(&O) -> Option<i64>,
    clear: fn(&mut O),
}

impl<O: Entity> ForeignKey<O> {
    pub fn new(
        owner: Arc<MemoryRepository<O>>,
        key: fn(&O) -> Option<i64>,
        clear: fn(&mut O),
    ) -> Self {
        Self { owner, key, clear }
    }
}

impl<O: Entity> ForeignKeys for ForeignKey<O> {
    fn references(&self) -> HashMap<i64, i64> {
        let mut refs = HashMap::new();
        for (id, row) in self.owner.rows.read().iter() {
            if let Some(target) = (self.key)(row) {
                refs.entry(target).or_insert(*id);
            }
        }
        refs
    }

    fn clear_references(&self, target: i64) {
        for row in self.owner.rows.write().values_mut() {
            if (self.key)(row) == Some(target) {
                (self.clear)(row);
            }
        }
    }
}

/// The inverse side of a one-to-one owned by another store.
pub struct InverseRelation<E> {
    owner: Arc<dyn ForeignKeys>,
    assign: fn(&mut E, Option<i64>),
}

impl<E> InverseRelation<E> {
    pub fn new(owner: impl ForeignKeys + 'static, assign: fn(&mut E, Option<i64>)) -> Self {
        Self {
            owner: Arc::new(owner),
            assign,
        }
    }
}

/// Entity store kept in process memory.
pub struct MemoryRepository<E: Entity> {
    rows: RwLock<BTreeMap<i64, E>>,
    sequence: AtomicI64,
    inverse: Option<InverseRelation<E>>,
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(0),
            inverse: None,
        }
    }

    /// Resolve the inverse relation from the owning store on every read.
    pub fn with_inverse(mut self, relation: InverseRelation<E>) -> Self {
        self.inverse = Some(relation);
        self
    }

    /// Seed the store. Rows without an id get the next sequence value.
    pub fn with_rows(rows: impl IntoIterator<Item = E>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.rows.write();
            for mut row in rows {
                let id = match row.id() {
                    Some(id) => {
                        repo.sequence.fetch_max(id, Ordering::SeqCst);
                        id
                    }
                    None => {
                        let id = repo.next_id();
                        row.set_id(id);
                        id
                    }
                };
                map.insert(id, row);
            }
        }
        repo
    }

    /// Committed row, outside any transaction.
    pub fn get(&self, id: i64) -> Option<E> {
        let mut row = self.rows.read().get(&id).cloned()?;
        self.resolve_one(&mut row);
        Some(row)
    }

    /// Number of committed rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn resolve_one(&self, row: &mut E) {
        if let (Some(inverse), Some(id)) = (&self.inverse, row.id()) {
            (inverse.assign)(row, inverse.owner.references().get(&id).copied());
        }
    }

    fn resolve_all(&self, rows: &mut BTreeMap<i64, E>) {
        if let Some(inverse) = &self.inverse {
            let refs = inverse.owner.references();
            for (id, row) in rows.iter_mut() {
                (inverse.assign)(row, refs.get(id).copied());
            }
        }
    }

    /// Committed rows with the transaction's staged writes applied.
    fn view(&self, tx: &MemoryTx<E>) -> BTreeMap<i64, E> {
        let mut rows = self.rows.read().clone();
        for op in &tx.staged {
            match op {
                Staged::Put(entity) => {
                    if let Some(id) = entity.id() {
                        rows.insert(id, entity.clone());
                    }
                }
                Staged::Delete(id) => {
                    rows.remove(id);
                }
            }
        }
        self.resolve_all(&mut rows);
        rows
    }

    fn lookup(&self, tx: &MemoryTx<E>, id: i64) -> Option<E> {
        for op in tx.staged.iter().rev() {
            match op {
                Staged::Put(entity) if entity.id() == Some(id) => {
                    let mut row = entity.clone();
                    self.resolve_one(&mut row);
                    return Some(row);
                }
                Staged::Delete(deleted) if *deleted == id => return None,
                _ => {}
            }
        }
        self.get(id)
    }

    fn page_of(&self, tx: &MemoryTx<E>, page: &PageRequest) -> Result<Page<E>, StoreError> {
        let mut all: Vec<E> = self.view(tx).into_values().collect();
        sort_entities(&mut all, &page.sort)?;
        Ok(Page::from_ordered(all, page))
    }
}

#[async_trait]
impl<E: Entity> UnitOfWork for MemoryRepository<E> {
    type Tx = MemoryTx<E>;

    async fn begin(&self, mode: TxMode) -> Result<Self::Tx, StoreError> {
        Ok(MemoryTx {
            mode,
            staged: Vec::new(),
        })
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), StoreError> {
        if tx.staged.is_empty() {
            return Ok(());
        }
        let mut deleted = Vec::new();
        {
            let mut rows = self.rows.write();
            for op in tx.staged {
                match op {
                    Staged::Put(entity) => {
                        if let Some(id) = entity.id() {
                            rows.insert(id, entity);
                        }
                    }
                    Staged::Delete(id) => {
                        if rows.remove(&id).is_some() {
                            deleted.push(id);
                        }
                    }
                }
            }
        }
        if let Some(inverse) = &self.inverse {
            for id in deleted {
                inverse.owner.clear_references(id);
            }
        }
        Ok(())
    }

    async fn rollback(&self, _tx: Self::Tx) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for MemoryRepository<E> {
    async fn find_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<Option<E>, StoreError> {
        Ok(self.lookup(tx, id))
    }

    async fn find_all(&self, tx: &mut Self::Tx) -> Result<Vec<E>, StoreError> {
        Ok(self.view(tx).into_values().collect())
    }

    async fn find_all_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<E>, StoreError> {
        self.page_of(tx, page)
    }

    async fn save(&self, tx: &mut Self::Tx, mut entity: E) -> Result<E, StoreError> {
        tx.writable()?;

        match entity.id() {
            Some(id) => {
                self.sequence.fetch_max(id, Ordering::SeqCst);
                if let Some(stored) = self.lookup(tx, id) {
                    entity.retain_inverse_relations(&stored);
                }
            }
            None => entity.set_id(self.next_id()),
        }

        tx.staged.push(Staged::Put(entity.clone()));
        self.resolve_one(&mut entity);
        Ok(entity)
    }

    async fn delete_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<(), StoreError> {
        tx.writable()?;
        tx.staged.push(Staged::Delete(id));
        Ok(())
    }
}

/// Memory stores for every entity, linked like the schema's foreign keys.
///
/// `location.country_id` backs `Country.location_id` and
/// `department.location_id` backs `Location.department_id`. Job history is
/// not stored here, so `job_history_id` stays unset.
pub struct MemoryStore {
    pub countries: Arc<MemoryRepository<Country>>,
    pub locations: Arc<MemoryRepository<Location>>,
    pub departments: Arc<MemoryRepository<Department>>,
    pub jobs: Arc<MemoryRepository<Job>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let departments = Arc::new(MemoryRepository::<Department>::new());
        let locations = Arc::new(MemoryRepository::<Location>::new().with_inverse(
            InverseRelation::new(
                ForeignKey::new(
                    departments.clone(),
                    |d: &Department| d.location_id,
                    |d: &mut Department| d.location_id = None,
                ),
                |l: &mut Location, department| l.department_id = department,
            ),
        ));
        let countries = Arc::new(MemoryRepository::<Country>::new().with_inverse(
            InverseRelation::new(
                ForeignKey::new(
                    locations.clone(),
                    |l: &Location| l.country_id,
                    |l: &mut Location| l.country_id = None,
                ),
                |c: &mut Country, location| c.location_id = location,
            ),
        ));

        Self {
            countries,
            locations,
            departments,
            jobs: Arc::new(MemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::pagination::Sort;
    use pretty_assertions::assert_eq;
    use tokio_test::{assert_err, assert_ok};

    fn country(name: &str) -> Country {
        Country {
            id: None,
            country_name: Some(name.to_string()),
            location_id: None,
        }
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = MemoryRepository::<Country>::new();
        let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
        let a = repo.save(&mut tx, country("Chile")).await.unwrap();
        let b = repo.save(&mut tx, country("Peru")).await.unwrap();
        repo.commit(tx).await.unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let repo = MemoryRepository::<Country>::new();
        {
            let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
            repo.save(&mut tx, country("Chile")).await.unwrap();
            let seen = repo.find_all(&mut tx).await.unwrap();
            assert_eq!(seen.len(), 1);
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_read_only_transaction_rejects_writes() {
        let repo = MemoryRepository::<Country>::new();
        let mut tx = repo.begin(TxMode::ReadOnly).await.unwrap();
        let err = assert_err!(repo.save(&mut tx, country("Chile")).await);
        assert!(matches!(err, StoreError::ReadOnly));
        assert_err!(repo.delete_by_id(&mut tx, 1).await);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let repo = MemoryRepository::with_rows([country("Chile")]);
        let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
        assert_ok!(repo.delete_by_id(&mut tx, 42).await);
        assert_ok!(repo.commit(tx).await);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_inverse_relation() {
        let repo = MemoryRepository::with_rows([Location {
            id: Some(7),
            city: Some("Lima".into()),
            department_id: Some(3),
            ..Default::default()
        }]);

        let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
        let saved = repo
            .save(
                &mut tx,
                Location {
                    id: Some(7),
                    city: Some("Cusco".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        repo.commit(tx).await.unwrap();

        assert_eq!(saved.department_id, Some(3));
        assert_eq!(repo.get(7).unwrap().city.as_deref(), Some("Cusco"));
    }

    #[tokio::test]
    async fn test_explicit_id_advances_sequence() {
        let repo = MemoryRepository::<Country>::new();
        let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
        repo.save(
            &mut tx,
            Country {
                id: Some(10),
                ..country("Chile")
            },
        )
        .await
        .unwrap();
        let next = repo.save(&mut tx, country("Peru")).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn test_paged_find_sorts_and_counts() {
        let repo = MemoryRepository::with_rows(["b", "c", "a"].map(country));
        let mut tx = repo.begin(TxMode::ReadOnly).await.unwrap();
        let page = repo
            .find_all_paged(
                &mut tx,
                &PageRequest::new(0, 2).with_sort(Sort::asc("countryName")),
            )
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        let names: Vec<_> = page
            .content
            .iter()
            .filter_map(|c| c.country_name.clone())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_paged_find_rejects_unknown_sort() {
        let repo = MemoryRepository::<Country>::new();
        let mut tx = repo.begin(TxMode::ReadOnly).await.unwrap();
        let err = repo
            .find_all_paged(&mut tx, &PageRequest::default().with_sort(Sort::asc("nope")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidSort(_)));
    }

    async fn commit_save<E: Entity>(repo: &MemoryRepository<E>, entity: E) -> E {
        let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
        let saved = repo.save(&mut tx, entity).await.unwrap();
        repo.commit(tx).await.unwrap();
        saved
    }

    async fn commit_delete<E: Entity>(repo: &MemoryRepository<E>, id: i64) {
        let mut tx = repo.begin(TxMode::ReadWrite).await.unwrap();
        repo.delete_by_id(&mut tx, id).await.unwrap();
        repo.commit(tx).await.unwrap();
    }

    #[tokio::test]
    async fn test_inverse_relation_follows_owning_writes() {
        let store = MemoryStore::new();
        let chile = commit_save(&store.countries, country("Chile")).await;
        let peru = commit_save(&store.countries, country("Peru")).await;
        assert_eq!(chile.location_id, None);

        let lima = commit_save(
            &store.locations,
            Location {
                city: Some("Lima".into()),
                country_id: peru.id,
                ..Default::default()
            },
        )
        .await;

        let mut tx = store.countries.begin(TxMode::ReadOnly).await.unwrap();
        let linked: Vec<_> = store
            .countries
            .find_all(&mut tx)
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.id, c.location_id))
            .collect();
        assert_eq!(linked, vec![(chile.id, None), (peru.id, lima.id)]);

        commit_save(
            &store.locations,
            Location {
                country_id: None,
                ..lima.clone()
            },
        )
        .await;
        assert_eq!(store.countries.get(peru.id.unwrap()).unwrap().location_id, None);
    }

    #[tokio::test]
    async fn test_saving_inverse_side_reports_current_link() {
        let store = MemoryStore::new();
        let lima = commit_save(
            &store.locations,
            Location {
                city: Some("Lima".into()),
                ..Default::default()
            },
        )
        .await;
        let sales = commit_save(
            &store.departments,
            Department {
                department_name: "Sales".into(),
                location_id: lima.id,
                ..Default::default()
            },
        )
        .await;

        let renamed = commit_save(
            &store.locations,
            Location {
                city: Some("Cusco".into()),
                ..lima
            },
        )
        .await;
        assert_eq!(renamed.department_id, sales.id);
    }

    #[tokio::test]
    async fn test_delete_clears_foreign_keys_pointing_at_row() {
        let store = MemoryStore::new();
        let chile = commit_save(&store.countries, country("Chile")).await;
        let santiago = commit_save(
            &store.locations,
            Location {
                city: Some("Santiago".into()),
                country_id: chile.id,
                ..Default::default()
            },
        )
        .await;
        let it = commit_save(
            &store.departments,
            Department {
                department_name: "IT".into(),
                location_id: santiago.id,
                ..Default::default()
            },
        )
        .await;

        commit_delete(&store.countries, chile.id.unwrap()).await;
        let santiago = store.locations.get(santiago.id.unwrap()).unwrap();
        assert_eq!(santiago.country_id, None);
        assert_eq!(santiago.department_id, it.id);

        commit_delete(&store.locations, santiago.id.unwrap()).await;
        assert_eq!(store.departments.get(it.id.unwrap()).unwrap().location_id, None);
    }

    #[tokio::test]
    async fn test_rolled_back_delete_keeps_foreign_keys() {
        let store = MemoryStore::new();
        let chile = commit_save(&store.countries, country("Chile")).await;
        let santiago = commit_save(
            &store.locations,
            Location {
                country_id: chile.id,
                ..Default::default()
            },
        )
        .await;

        let mut tx = store.countries.begin(TxMode::ReadWrite).await.unwrap();
        store.countries.delete_by_id(&mut tx, chile.id.unwrap()).await.unwrap();
        store.countries.rollback(tx).await.unwrap();

        assert_eq!(store.locations.get(santiago.id.unwrap()).unwrap().country_id, chile.id);
    }
}
