//! Country Repository Implementation
//!
//! PostgreSQL implementation of `EntityRepository<Country>`. The inverse
//! `location` relation is resolved through `location.country_id`.

use async_trait::async_trait;
use sqlx::PgPool;

use super::sql::{advance_sequence, count, order_by, write_error};
use crate::domain::{Country, EntityRepository};
use crate::infrastructure::database::unit_of_work::pg_unit_of_work;
use crate::shared::error::StoreError;
use crate::shared::pagination::{Page, PageRequest};

const SELECT_COUNTRY: &str = r#"
    SELECT c.id, c.country_name, l.id AS location_id
    FROM country c
    LEFT JOIN location l ON l.country_id = c.id
"#;

const SORT_COLUMNS: &[(&str, &str)] = &[("id", "c.id"), ("countryName", "LOWER(c.country_name)")];

/// Database row representation of the country table.
#[derive(Debug, sqlx::FromRow)]
struct CountryRow {
    id: i64,
    country_name: Option<String>,
    location_id: Option<i64>,
}

impl CountryRow {
    fn into_country(self) -> Country {
        Country {
            id: Some(self.id),
            country_name: self.country_name,
            location_id: self.location_id,
        }
    }
}

/// PostgreSQL country repository implementation.
#[derive(Clone)]
pub struct PgCountryRepository {
    pool: PgPool,
}

impl PgCountryRepository {
    /// Create a new PgCountryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pg_unit_of_work!(PgCountryRepository);

#[async_trait]
impl EntityRepository<Country> for PgCountryRepository {
    async fn find_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<Option<Country>, StoreError> {
        let row = sqlx::query_as::<_, CountryRow>(&format!("{SELECT_COUNTRY} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(CountryRow::into_country))
    }

    async fn find_all(&self, tx: &mut Self::Tx) -> Result<Vec<Country>, StoreError> {
        let rows = sqlx::query_as::<_, CountryRow>(&format!("{SELECT_COUNTRY} ORDER BY c.id"))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(CountryRow::into_country).collect())
    }

    async fn find_all_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<Country>, StoreError> {
        let order = order_by::<Country>(&page.sort, SORT_COLUMNS)?;
        let total = count(tx, "country").await?;

        let rows = sqlx::query_as::<_, CountryRow>(&format!(
            "{SELECT_COUNTRY} {order} LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.size))
        .bind(page.offset() as i64)
        .fetch_all(&mut **tx)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(CountryRow::into_country).collect(),
            page,
            total,
        ))
    }

    async fn save(&self, tx: &mut Self::Tx, entity: Country) -> Result<Country, StoreError> {
        let id: i64 = match entity.id {
            None => sqlx::query_scalar(
                r#"
                INSERT INTO country (country_name)
                VALUES ($1)
                RETURNING id
                "#,
            )
            .bind(&entity.country_name)
            .fetch_one(&mut **tx)
            .await
            .map_err(write_error)?,
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO country (id, country_name)
                    VALUES ($1, $2)
                    ON CONFLICT (id) DO UPDATE SET country_name = EXCLUDED.country_name
                    "#,
                )
                .bind(id)
                .bind(&entity.country_name)
                .execute(&mut **tx)
                .await
                .map_err(write_error)?;
                advance_sequence(tx, id).await?;
                id
            }
        };

        let row = sqlx::query_as::<_, CountryRow>(&format!("{SELECT_COUNTRY} WHERE c.id = $1"))
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.into_country())
    }

    async fn delete_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM country WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}
