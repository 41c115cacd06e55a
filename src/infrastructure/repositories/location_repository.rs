//! Location Repository Implementation
//!
//! PostgreSQL implementation of `EntityRepository<Location>`. Owns the
//! `country_id` foreign key; the inverse `department` relation is resolved
//! through `department.location_id`.

use async_trait::async_trait;
use sqlx::PgPool;

use super::sql::{advance_sequence, count, order_by, write_error};
use crate::domain::{EntityRepository, Location};
use crate::infrastructure::database::unit_of_work::pg_unit_of_work;
use crate::shared::error::StoreError;
use crate::shared::pagination::{Page, PageRequest};

const SELECT_LOCATION: &str = r#"
    SELECT l.id, l.street_address, l.postal_code, l.city, l.state_province,
           l.country_id, d.id AS department_id
    FROM location l
    LEFT JOIN department d ON d.location_id = l.id
"#;

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "l.id"),
    ("streetAddress", "LOWER(l.street_address)"),
    ("postalCode", "LOWER(l.postal_code)"),
    ("city", "LOWER(l.city)"),
    ("stateProvince", "LOWER(l.state_province)"),
];

/// Database row representation of the location table.
#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: i64,
    street_address: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    state_province: Option<String>,
    country_id: Option<i64>,
    department_id: Option<i64>,
}

impl LocationRow {
    fn into_location(self) -> Location {
        Location {
            id: Some(self.id),
            street_address: self.street_address,
            postal_code: self.postal_code,
            city: self.city,
            state_province: self.state_province,
            country_id: self.country_id,
            department_id: self.department_id,
        }
    }
}

/// PostgreSQL location repository implementation.
#[derive(Clone)]
pub struct PgLocationRepository {
    pool: PgPool,
}

impl PgLocationRepository {
    /// Create a new PgLocationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pg_unit_of_work!(PgLocationRepository);

#[async_trait]
impl EntityRepository<Location> for PgLocationRepository {
    async fn find_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<Option<Location>, StoreError> {
        let row = sqlx::query_as::<_, LocationRow>(&format!("{SELECT_LOCATION} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(LocationRow::into_location))
    }

    async fn find_all(&self, tx: &mut Self::Tx) -> Result<Vec<Location>, StoreError> {
        let rows = sqlx::query_as::<_, LocationRow>(&format!("{SELECT_LOCATION} ORDER BY l.id"))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(LocationRow::into_location).collect())
    }

    async fn find_all_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<Location>, StoreError> {
        let order = order_by::<Location>(&page.sort, SORT_COLUMNS)?;
        let total = count(tx, "location").await?;

        let rows = sqlx::query_as::<_, LocationRow>(&format!(
            "{SELECT_LOCATION} {order} LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.size))
        .bind(page.offset() as i64)
        .fetch_all(&mut **tx)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(LocationRow::into_location).collect(),
            page,
            total,
        ))
    }

    async fn save(&self, tx: &mut Self::Tx, entity: Location) -> Result<Location, StoreError> {
        let id: i64 = match entity.id {
            None => sqlx::query_scalar(
                r#"
                INSERT INTO location (street_address, postal_code, city, state_province, country_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(&entity.street_address)
            .bind(&entity.postal_code)
            .bind(&entity.city)
            .bind(&entity.state_province)
            .bind(entity.country_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(write_error)?,
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO location (id, street_address, postal_code, city, state_province, country_id)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ON CONFLICT (id) DO UPDATE SET
                        street_address = EXCLUDED.street_address,
                        postal_code = EXCLUDED.postal_code,
                        city = EXCLUDED.city,
                        state_province = EXCLUDED.state_province,
                        country_id = EXCLUDED.country_id
                    "#,
                )
                .bind(id)
                .bind(&entity.street_address)
                .bind(&entity.postal_code)
                .bind(&entity.city)
                .bind(&entity.state_province)
                .bind(entity.country_id)
                .execute(&mut **tx)
                .await
                .map_err(write_error)?;
                advance_sequence(tx, id).await?;
                id
            }
        };

        let row = sqlx::query_as::<_, LocationRow>(&format!("{SELECT_LOCATION} WHERE l.id = $1"))
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.into_location())
    }

    async fn delete_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM location WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}
