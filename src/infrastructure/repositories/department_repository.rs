//! Department Repository Implementation
//!
//! PostgreSQL implementation of `EntityRepository<Department>`.

use async_trait::async_trait;
use sqlx::PgPool;

use super::sql::{advance_sequence, count, order_by, write_error};
use crate::domain::{Department, EntityRepository};
use crate::infrastructure::database::unit_of_work::pg_unit_of_work;
use crate::shared::error::StoreError;
use crate::shared::pagination::{Page, PageRequest};

const SELECT_DEPARTMENT: &str = r#"
    SELECT d.id, d.department_name, d.location_id, h.id AS job_history_id
    FROM department d
    LEFT JOIN job_history h ON h.department_id = d.id
"#;

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "d.id"),
    ("departmentName", "LOWER(d.department_name)"),
];

/// Database row representation of the department table.
#[derive(Debug, sqlx::FromRow)]
struct DepartmentRow {
    id: i64,
    department_name: String,
    location_id: Option<i64>,
    job_history_id: Option<i64>,
}

impl DepartmentRow {
    fn into_department(self) -> Department {
        Department {
            id: Some(self.id),
            department_name: self.department_name,
            location_id: self.location_id,
            job_history_id: self.job_history_id,
        }
    }
}

/// PostgreSQL department repository implementation.
#[derive(Clone)]
pub struct PgDepartmentRepository {
    pool: PgPool,
}

impl PgDepartmentRepository {
    /// Create a new PgDepartmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pg_unit_of_work!(PgDepartmentRepository);

#[async_trait]
impl EntityRepository<Department> for PgDepartmentRepository {
    async fn find_by_id(
        &self,
        tx: &mut Self::Tx,
        id: i64,
    ) -> Result<Option<Department>, StoreError> {
        let row =
            sqlx::query_as::<_, DepartmentRow>(&format!("{SELECT_DEPARTMENT} WHERE d.id = $1"))
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(row.map(DepartmentRow::into_department))
    }

    async fn find_all(&self, tx: &mut Self::Tx) -> Result<Vec<Department>, StoreError> {
        let rows = sqlx::query_as::<_, DepartmentRow>(&format!("{SELECT_DEPARTMENT} ORDER BY d.id"))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(DepartmentRow::into_department).collect())
    }

    async fn find_all_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<Department>, StoreError> {
        let order = order_by::<Department>(&page.sort, SORT_COLUMNS)?;
        let total = count(tx, "department").await?;

        let rows = sqlx::query_as::<_, DepartmentRow>(&format!(
            "{SELECT_DEPARTMENT} {order} LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.size))
        .bind(page.offset() as i64)
        .fetch_all(&mut **tx)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(DepartmentRow::into_department).collect(),
            page,
            total,
        ))
    }

    async fn save(&self, tx: &mut Self::Tx, entity: Department) -> Result<Department, StoreError> {
        let id: i64 = match entity.id {
            None => sqlx::query_scalar(
                r#"
                INSERT INTO department (department_name, location_id)
                VALUES ($1, $2)
                RETURNING id
                "#,
            )
            .bind(&entity.department_name)
            .bind(entity.location_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(write_error)?,
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO department (id, department_name, location_id)
                    VALUES ($1, $2, $3)
                    ON CONFLICT (id) DO UPDATE SET
                        department_name = EXCLUDED.department_name,
                        location_id = EXCLUDED.location_id
                    "#,
                )
                .bind(id)
                .bind(&entity.department_name)
                .bind(entity.location_id)
                .execute(&mut **tx)
                .await
                .map_err(write_error)?;
                advance_sequence(tx, id).await?;
                id
            }
        };

        let row =
            sqlx::query_as::<_, DepartmentRow>(&format!("{SELECT_DEPARTMENT} WHERE d.id = $1"))
                .bind(id)
                .fetch_one(&mut **tx)
                .await?;

        Ok(row.into_department())
    }

    async fn delete_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM department WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}
