//! Job Repository Implementation
//!
//! PostgreSQL implementation of `EntityRepository<Job>`. Tasks live in the
//! `rel_job__task` join table and are only loaded by the single-row and
//! eager lookups; plain listings leave them empty.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::sql::{advance_sequence, count, order_by, write_error};
use crate::domain::{EntityRepository, Job, TaskRef};
use crate::infrastructure::database::unit_of_work::pg_unit_of_work;
use crate::infrastructure::database::PgTx;
use crate::shared::error::StoreError;
use crate::shared::pagination::{Page, PageRequest};

const SELECT_JOB: &str = r#"
    SELECT j.id, j.job_title, j.min_salary, j.max_salary, h.id AS job_history_id
    FROM job j
    LEFT JOIN job_history h ON h.job_id = j.id
"#;

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("id", "j.id"),
    ("jobTitle", "LOWER(j.job_title)"),
    ("minSalary", "j.min_salary"),
    ("maxSalary", "j.max_salary"),
];

/// Database row representation of the job table.
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    job_title: Option<String>,
    min_salary: Option<i64>,
    max_salary: Option<i64>,
    job_history_id: Option<i64>,
}

impl JobRow {
    fn into_job(self) -> Job {
        Job {
            id: Some(self.id),
            job_title: self.job_title,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            tasks: Vec::new(),
            job_history_id: self.job_history_id,
        }
    }
}

/// A task joined to one of the requested jobs.
#[derive(Debug, sqlx::FromRow)]
struct JobTaskRow {
    job_id: i64,
    id: i64,
    title: Option<String>,
}

/// PostgreSQL job repository implementation.
#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    /// Create a new PgJobRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page(
        &self,
        tx: &mut PgTx,
        page: &PageRequest,
    ) -> Result<Page<Job>, StoreError> {
        let order = order_by::<Job>(&page.sort, SORT_COLUMNS)?;
        let total = count(tx, "job").await?;

        let rows = sqlx::query_as::<_, JobRow>(&format!("{SELECT_JOB} {order} LIMIT $1 OFFSET $2"))
            .bind(i64::from(page.size))
            .bind(page.offset() as i64)
            .fetch_all(&mut **tx)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(JobRow::into_job).collect(),
            page,
            total,
        ))
    }

    /// Fill in the tasks of every job in `jobs` with one query.
    async fn load_tasks(&self, tx: &mut PgTx, jobs: &mut [Job]) -> Result<(), StoreError> {
        let ids: Vec<i64> = jobs.iter().filter_map(|j| j.id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let rows = sqlx::query_as::<_, JobTaskRow>(
            r#"
            SELECT r.job_id, t.id, t.title
            FROM rel_job__task r
            INNER JOIN task t ON t.id = r.task_id
            WHERE r.job_id = ANY($1)
            ORDER BY r.job_id, t.id
            "#,
        )
        .bind(ids)
        .fetch_all(&mut **tx)
        .await?;

        let mut by_job: HashMap<i64, Vec<TaskRef>> = HashMap::new();
        for row in rows {
            by_job.entry(row.job_id).or_default().push(TaskRef {
                id: row.id,
                title: row.title,
            });
        }

        for job in jobs.iter_mut() {
            if let Some(id) = job.id {
                job.tasks = by_job.remove(&id).unwrap_or_default();
            }
        }
        Ok(())
    }

    async fn replace_tasks(&self, tx: &mut PgTx, job_id: i64, tasks: &[TaskRef]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM rel_job__task WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut **tx)
            .await?;

        if tasks.is_empty() {
            return Ok(());
        }

        let task_ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        sqlx::query(
            r#"
            INSERT INTO rel_job__task (job_id, task_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(job_id)
        .bind(task_ids)
        .execute(&mut **tx)
        .await
        .map_err(write_error)?;
        Ok(())
    }
}

pg_unit_of_work!(PgJobRepository);

#[async_trait]
impl EntityRepository<Job> for PgJobRepository {
    async fn find_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, JobRow>(&format!("{SELECT_JOB} WHERE j.id = $1"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut jobs = [row.into_job()];
        self.load_tasks(tx, &mut jobs).await?;
        let [job] = jobs;
        Ok(Some(job))
    }

    async fn find_all(&self, tx: &mut Self::Tx) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!("{SELECT_JOB} ORDER BY j.id"))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(JobRow::into_job).collect())
    }

    async fn find_all_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<Job>, StoreError> {
        self.page(tx, page).await
    }

    async fn find_all_with_eager_relationships_paged(
        &self,
        tx: &mut Self::Tx,
        page: &PageRequest,
    ) -> Result<Page<Job>, StoreError> {
        let mut jobs = self.page(tx, page).await?;
        self.load_tasks(tx, &mut jobs.content).await?;
        Ok(jobs)
    }

    async fn save(&self, tx: &mut Self::Tx, entity: Job) -> Result<Job, StoreError> {
        let id: i64 = match entity.id {
            None => sqlx::query_scalar(
                r#"
                INSERT INTO job (job_title, min_salary, max_salary)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
            )
            .bind(&entity.job_title)
            .bind(entity.min_salary)
            .bind(entity.max_salary)
            .fetch_one(&mut **tx)
            .await
            .map_err(write_error)?,
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO job (id, job_title, min_salary, max_salary)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id) DO UPDATE SET
                        job_title = EXCLUDED.job_title,
                        min_salary = EXCLUDED.min_salary,
                        max_salary = EXCLUDED.max_salary
                    "#,
                )
                .bind(id)
                .bind(&entity.job_title)
                .bind(entity.min_salary)
                .bind(entity.max_salary)
                .execute(&mut **tx)
                .await
                .map_err(write_error)?;
                advance_sequence(tx, id).await?;
                id
            }
        };

        self.replace_tasks(tx, id, &entity.tasks).await?;

        self.find_by_id(tx, id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn delete_by_id(&self, tx: &mut Self::Tx, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM job WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}
