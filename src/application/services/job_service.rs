//! Job Service
//!
//! Business logic for jobs. Listings are paged; single lookups and the
//! eager listing carry the job's tasks.

use async_trait::async_trait;
use tracing::debug;

use super::entity_service::{CrudService, EntityService};
use crate::application::dto::JobDto;
use crate::application::mapper::JobMapper;
use crate::domain::{EntityRepository, Job, SearchIndex};
use crate::shared::error::ServiceError;
use crate::shared::pagination::{Page, PageRequest};

/// Job service trait
#[async_trait]
pub trait JobService: CrudService<JobDto> {
    /// One page of jobs with their tasks loaded.
    async fn find_all_with_eager_relationships(
        &self,
        page: PageRequest,
    ) -> Result<Page<JobDto>, ServiceError>;

    /// Jobs no job history entry points at.
    async fn find_all_where_job_history_is_null(&self) -> Result<Vec<JobDto>, ServiceError>;
}

/// Job service implementation
pub type JobServiceImpl<R, S> = EntityService<JobMapper, R, S>;

#[async_trait]
impl<R, S> JobService for EntityService<JobMapper, R, S>
where
    R: EntityRepository<Job> + 'static,
    S: SearchIndex<Job> + 'static + ?Sized,
{
    async fn find_all_with_eager_relationships(
        &self,
        page: PageRequest,
    ) -> Result<Page<JobDto>, ServiceError> {
        EntityService::find_all_with_eager_relationships(self, page).await
    }

    async fn find_all_where_job_history_is_null(&self) -> Result<Vec<JobDto>, ServiceError> {
        debug!("Request to get all jobs where JobHistory is null");
        self.find_all_where("find_all_where_job_history_is_null", |j: &Job| {
            j.job_history_id.is_none()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::TaskDto;
    use crate::infrastructure::repositories::MemoryRepository;
    use crate::infrastructure::search::MemorySearchIndex;
    use crate::shared::pagination::Sort;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn service() -> JobServiceImpl<MemoryRepository<Job>, MemorySearchIndex<Job>> {
        EntityService::new(
            JobMapper,
            Arc::new(MemoryRepository::new()),
            Arc::new(MemorySearchIndex::new()),
        )
    }

    fn job(title: &str, min: i64, max: i64) -> JobDto {
        JobDto {
            id: None,
            job_title: Some(title.into()),
            min_salary: Some(min),
            max_salary: Some(max),
            tasks: None,
        }
    }

    #[tokio::test]
    async fn test_paged_listing_sorted_by_salary() {
        let service = service();
        for (title, min, max) in [("Clerk", 10, 20), ("Manager", 50, 90), ("Analyst", 30, 60)] {
            service.save(job(title, min, max)).await.unwrap();
        }

        let page = service
            .find_all_paged(PageRequest::new(0, 2).with_sort(Sort::desc("maxSalary")))
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages(), 2);
        let titles: Vec<_> = page.content.iter().filter_map(|j| j.job_title.clone()).collect();
        assert_eq!(titles, vec!["Manager", "Analyst"]);
    }

    #[tokio::test]
    async fn test_eager_listing_and_find_one_carry_tasks() {
        let service = service();
        let saved = service
            .save(JobDto {
                tasks: Some(vec![TaskDto {
                    id: 7,
                    title: Some("Filing".into()),
                }]),
                ..job("Clerk", 10, 20)
            })
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let page = service
            .find_all_with_eager_relationships(PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.content[0].tasks.as_ref().map(Vec::len), Some(1));

        let one = service.find_one(id).await.unwrap().unwrap();
        assert_eq!(one.tasks, saved.tasks);
    }

    #[tokio::test]
    async fn test_search_paged_by_task_title() {
        let service = service();
        service
            .save(JobDto {
                tasks: Some(vec![TaskDto {
                    id: 1,
                    title: Some("Payroll".into()),
                }]),
                ..job("Accountant", 40, 70)
            })
            .await
            .unwrap();
        service.save(job("Clerk", 10, 20)).await.unwrap();

        let page = service
            .search_paged("pay*", PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].job_title.as_deref(), Some("Accountant"));
    }

    #[tokio::test]
    async fn test_find_all_where_job_history_is_null_skips_linked_jobs() {
        let repo = Arc::new(MemoryRepository::with_rows([
            Job {
                id: Some(1),
                job_title: Some("Clerk".into()),
                job_history_id: Some(4),
                ..Default::default()
            },
            Job {
                id: Some(2),
                job_title: Some("Analyst".into()),
                ..Default::default()
            },
        ]));
        let service: JobServiceImpl<_, _> =
            EntityService::new(JobMapper, repo, Arc::new(MemorySearchIndex::new()));

        let free = service.find_all_where_job_history_is_null().await.unwrap();
        assert_eq!(free.iter().map(|j| j.id).collect::<Vec<_>>(), vec![Some(2)]);
    }

    #[tokio::test]
    async fn test_find_all_where_job_history_is_null_on_empty_store() {
        let service: JobServiceImpl<_, _> = EntityService::new(
            JobMapper,
            Arc::new(MemoryRepository::<Job>::new()),
            Arc::new(MemorySearchIndex::new()),
        );
        assert!(service.find_all_where_job_history_is_null().await.unwrap().is_empty());
    }
}
