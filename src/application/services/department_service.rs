//! Department Service
//!
//! Business logic for departments.

use async_trait::async_trait;
use tracing::debug;

use super::entity_service::{CrudService, EntityService};
use crate::application::dto::DepartmentDto;
use crate::application::mapper::DepartmentMapper;
use crate::domain::{Department, EntityRepository, SearchIndex};
use crate::shared::error::ServiceError;

/// Department service trait
#[async_trait]
pub trait DepartmentService: CrudService<DepartmentDto> {
    /// Departments no job history entry points at.
    async fn find_all_where_job_history_is_null(&self) -> Result<Vec<DepartmentDto>, ServiceError>;
}

/// Department service implementation
pub type DepartmentServiceImpl<R, S> = EntityService<DepartmentMapper, R, S>;

#[async_trait]
impl<R, S> DepartmentService for EntityService<DepartmentMapper, R, S>
where
    R: EntityRepository<Department> + 'static,
    S: SearchIndex<Department> + 'static + ?Sized,
{
    async fn find_all_where_job_history_is_null(&self) -> Result<Vec<DepartmentDto>, ServiceError> {
        debug!("Request to get all departments where JobHistory is null");
        self.find_all_where("find_all_where_job_history_is_null", |d: &Department| {
            d.job_history_id.is_none()
        })
        .await
    }
}
