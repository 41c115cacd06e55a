use super::{merge, merge_opt, EntityMapper};
use crate::application::dto::{JobDto, TaskDto};
use crate::domain::{Job, TaskRef};
use crate::shared::error::ServiceError;

/// Maps [`Job`] ↔ [`JobDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JobMapper;

fn to_task_refs(tasks: Vec<TaskDto>) -> Vec<TaskRef> {
    let mut refs: Vec<TaskRef> = tasks
        .into_iter()
        .map(|t| TaskRef {
            id: t.id,
            title: t.title,
        })
        .collect();
    // Set semantics, as in the join table.
    refs.sort();
    refs.dedup_by_key(|t| t.id);
    refs
}

impl EntityMapper for JobMapper {
    type Entity = Job;
    type Dto = JobDto;

    fn to_entity(&self, dto: JobDto) -> Result<Job, ServiceError> {
        Ok(Job {
            id: dto.id,
            job_title: dto.job_title,
            min_salary: dto.min_salary,
            max_salary: dto.max_salary,
            tasks: dto.tasks.map(to_task_refs).unwrap_or_default(),
            job_history_id: None,
        })
    }

    fn to_dto(&self, entity: Job) -> JobDto {
        JobDto {
            id: entity.id,
            job_title: entity.job_title,
            min_salary: entity.min_salary,
            max_salary: entity.max_salary,
            tasks: Some(
                entity
                    .tasks
                    .into_iter()
                    .map(|t| TaskDto {
                        id: t.id,
                        title: t.title,
                    })
                    .collect(),
            ),
        }
    }

    fn partial_update(&self, entity: &mut Job, dto: JobDto) {
        merge_opt(&mut entity.job_title, dto.job_title);
        merge_opt(&mut entity.min_salary, dto.min_salary);
        merge_opt(&mut entity.max_salary, dto.max_salary);
        merge(&mut entity.tasks, dto.tasks.map(to_task_refs));
    }
}
