use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ResourceDto;

/// Job DTO
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub id: Option<i64>,

    #[validate(length(max = 100, message = "Job title must be at most 100 characters"))]
    pub job_title: Option<String>,

    #[validate(range(min = 0, message = "Minimum salary must not be negative"))]
    pub min_salary: Option<i64>,

    #[validate(range(min = 0, message = "Maximum salary must not be negative"))]
    pub max_salary: Option<i64>,

    /// Absent on partial update keeps the stored tasks.
    pub tasks: Option<Vec<TaskDto>>,
}

/// Task reference inside a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: i64,
    pub title: Option<String>,
}

impl ResourceDto for JobDto {
    fn id(&self) -> Option<i64> {
        self.id
    }
}
