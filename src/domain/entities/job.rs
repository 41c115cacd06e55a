//! Job entity and its task references.
//!
//! Maps to the `job` table; the many-to-many with `task` goes through
//! `rel_job__task (job_id, task_id)`.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Entity, SortValue};

/// A job, with salary band and the tasks it involves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: Option<i64>,

    pub job_title: Option<String>,

    pub min_salary: Option<i64>,

    pub max_salary: Option<i64>,

    /// Tasks of this job. Empty when loaded without eager relationships.
    #[serde(default)]
    pub tasks: Vec<TaskRef>,

    /// Id of the job history entry referencing this job (inverse one-to-one).
    pub job_history_id: Option<i64>,
}

/// Reference to a task row.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: i64,
    pub title: Option<String>,
}

impl Entity for Job {
    const NAME: &'static str = "Job";
    const SORTABLE: &'static [&'static str] = &["id", "jobTitle", "minSalary", "maxSalary"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn searchable_text(&self) -> Vec<String> {
        let mut text: Vec<String> = self.job_title.iter().cloned().collect();
        text.extend(self.min_salary.map(|s| s.to_string()));
        text.extend(self.max_salary.map(|s| s.to_string()));
        text.extend(self.tasks.iter().filter_map(|t| t.title.clone()));
        text
    }

    fn sort_value(&self, property: &str) -> SortValue {
        match property {
            "id" => self.id.into(),
            "jobTitle" => self.job_title.as_ref().into(),
            "minSalary" => self.min_salary.into(),
            "maxSalary" => self.max_salary.into(),
            _ => SortValue::Null,
        }
    }

    fn retain_inverse_relations(&mut self, stored: &Self) {
        self.job_history_id = stored.job_history_id;
    }
}
