use super::{merge, merge_opt, EntityMapper};
use crate::application::dto::DepartmentDto;
use crate::domain::Department;
use crate::shared::error::ServiceError;

/// Maps [`Department`] ↔ [`DepartmentDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DepartmentMapper;

impl EntityMapper for DepartmentMapper {
    type Entity = Department;
    type Dto = DepartmentDto;

    fn to_entity(&self, dto: DepartmentDto) -> Result<Department, ServiceError> {
        let department_name = dto
            .department_name
            .ok_or_else(|| ServiceError::Validation("departmentName: is required".into()))?;

        Ok(Department {
            id: dto.id,
            department_name,
            location_id: dto.location_id,
            job_history_id: None,
        })
    }

    fn to_dto(&self, entity: Department) -> DepartmentDto {
        DepartmentDto {
            id: entity.id,
            department_name: Some(entity.department_name),
            location_id: entity.location_id,
        }
    }

    fn partial_update(&self, entity: &mut Department, dto: DepartmentDto) {
        merge(&mut entity.department_name, dto.department_name);
        merge_opt(&mut entity.location_id, dto.location_id);
    }
}
