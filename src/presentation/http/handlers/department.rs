//! Department Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use axum_extra::extract::Query as MultiQuery;

use super::resource::{self, FilterParams, Resource, SearchParams};
use crate::application::dto::DepartmentDto;
use crate::application::services::{CrudService, DepartmentService};
use crate::shared::error::AppError;
use crate::startup::AppState;

const RESOURCE: Resource = Resource {
    entity: "Department",
    path: "/api/departments",
};

/// `POST /api/departments`
pub async fn create_department(
    State(state): State<AppState>,
    Json(body): Json<DepartmentDto>,
) -> Result<Response, AppError> {
    resource::create(state.departments.as_ref(), RESOURCE, body).await
}

/// `PUT /api/departments/{id}`
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DepartmentDto>,
) -> Result<Json<DepartmentDto>, AppError> {
    resource::update(state.departments.as_ref(), id, body).await
}

/// `PATCH /api/departments/{id}`
pub async fn partial_update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DepartmentDto>,
) -> Result<Json<DepartmentDto>, AppError> {
    resource::partial_update(state.departments.as_ref(), RESOURCE, id, body).await
}

/// `GET /api/departments`, or `?filter=jobhistory-is-null`
pub async fn get_all_departments(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<DepartmentDto>>, AppError> {
    let departments = match params.filter.as_deref() {
        Some("jobhistory-is-null") => state.departments.find_all_where_job_history_is_null().await?,
        _ => state.departments.find_all().await?,
    };
    Ok(Json(departments))
}

/// `GET /api/departments/{id}`
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DepartmentDto>, AppError> {
    resource::find_one(state.departments.as_ref(), RESOURCE, id).await
}

/// `DELETE /api/departments/{id}`
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.departments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/departments/_search?query=`
pub async fn search_departments(
    State(state): State<AppState>,
    MultiQuery(params): MultiQuery<SearchParams>,
) -> Result<Json<Vec<DepartmentDto>>, AppError> {
    Ok(Json(state.departments.search(&params.query).await?))
}
