//! Job Handlers
//!
//! Job listings and search results are paged and carry `X-Total-Count`
//! and `Link` headers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::Query;
use serde::Deserialize;

use super::resource::{self, paged_response, PageParams, Resource, SearchParams};
use crate::application::dto::JobDto;
use crate::application::services::{CrudService, JobService};
use crate::shared::error::AppError;
use crate::startup::AppState;

const RESOURCE: Resource = Resource {
    entity: "Job",
    path: "/api/jobs",
};

const SEARCH_PATH: &str = "/api/jobs/_search";

/// `GET /api/jobs` query: paging, `eagerload` and `filter`.
#[derive(Debug, Default, Deserialize)]
pub struct JobListParams {
    pub filter: Option<String>,
    pub eagerload: Option<bool>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    #[serde(default)]
    pub sort: Vec<String>,
}

/// `POST /api/jobs`
pub async fn create_job(
    State(state): State<AppState>,
    Json(body): Json<JobDto>,
) -> Result<Response, AppError> {
    resource::create(state.jobs.as_ref(), RESOURCE, body).await
}

/// `PUT /api/jobs/{id}`
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JobDto>,
) -> Result<Json<JobDto>, AppError> {
    resource::update(state.jobs.as_ref(), id, body).await
}

/// `PATCH /api/jobs/{id}`
pub async fn partial_update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<JobDto>,
) -> Result<Json<JobDto>, AppError> {
    resource::partial_update(state.jobs.as_ref(), RESOURCE, id, body).await
}

/// `GET /api/jobs`
///
/// `?filter=jobhistory-is-null` returns the unpaged list of free jobs.
/// Otherwise one page is returned, with tasks unless `eagerload=false`.
pub async fn get_all_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
) -> Result<Response, AppError> {
    if params.filter.as_deref() == Some("jobhistory-is-null") {
        let jobs = state.jobs.find_all_where_job_history_is_null().await?;
        return Ok(Json(jobs).into_response());
    }

    let request = PageParams {
        page: params.page,
        size: params.size,
        sort: params.sort,
    }
    .to_page_request()?;

    let page = if params.eagerload.unwrap_or(true) {
        state.jobs.find_all_with_eager_relationships(request).await?
    } else {
        state.jobs.find_all_paged(request).await?
    };
    Ok(paged_response(RESOURCE.path, page))
}

/// `GET /api/jobs/{id}`
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobDto>, AppError> {
    resource::find_one(state.jobs.as_ref(), RESOURCE, id).await
}

/// `DELETE /api/jobs/{id}`
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.jobs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/jobs/_search?query=`
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let request = params.to_page_request()?;
    let page = state.jobs.search_paged(&params.query, request).await?;
    Ok(paged_response(SEARCH_PATH, page))
}
