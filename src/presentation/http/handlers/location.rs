//! Location Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use axum_extra::extract::Query as MultiQuery;

use super::resource::{self, FilterParams, Resource, SearchParams};
use crate::application::dto::LocationDto;
use crate::application::services::{CrudService, LocationService};
use crate::shared::error::AppError;
use crate::startup::AppState;

const RESOURCE: Resource = Resource {
    entity: "Location",
    path: "/api/locations",
};

/// `POST /api/locations`
pub async fn create_location(
    State(state): State<AppState>,
    Json(body): Json<LocationDto>,
) -> Result<Response, AppError> {
    resource::create(state.locations.as_ref(), RESOURCE, body).await
}

/// `PUT /api/locations/{id}`
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<LocationDto>,
) -> Result<Json<LocationDto>, AppError> {
    resource::update(state.locations.as_ref(), id, body).await
}

/// `PATCH /api/locations/{id}`
pub async fn partial_update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<LocationDto>,
) -> Result<Json<LocationDto>, AppError> {
    resource::partial_update(state.locations.as_ref(), RESOURCE, id, body).await
}

/// `GET /api/locations`, or `?filter=department-is-null`
pub async fn get_all_locations(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<LocationDto>>, AppError> {
    let locations = match params.filter.as_deref() {
        Some("department-is-null") => state.locations.find_all_where_department_is_null().await?,
        _ => state.locations.find_all().await?,
    };
    Ok(Json(locations))
}

/// `GET /api/locations/{id}`
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LocationDto>, AppError> {
    resource::find_one(state.locations.as_ref(), RESOURCE, id).await
}

/// `DELETE /api/locations/{id}`
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.locations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/locations/_search?query=`
pub async fn search_locations(
    State(state): State<AppState>,
    MultiQuery(params): MultiQuery<SearchParams>,
) -> Result<Json<Vec<LocationDto>>, AppError> {
    Ok(Json(state.locations.search(&params.query).await?))
}
