//! Country Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use axum_extra::extract::Query as MultiQuery;

use super::resource::{self, FilterParams, Resource, SearchParams};
use crate::application::dto::CountryDto;
use crate::application::services::{CountryService, CrudService};
use crate::shared::error::AppError;
use crate::startup::AppState;

const RESOURCE: Resource = Resource {
    entity: "Country",
    path: "/api/countries",
};

/// `POST /api/countries`
pub async fn create_country(
    State(state): State<AppState>,
    Json(body): Json<CountryDto>,
) -> Result<Response, AppError> {
    resource::create(state.countries.as_ref(), RESOURCE, body).await
}

/// `PUT /api/countries/{id}`
pub async fn update_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CountryDto>,
) -> Result<Json<CountryDto>, AppError> {
    resource::update(state.countries.as_ref(), id, body).await
}

/// `PATCH /api/countries/{id}`
pub async fn partial_update_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CountryDto>,
) -> Result<Json<CountryDto>, AppError> {
    resource::partial_update(state.countries.as_ref(), RESOURCE, id, body).await
}

/// `GET /api/countries`, or `?filter=location-is-null`
pub async fn get_all_countries(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<CountryDto>>, AppError> {
    let countries = match params.filter.as_deref() {
        Some("location-is-null") => state.countries.find_all_where_location_is_null().await?,
        _ => state.countries.find_all().await?,
    };
    Ok(Json(countries))
}

/// `GET /api/countries/{id}`
pub async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CountryDto>, AppError> {
    resource::find_one(state.countries.as_ref(), RESOURCE, id).await
}

/// `DELETE /api/countries/{id}`
pub async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.countries.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/countries/_search?query=`
pub async fn search_countries(
    State(state): State<AppState>,
    MultiQuery(params): MultiQuery<SearchParams>,
) -> Result<Json<Vec<CountryDto>>, AppError> {
    Ok(Json(state.countries.search(&params.query).await?))
}
