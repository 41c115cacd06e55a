//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    http::header,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};

use super::handlers::{country, department, health, job, location};
use crate::infrastructure::metrics;
use crate::presentation::middleware::track_http_metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> Result<impl IntoResponse, AppError> {
    let body = metrics::gather_metrics().map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}

/// Entity resources
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/countries",
            get(country::get_all_countries).post(country::create_country),
        )
        .route("/countries/_search", get(country::search_countries))
        .route(
            "/countries/{id}",
            get(country::get_country)
                .put(country::update_country)
                .patch(country::partial_update_country)
                .delete(country::delete_country),
        )
        .route(
            "/locations",
            get(location::get_all_locations).post(location::create_location),
        )
        .route("/locations/_search", get(location::search_locations))
        .route(
            "/locations/{id}",
            get(location::get_location)
                .put(location::update_location)
                .patch(location::partial_update_location)
                .delete(location::delete_location),
        )
        .route(
            "/departments",
            get(department::get_all_departments).post(department::create_department),
        )
        .route("/departments/_search", get(department::search_departments))
        .route(
            "/departments/{id}",
            get(department::get_department)
                .put(department::update_department)
                .patch(department::partial_update_department)
                .delete(department::delete_department),
        )
        .route("/jobs", get(job::get_all_jobs).post(job::create_job))
        .route("/jobs/_search", get(job::search_jobs))
        .route(
            "/jobs/{id}",
            get(job::get_job)
                .put(job::update_job)
                .patch(job::partial_update_job)
                .delete(job::delete_job),
        )
        .route_layer(middleware::from_fn(track_http_metrics))
}
