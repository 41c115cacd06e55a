//! CORS Middleware Configuration
//!
//! Browser clients read the paging headers and the `Location` of created
//! resources, so those are exposed explicitly.

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsSettings;
use crate::presentation::http::handlers::resource::X_TOTAL_COUNT;

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

fn exposed_headers() -> [HeaderName; 3] {
    [X_TOTAL_COUNT.clone(), header::LINK, header::LOCATION]
}

/// Create CORS layer from settings
///
/// An empty (or entirely unparsable) origin list allows any origin.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(Any)
        .expose_headers(exposed_headers())
        .max_age(Duration::from_secs(3600))
}
