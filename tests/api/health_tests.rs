//! Health Check API Tests

use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{fake_country, TestApp};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let body: Value = app.server.get("/health").await.json();

    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let body: Value = app.server.get("/health/live").await.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_with_in_memory_backends() {
    let app = TestApp::new();

    let response = app.server.get("/health/ready").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["message"], "in-memory");
    assert_eq!(body["checks"]["search"]["message"], "in-memory");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_service_counters() {
    let app = TestApp::new();
    app.create("/api/countries", fake_country()).await;

    let response = app.server.get("/metrics").await;
    response.assert_status_ok();

    let text = response.text();
    assert!(text.contains("hr_directory_service_operations_total"));
    assert!(text.contains("hr_directory_http_requests_total"));
}
