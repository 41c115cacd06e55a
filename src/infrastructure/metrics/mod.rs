//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Entity service operation counts and latency by entity and outcome
//! - Search index mirror failures (store committed, index not updated)
//! - Database connection pool gauges

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "hr_directory";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Entity service operations by entity, operation and outcome ("ok", "error")
pub static SERVICE_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "service_operations_total",
            "Total number of entity service operations",
        )
        .namespace(NAMESPACE),
        &["entity", "operation", "outcome"],
    )
    .expect("Failed to create SERVICE_OPERATIONS_TOTAL metric")
});

/// Entity service operation latency, store and index included
pub static SERVICE_OPERATION_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];
    HistogramVec::new(
        HistogramOpts::new(
            "service_operation_duration_seconds",
            "Entity service operation latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["entity", "operation"],
    )
    .expect("Failed to create SERVICE_OPERATION_DURATION_SECONDS metric")
});

/// Writes that reached the store but not the search index
pub static INDEX_MIRROR_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "index_mirror_failures_total",
            "Committed store writes whose search index update failed",
        )
        .namespace(NAMESPACE),
        &["entity", "operation"],
    )
    .expect("Failed to create INDEX_MIRROR_FAILURES_TOTAL metric")
});

/// Database connection pool stats
pub static DB_POOL_CONNECTIONS: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("db_pool_connections", "Database connection pool statistics").namespace(NAMESPACE),
        &["state"], // "idle", "active", "max"
    )
    .expect("Failed to create DB_POOL_CONNECTIONS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(SERVICE_OPERATIONS_TOTAL.clone()))
        .expect("Failed to register SERVICE_OPERATIONS_TOTAL");
    registry
        .register(Box::new(SERVICE_OPERATION_DURATION_SECONDS.clone()))
        .expect("Failed to register SERVICE_OPERATION_DURATION_SECONDS");
    registry
        .register(Box::new(INDEX_MIRROR_FAILURES_TOTAL.clone()))
        .expect("Failed to register INDEX_MIRROR_FAILURES_TOTAL");
    registry
        .register(Box::new(DB_POOL_CONNECTIONS.clone()))
        .expect("Failed to register DB_POOL_CONNECTIONS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record one entity service call
pub fn record_service_operation(entity: &str, operation: &str, ok: bool, duration_secs: f64) {
    let outcome = if ok { "ok" } else { "error" };
    SERVICE_OPERATIONS_TOTAL
        .with_label_values(&[entity, operation, outcome])
        .inc();
    SERVICE_OPERATION_DURATION_SECONDS
        .with_label_values(&[entity, operation])
        .observe(duration_secs);
}

/// Helper to count a store write the search index missed
pub fn record_index_mirror_failure(entity: &str, operation: &str) {
    INDEX_MIRROR_FAILURES_TOTAL
        .with_label_values(&[entity, operation])
        .inc();
}

/// Helper to update database pool stats
pub fn update_db_pool_stats(idle: u32, active: u32, max: u32) {
    DB_POOL_CONNECTIONS
        .with_label_values(&["idle"])
        .set(idle as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["active"])
        .set(active as f64);
    DB_POOL_CONNECTIONS
        .with_label_values(&["max"])
        .set(max as f64);
}
