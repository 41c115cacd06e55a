//! Department API Tests

use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{fake_department, id_of, TestApp};
use hr_directory::application::services::UpdatePolicy;
use hr_directory::domain::{Country, Department, Job, Location};
use hr_directory::infrastructure::repositories::MemoryRepository;
use hr_directory::startup::{AppState, SearchIndexes};

#[tokio::test]
async fn test_create_department_requires_name() {
    let app = TestApp::new();

    app.server
        .post("/api/departments")
        .json(&json!({ "locationId": 3 }))
        .await
        .assert_status_bad_request();

    let all: Vec<Value> = app.server.get("/api/departments").await.json();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_create_department_with_location() {
    let app = TestApp::new();
    let location = app.create("/api/locations", json!({ "city": "Lima" })).await;

    let created = app
        .create(
            "/api/departments",
            json!({ "departmentName": "Finance", "locationId": id_of(&location) }),
        )
        .await;

    assert_eq!(created["departmentName"], "Finance");
    assert_eq!(created["locationId"], location["id"]);
}

#[tokio::test]
async fn test_partial_update_department_keeps_name() {
    let app = TestApp::new();
    let created = app.create("/api/departments", fake_department()).await;
    let id = id_of(&created);

    let patched: Value = app
        .server
        .patch(&format!("/api/departments/{id}"))
        .json(&json!({ "id": id, "locationId": 12 }))
        .await
        .json();

    assert_eq!(patched["departmentName"], created["departmentName"]);
    assert_eq!(patched["locationId"], 12);
}

#[tokio::test]
async fn test_filter_departments_without_job_history() {
    let departments = MemoryRepository::with_rows([
        Department {
            id: Some(1),
            department_name: "IT".into(),
            location_id: None,
            job_history_id: Some(40),
        },
        Department {
            id: Some(2),
            department_name: "Sales".into(),
            location_id: None,
            job_history_id: None,
        },
    ]);
    let app = TestApp::with_state(AppState::with_repositories(
        Arc::new(MemoryRepository::<Country>::new()),
        Arc::new(MemoryRepository::<Location>::new()),
        Arc::new(departments),
        Arc::new(MemoryRepository::<Job>::new()),
        SearchIndexes::in_memory(),
        UpdatePolicy::RequireExisting,
    ));

    let free: Vec<Value> = app
        .server
        .get("/api/departments")
        .add_query_param("filter", "jobhistory-is-null")
        .await
        .json();

    assert_eq!(
        free,
        vec![json!({ "id": 2, "departmentName": "Sales", "locationId": null })]
    );
}

#[tokio::test]
async fn test_search_and_delete_department() {
    let app = TestApp::new();
    let research = app
        .create("/api/departments", json!({ "departmentName": "Research and Development" }))
        .await;
    app.create("/api/departments", json!({ "departmentName": "Legal" }))
        .await;

    let hits: Vec<Value> = app
        .server
        .get("/api/departments/_search")
        .add_query_param("query", "research dev*")
        .await
        .json();
    assert_eq!(hits, vec![research.clone()]);

    app.server
        .delete(&format!("/api/departments/{}", id_of(&research)))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let hits: Vec<Value> = app
        .server
        .get("/api/departments/_search")
        .add_query_param("query", "research")
        .await
        .json();
    assert!(hits.is_empty());
}
