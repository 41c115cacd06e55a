//! Job API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{fake_job, id_of, TestApp};

async fn seed(app: &TestApp) {
    for (title, min, max) in [
        ("Clerk", 20_000, 30_000),
        ("Manager", 60_000, 90_000),
        ("Analyst", 40_000, 65_000),
    ] {
        app.create(
            "/api/jobs",
            json!({ "jobTitle": title, "minSalary": min, "maxSalary": max }),
        )
        .await;
    }
}

fn titles(jobs: &[Value]) -> Vec<&str> {
    jobs.iter().filter_map(|j| j["jobTitle"].as_str()).collect()
}

#[tokio::test]
async fn test_list_jobs_is_paged_with_headers() {
    let app = TestApp::new();
    seed(&app).await;

    let response = app
        .server
        .get("/api/jobs")
        .add_query_param("page", 0)
        .add_query_param("size", 2)
        .add_query_param("sort", "jobTitle,asc")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-total-count"), "3");
    let link = response.header("link");
    let link = link.to_str().unwrap();
    assert!(link.contains("</api/jobs?page=1&size=2>; rel=\"next\""));
    assert!(link.contains("</api/jobs?page=0&size=2>; rel=\"first\""));

    let jobs: Vec<Value> = response.json();
    assert_eq!(titles(&jobs), vec!["Analyst", "Clerk"]);
}

#[tokio::test]
async fn test_list_jobs_with_several_sort_keys() {
    let app = TestApp::new();
    seed(&app).await;
    app.create(
        "/api/jobs",
        json!({ "jobTitle": "Auditor", "minSalary": 40_000, "maxSalary": 50_000 }),
    )
    .await;

    let jobs: Vec<Value> = app
        .server
        .get("/api/jobs")
        .add_query_param("sort", "minSalary,desc")
        .add_query_param("sort", "jobTitle,asc")
        .await
        .json();

    assert_eq!(titles(&jobs), vec!["Manager", "Analyst", "Auditor", "Clerk"]);
}

#[tokio::test]
async fn test_list_jobs_rejects_bad_sort() {
    let app = TestApp::new();

    app.server
        .get("/api/jobs")
        .add_query_param("sort", "jobTitle,sideways")
        .await
        .assert_status_bad_request();

    app.server
        .get("/api/jobs")
        .add_query_param("sort", "password")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_job_tasks_are_loaded_eagerly() {
    let app = TestApp::new();
    let created = app
        .create(
            "/api/jobs",
            json!({
                "jobTitle": "Clerk",
                "tasks": [{ "id": 7, "title": "Filing" }],
            }),
        )
        .await;
    let id = id_of(&created);

    let fetched: Value = app.server.get(&format!("/api/jobs/{id}")).await.json();
    assert_eq!(fetched["tasks"], json!([{ "id": 7, "title": "Filing" }]));

    let listed: Vec<Value> = app.server.get("/api/jobs").await.json();
    assert_eq!(listed[0]["tasks"], json!([{ "id": 7, "title": "Filing" }]));

    app.server
        .get("/api/jobs")
        .add_query_param("eagerload", false)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_filter_jobs_without_history_is_unpaged() {
    let app = TestApp::new();
    seed(&app).await;

    let response = app
        .server
        .get("/api/jobs")
        .add_query_param("filter", "jobhistory-is-null")
        .await;

    response.assert_status_ok();
    assert!(response.headers().get("x-total-count").is_none());
    let jobs: Vec<Value> = response.json();
    assert_eq!(jobs.len(), 3);
}

#[tokio::test]
async fn test_negative_salary_is_rejected() {
    let app = TestApp::new();

    app.server
        .post("/api/jobs")
        .json(&json!({ "jobTitle": "Intern", "minSalary": -1 }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_every_invalid_field_is_reported() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/jobs")
        .json(&json!({ "jobTitle": "Intern", "minSalary": -1, "maxSalary": -2 }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("field errors are listed")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["max_salary", "min_salary"]);
    assert_eq!(body["message"], "max_salary: Maximum salary must not be negative");
}

#[tokio::test]
async fn test_partial_update_job_keeps_tasks() {
    let app = TestApp::new();
    let created = app
        .create(
            "/api/jobs",
            json!({ "jobTitle": "Clerk", "tasks": [{ "id": 3, "title": "Typing" }] }),
        )
        .await;
    let id = id_of(&created);

    let patched: Value = app
        .server
        .patch(&format!("/api/jobs/{id}"))
        .json(&json!({ "id": id, "maxSalary": 35_000 }))
        .await
        .json();

    assert_eq!(patched["jobTitle"], "Clerk");
    assert_eq!(patched["maxSalary"], 35_000);
    assert_eq!(patched["tasks"], json!([{ "id": 3, "title": "Typing" }]));
}

#[tokio::test]
async fn test_search_jobs_is_paged() {
    let app = TestApp::new();
    seed(&app).await;
    app.create("/api/jobs", fake_job()).await;

    let response = app
        .server
        .get("/api/jobs/_search")
        .add_query_param("query", "clerk")
        .add_query_param("size", 1)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-total-count"), "1");
    let jobs: Vec<Value> = response.json();
    assert_eq!(titles(&jobs), vec!["Clerk"]);
}

#[tokio::test]
async fn test_delete_job() {
    let app = TestApp::new();
    let created = app.create("/api/jobs", fake_job()).await;
    let id = id_of(&created);

    app.server
        .delete(&format!("/api/jobs/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .get(&format!("/api/jobs/{id}"))
        .await
        .assert_status_not_found();
}
