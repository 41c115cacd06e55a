//! Country API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{fake_country, id_of, TestApp};
use hr_directory::application::services::UpdatePolicy;

#[tokio::test]
async fn test_create_country_returns_location_header() {
    let app = TestApp::new();
    let body = fake_country();

    let response = app.server.post("/api/countries").json(&body).await;

    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    let id = id_of(&created);
    assert_eq!(response.header("location"), format!("/api/countries/{id}").as_str());
    assert_eq!(created["countryName"], body["countryName"]);

    let fetched: Value = app.server.get(&format!("/api/countries/{id}")).await.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_country_with_id_is_rejected() {
    let app = TestApp::new();

    app.server
        .post("/api/countries")
        .json(&json!({ "id": 5, "countryName": "Chile" }))
        .await
        .assert_status_bad_request();

    let all: Vec<Value> = app.server.get("/api/countries").await.json();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_create_country_with_blank_name_is_rejected() {
    let app = TestApp::new();

    app.server
        .post("/api/countries")
        .json(&json!({ "countryName": "" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_get_unknown_country_is_not_found() {
    let app = TestApp::new();
    app.server.get("/api/countries/999").await.assert_status_not_found();
}

#[tokio::test]
async fn test_update_country_checks_ids() {
    let app = TestApp::new();
    let created = app.create("/api/countries", fake_country()).await;
    let id = id_of(&created);

    app.server
        .put(&format!("/api/countries/{id}"))
        .json(&json!({ "countryName": "Peru" }))
        .await
        .assert_status_bad_request();

    app.server
        .put(&format!("/api/countries/{}", id + 1))
        .json(&json!({ "id": id, "countryName": "Peru" }))
        .await
        .assert_status_bad_request();

    let updated: Value = app
        .server
        .put(&format!("/api/countries/{id}"))
        .json(&json!({ "id": id, "countryName": "Peru" }))
        .await
        .json();
    assert_eq!(updated, json!({ "id": id, "countryName": "Peru" }));
}

#[tokio::test]
async fn test_update_unknown_country_depends_on_policy() {
    let strict = TestApp::new();
    strict
        .server
        .put("/api/countries/42")
        .json(&json!({ "id": 42, "countryName": "Peru" }))
        .await
        .assert_status_not_found();

    let upsert = TestApp::with_policy(UpdatePolicy::Upsert);
    upsert
        .server
        .put("/api/countries/42")
        .json(&json!({ "id": 42, "countryName": "Peru" }))
        .await
        .assert_status_ok();
    upsert.server.get("/api/countries/42").await.assert_status_ok();
}

#[tokio::test]
async fn test_partial_update_country() {
    let app = TestApp::new();
    let created = app.create("/api/countries", json!({ "countryName": "Chile" })).await;
    let id = id_of(&created);

    let patched: Value = app
        .server
        .patch(&format!("/api/countries/{id}"))
        .json(&json!({ "id": id, "countryName": "Chile Continental" }))
        .await
        .json();
    assert_eq!(patched["countryName"], "Chile Continental");

    app.server
        .patch("/api/countries/999")
        .json(&json!({ "id": 999, "countryName": "Nowhere" }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_country_removes_row_and_document() {
    let app = TestApp::new();
    let created = app.create("/api/countries", json!({ "countryName": "Chile" })).await;
    let id = id_of(&created);

    app.server
        .delete(&format!("/api/countries/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/countries/{id}"))
        .await
        .assert_status_not_found();
    let hits: Vec<Value> = app
        .server
        .get("/api/countries/_search")
        .add_query_param("query", "chile")
        .await
        .json();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_filter_countries_without_location() {
    let app = TestApp::new();

    let none: Vec<Value> = app
        .server
        .get("/api/countries")
        .add_query_param("filter", "location-is-null")
        .await
        .json();
    assert!(none.is_empty());

    let chile = app.create("/api/countries", json!({ "countryName": "Chile" })).await;
    let peru = app.create("/api/countries", json!({ "countryName": "Peru" })).await;
    app.create(
        "/api/locations",
        json!({ "city": "Santiago", "countryId": id_of(&chile) }),
    )
    .await;

    let free: Vec<Value> = app
        .server
        .get("/api/countries")
        .add_query_param("filter", "location-is-null")
        .await
        .json();
    assert_eq!(free, vec![peru]);

    let all: Vec<Value> = app.server.get("/api/countries").await.json();
    assert_eq!(all.len(), 2);

    let unknown_filter: Vec<Value> = app
        .server
        .get("/api/countries")
        .add_query_param("filter", "region-is-null")
        .await
        .json();
    assert_eq!(unknown_filter, all);
}

#[tokio::test]
async fn test_moving_location_frees_country() {
    let app = TestApp::new();
    let chile = app.create("/api/countries", json!({ "countryName": "Chile" })).await;
    let peru = app.create("/api/countries", json!({ "countryName": "Peru" })).await;
    let location = app
        .create("/api/locations", json!({ "city": "Arica", "countryId": id_of(&chile) }))
        .await;
    let id = id_of(&location);

    app.server
        .patch(&format!("/api/locations/{id}"))
        .json(&json!({ "id": id, "countryId": id_of(&peru) }))
        .await
        .assert_status_ok();

    let free: Vec<Value> = app
        .server
        .get("/api/countries")
        .add_query_param("filter", "location-is-null")
        .await
        .json();
    assert_eq!(free, vec![chile]);
}

#[tokio::test]
async fn test_delete_country_unlinks_its_location() {
    let app = TestApp::new();
    let chile = app.create("/api/countries", json!({ "countryName": "Chile" })).await;
    let location = app
        .create("/api/locations", json!({ "city": "Santiago", "countryId": id_of(&chile) }))
        .await;

    app.server
        .delete(&format!("/api/countries/{}", id_of(&chile)))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let fetched: Value = app
        .server
        .get(&format!("/api/locations/{}", id_of(&location)))
        .await
        .json();
    assert_eq!(fetched["countryId"], Value::Null);
    assert_eq!(fetched["city"], "Santiago");
}

#[tokio::test]
async fn test_search_countries() {
    let app = TestApp::new();
    let chile = app.create("/api/countries", json!({ "countryName": "Chile" })).await;
    app.create("/api/countries", json!({ "countryName": "Peru" })).await;

    let hits: Vec<Value> = app
        .server
        .get("/api/countries/_search")
        .add_query_param("query", "chi*")
        .await
        .json();
    assert_eq!(hits, vec![chile]);
}

#[tokio::test]
async fn test_index_outage_keeps_committed_write() {
    let app = TestApp::with_index_down();

    let response = app
        .server
        .post("/api/countries")
        .json(&json!({ "countryName": "Chile" }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let all: Vec<Value> = app.server.get("/api/countries").await.json();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["countryName"], "Chile");

    app.server
        .get("/api/countries/_search")
        .add_query_param("query", "chile")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
