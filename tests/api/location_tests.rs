//! Location API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{fake_location, id_of, TestApp};

#[tokio::test]
async fn test_create_and_fetch_location() {
    let app = TestApp::new();
    let body = fake_location();

    let created = app.create("/api/locations", body.clone()).await;
    let id = id_of(&created);

    let fetched: Value = app.server.get(&format!("/api/locations/{id}")).await.json();
    assert_eq!(fetched["city"], body["city"]);
    assert_eq!(fetched["postalCode"], body["postalCode"]);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_location_replaces_every_field() {
    let app = TestApp::new();
    let created = app
        .create(
            "/api/locations",
            json!({ "streetAddress": "Av. Providencia 1208", "postalCode": "7500000", "city": "Santiago" }),
        )
        .await;
    let id = id_of(&created);

    let updated: Value = app
        .server
        .put(&format!("/api/locations/{id}"))
        .json(&json!({ "id": id, "city": "Valparaiso" }))
        .await
        .json();

    assert_eq!(updated["city"], "Valparaiso");
    assert_eq!(updated["streetAddress"], Value::Null);
    assert_eq!(updated["postalCode"], Value::Null);
}

#[tokio::test]
async fn test_partial_update_location_keeps_absent_fields() {
    let app = TestApp::new();
    let created = app
        .create(
            "/api/locations",
            json!({ "streetAddress": "Av. Providencia 1208", "postalCode": "7500000", "city": "Santiago" }),
        )
        .await;
    let id = id_of(&created);

    let patched: Value = app
        .server
        .patch(&format!("/api/locations/{id}"))
        .json(&json!({ "id": id, "stateProvince": "Region Metropolitana" }))
        .await
        .json();

    assert_eq!(patched["streetAddress"], "Av. Providencia 1208");
    assert_eq!(patched["postalCode"], "7500000");
    assert_eq!(patched["city"], "Santiago");
    assert_eq!(patched["stateProvince"], "Region Metropolitana");
}

#[tokio::test]
async fn test_filter_locations_without_department() {
    let app = TestApp::new();

    let none: Vec<Value> = app
        .server
        .get("/api/locations")
        .add_query_param("filter", "department-is-null")
        .await
        .json();
    assert!(none.is_empty());

    let lima = app.create("/api/locations", json!({ "city": "Lima" })).await;
    let quito = app.create("/api/locations", json!({ "city": "Quito" })).await;
    let it = app
        .create(
            "/api/departments",
            json!({ "departmentName": "IT", "locationId": id_of(&lima) }),
        )
        .await;

    let free: Vec<Value> = app
        .server
        .get("/api/locations")
        .add_query_param("filter", "department-is-null")
        .await
        .json();
    assert_eq!(free, vec![quito]);

    app.server
        .delete(&format!("/api/departments/{}", id_of(&it)))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let free: Vec<Value> = app
        .server
        .get("/api/locations")
        .add_query_param("filter", "department-is-null")
        .await
        .json();
    assert_eq!(free.len(), 2);
}

#[tokio::test]
async fn test_search_locations_by_city() {
    let app = TestApp::new();
    app.create("/api/locations", json!({ "city": "Buenos Aires" })).await;
    let cordoba = app.create("/api/locations", json!({ "city": "Cordoba" })).await;

    let hits: Vec<Value> = app
        .server
        .get("/api/locations/_search")
        .add_query_param("query", "cordoba")
        .await
        .json();
    assert_eq!(hits, vec![cordoba]);

    let all: Vec<Value> = app
        .server
        .get("/api/locations/_search")
        .add_query_param("query", "*")
        .await
        .json();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_delete_location() {
    let app = TestApp::new();
    let created = app.create("/api/locations", fake_location()).await;
    let id = id_of(&created);

    app.server
        .delete(&format!("/api/locations/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .get(&format!("/api/locations/{id}"))
        .await
        .assert_status_not_found();
}
