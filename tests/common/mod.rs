//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use fake::faker::address::en::{CityName, CountryName, StateName, StreetName, ZipCode};
use fake::faker::company::en::Industry;
use fake::faker::job::en::Title;
use fake::Fake;
use serde_json::{json, Value};

use hr_directory::application::services::UpdatePolicy;
use hr_directory::domain::{Entity, SearchIndex};
use hr_directory::presentation::http::routes;
use hr_directory::shared::error::IndexError;
use hr_directory::shared::pagination::{Page, PageRequest};
use hr_directory::startup::{AppState, SearchIndexes};

/// Test application over in-memory backends
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    /// Default update policy: PUT of an unknown id is 404.
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory(UpdatePolicy::RequireExisting))
    }

    pub fn with_policy(policy: UpdatePolicy) -> Self {
        Self::with_state(AppState::in_memory(policy))
    }

    /// Memory store whose search index rejects every call.
    pub fn with_index_down() -> Self {
        let indexes = SearchIndexes {
            countries: Arc::new(DownIndex),
            locations: Arc::new(DownIndex),
            departments: Arc::new(DownIndex),
            jobs: Arc::new(DownIndex),
        };
        Self::with_state(AppState::memory(indexes, UpdatePolicy::RequireExisting))
    }

    pub fn with_state(state: AppState) -> Self {
        let server = TestServer::new(routes::create_router(state.clone()))
            .expect("failed to start test server");
        Self { server, state }
    }

    /// POST `body` to `path` and return the created resource.
    pub async fn create(&self, path: &str, body: Value) -> Value {
        let response = self.server.post(path).json(&body).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }
}

/// Search index that is never reachable.
pub struct DownIndex;

fn outage() -> IndexError {
    serde_json::from_str::<Value>("<html>502 Bad Gateway</html>")
        .unwrap_err()
        .into()
}

#[async_trait]
impl<E: Entity> SearchIndex<E> for DownIndex {
    async fn index(&self, _entity: &E) -> Result<(), IndexError> {
        Err(outage())
    }

    async fn search(&self, _query: &str) -> Result<Vec<E>, IndexError> {
        Err(outage())
    }

    async fn search_paged(&self, _query: &str, _page: &PageRequest) -> Result<Page<E>, IndexError> {
        Err(outage())
    }

    async fn delete_from_index_by_id(&self, _id: i64) -> Result<(), IndexError> {
        Err(outage())
    }
}

pub fn fake_country() -> Value {
    json!({ "countryName": CountryName().fake::<String>() })
}

pub fn fake_location() -> Value {
    json!({
        "streetAddress": StreetName().fake::<String>(),
        "postalCode": ZipCode().fake::<String>(),
        "city": CityName().fake::<String>(),
        "stateProvince": StateName().fake::<String>(),
    })
}

pub fn fake_department() -> Value {
    json!({ "departmentName": Industry().fake::<String>() })
}

pub fn fake_job() -> Value {
    let min: i64 = (10_000..50_000).fake();
    json!({
        "jobTitle": Title().fake::<String>(),
        "minSalary": min,
        "maxSalary": min + (1_000..50_000).fake::<i64>(),
    })
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("resource has an id")
}
