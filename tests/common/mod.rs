//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which starts a wiremock server standing in for
//! the TMDB API and builds a [`CatalogClient`] pointed at it, plus
//! [`RecordingStore`] for asserting on individual insert calls.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use catalog_ingest::config::TmdbConfig;
use catalog_ingest::ingest::Category;
use catalog_ingest::tmdb::CatalogClient;
use catalog_ingest_common::{Error, Result};
use catalog_ingest_store::DocumentStore;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// The two records served for `endpoint` / `page`.
pub fn page_results(endpoint: &str, page: u32) -> Vec<Value> {
    (0..2)
        .map(|i| json!({ "id": page * 100 + i, "endpoint": endpoint, "page": page }))
        .collect()
}

pub fn page_body(endpoint: &str, page: u32) -> Value {
    json!({
        "page": page,
        "results": page_results(endpoint, page),
        "total_pages": 500,
        "total_results": 10000,
    })
}

/// Mock harness wrapping a running [`MockServer`].
pub struct TestHarness {
    pub server: MockServer,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn tmdb_config(&self) -> TmdbConfig {
        TmdbConfig {
            api_key: API_KEY.to_string(),
            base_url: self.server.uri(),
        }
    }

    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(&self.tmdb_config()).expect("failed to build client")
    }

    /// Serve `body` with `status` for one page, expecting exactly one hit.
    pub async fn mount_page(&self, endpoint: &str, page: u32, status: u16, body: Value) {
        self.mount_page_times(endpoint, page, status, body, 1).await;
    }

    pub async fn mount_page_times(
        &self,
        endpoint: &str,
        page: u32,
        status: u16,
        body: Value,
        times: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/{endpoint}")))
            .and(query_param("api_key", API_KEY))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Serve [`page_body`] for every page of every category.
    pub async fn mount_all(&self, categories: &[Category], times: u64) {
        for category in categories {
            for page in 1..=category.pages {
                self.mount_page_times(
                    category.endpoint,
                    page,
                    200,
                    page_body(category.endpoint, page),
                    times,
                )
                .await;
            }
        }
    }

    /// Fail the test if `endpoint` receives any request.
    pub async fn forbid(&self, endpoint: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}

/// Store that keeps every insert call in memory, in call order.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    fail_on: Option<&'static str>,
}

impl RecordingStore {
    /// A store whose inserts into `collection` always fail.
    pub fn failing_on(collection: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(collection),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, collection: &str) -> Vec<Vec<Value>> {
        self.calls()
            .into_iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, docs)| docs)
            .collect()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    fn backend(&self) -> &'static str {
        "recording"
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> Result<usize> {
        if self.fail_on == Some(collection) {
            return Err(Error::database(format!("{collection} is read-only")));
        }
        let n = documents.len();
        self.calls
            .lock()
            .unwrap()
            .push((collection.to_string(), documents));
        Ok(n)
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        Ok(self
            .calls_for(collection)
            .iter()
            .map(|docs| docs.len() as u64)
            .sum())
    }
}
