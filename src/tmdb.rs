//! TMDB (The Movie Database) catalog client.
//!
//! Fetches single pages of list endpoints such as `movie/popular` and hands
//! back the raw `results` array. Records are not interpreted; whatever JSON
//! the API returns is what gets stored.
//!
//! The client is built without proxy detection and without a request
//! timeout, so reqwest's defaults apply.

use catalog_ingest_common::{Error, Result};
use serde_json::Value;
use tracing::debug;

use crate::config::TmdbConfig;

pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    /// Build a client for the API root and key in `config`.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `endpoint`, without query parameters.
    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Fetch one page of `endpoint` and return its `results` array.
    ///
    /// Pages are 1-based. A non-success status, a body that is not JSON or a
    /// body without a `results` array is an error; nothing is retried.
    pub async fn fetch_page(&self, endpoint: &str, page: u32) -> Result<Vec<Value>> {
        if page == 0 {
            return Err(Error::invalid_input("page numbers start at 1"));
        }

        let url = self.url(endpoint);
        debug!(endpoint, page, "TMDB fetch page");

        let page_param = page.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("page", page_param.as_str())])
            .send()
            .await
            // without_url keeps the api_key query parameter out of the message
            .map_err(|e| Error::http(endpoint, page, e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                endpoint: endpoint.to_string(),
                page,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::http(endpoint, page, e.without_url().to_string()))?;

        extract_results(endpoint, page, &body)
    }
}

/// Pull the `results` array out of a list response body.
fn extract_results(endpoint: &str, page: u32, body: &[u8]) -> Result<Vec<Value>> {
    let mut json: Value = serde_json::from_slice(body)
        .map_err(|e| Error::malformed(endpoint, page, format!("invalid JSON: {e}")))?;

    match json.get_mut("results").map(Value::take) {
        Some(Value::Array(results)) => Ok(results),
        Some(other) => Err(Error::malformed(
            endpoint,
            page,
            format!("`results` is not an array: {other}"),
        )),
        None => Err(Error::malformed(endpoint, page, "missing `results` field")),
    }
}
