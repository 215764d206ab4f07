use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key, sent as the `api_key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// API root; endpoints such as `movie/popular` are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// `mongodb://...`, `sqlite://<path>` or `sqlite::memory:`
    #[serde(default = "default_store_uri")]
    pub uri: String,

    #[serde(default = "default_database")]
    pub database: String,
}

fn default_store_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "movie_db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_store_uri(),
            database: default_database(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    /// What a failing category does to the rest of the run
    #[serde(default)]
    pub on_error: FailurePolicy,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failing category.
    #[default]
    Abort,
    /// Record the failure and move on to the next category.
    Continue,
}
