//! Catalog-Ingest-Store: document store backends.
//!
//! The ingestion driver writes through the [`DocumentStore`] trait. Two
//! backends implement it:
//!
//! - [`mongo::MongoStore`] for `mongodb://` and `mongodb+srv://` URIs
//! - [`sqlite::SqliteStore`] for `sqlite://<path>` and `sqlite::memory:`
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> catalog_ingest_common::Result<()> {
//! use catalog_ingest_store::open;
//! use serde_json::json;
//!
//! let store = open("mongodb://localhost:27017", "movie_db").await?;
//! store.insert_many("movies", vec![json!({"id": 1})]).await?;
//! # Ok(())
//! # }
//! ```

pub mod migrations;
pub mod mongo;
pub mod pool;
pub mod sqlite;

use std::path::PathBuf;

use async_trait::async_trait;
use catalog_ingest_common::{Error, Result};
use serde_json::Value;

pub use mongo::MongoStore;
pub use sqlite::SqliteStore;

/// A collection-based store accepting unordered bulk inserts of raw JSON.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in log lines.
    fn backend(&self) -> &'static str;

    /// Insert every document into `collection`, returning how many were
    /// written. An empty batch is a no-op.
    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> Result<usize>;

    /// Number of documents currently held by `collection`.
    async fn count(&self, collection: &str) -> Result<u64>;
}

/// Backend selection derived from a store connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    Mongo(String),
    SqliteFile(PathBuf),
    SqliteMemory,
}

impl StoreUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            return Ok(Self::Mongo(uri.to_string()));
        }
        if uri == "sqlite::memory:" {
            return Ok(Self::SqliteMemory);
        }
        if let Some(path) = uri.strip_prefix("sqlite://") {
            if path.is_empty() {
                return Err(Error::invalid_input("sqlite:// URI has no path"));
            }
            return Ok(Self::SqliteFile(PathBuf::from(path)));
        }
        Err(Error::invalid_input(format!(
            "unsupported store URI scheme: {uri}"
        )))
    }
}

/// Open the store selected by `uri`, scoped to `database`.
pub async fn open(uri: &str, database: &str) -> Result<Box<dyn DocumentStore>> {
    if database.trim().is_empty() {
        return Err(Error::invalid_input("database name is empty"));
    }

    let store: Box<dyn DocumentStore> = match StoreUri::parse(uri)? {
        StoreUri::Mongo(uri) => Box::new(MongoStore::connect(&uri, database).await?),
        StoreUri::SqliteFile(path) => Box::new(SqliteStore::open(&path, database)?),
        StoreUri::SqliteMemory => Box::new(SqliteStore::in_memory(database)?),
    };

    tracing::debug!(backend = store.backend(), database, "Opened document store");
    Ok(store)
}
