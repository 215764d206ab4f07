//! SQLite document store.
//!
//! Each document is one row in the `documents` table holding its JSON text,
//! tagged with the logical database and collection it was inserted into.

use std::path::Path;

use async_trait::async_trait;
use catalog_ingest_common::{Error, Result};
use rusqlite::params;
use serde_json::Value;

use crate::pool::{get_conn, init_memory_pool, init_pool, DbPool};
use crate::DocumentStore;

#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
    database: String,
}

impl SqliteStore {
    /// Open (or create) a store backed by the file at `path`.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path, database: &str) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            pool: init_pool(path)?,
            database: database.to_string(),
        })
    }

    /// A store that lives as long as the returned value.
    pub fn in_memory(database: &str) -> Result<Self> {
        Ok(Self {
            pool: init_memory_pool()?,
            database: database.to_string(),
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// All documents in `collection`, in insertion order.
    pub fn documents(&self, collection: &str) -> Result<Vec<Value>> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn
            .prepare(
                "SELECT body FROM documents WHERE db_name = ?1 AND collection = ?2 ORDER BY id",
            )
            .map_err(|e| Error::database(e.to_string()))?;

        let bodies = stmt
            .query_map(params![self.database, collection], |row| {
                row.get::<_, String>(0)
            })
            .map_err(|e| Error::database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::database(e.to_string()))?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(Error::from))
            .collect()
    }
}

fn insert_batch(
    pool: &DbPool,
    database: &str,
    collection: &str,
    documents: &[Value],
) -> Result<usize> {
    let mut conn = get_conn(pool)?;
    let tx = conn
        .transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT INTO documents (db_name, collection, body) VALUES (?1, ?2, ?3)",
            )
            .map_err(|e| Error::database(e.to_string()))?;

        for doc in documents {
            let body = serde_json::to_string(doc)?;
            stmt.execute(params![database, collection, body])
                .map_err(|e| Error::database(e.to_string()))?;
        }
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    Ok(documents.len())
}

fn count_documents(pool: &DbPool, database: &str, collection: &str) -> Result<u64> {
    let conn = get_conn(pool)?;
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM documents WHERE db_name = ?1 AND collection = ?2",
            params![database, collection],
            |row| row.get(0),
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(count as u64)
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let pool = self.pool.clone();
        let database = self.database.clone();
        let collection = collection.to_string();

        tokio::task::spawn_blocking(move || insert_batch(&pool, &database, &collection, &documents))
            .await
            .map_err(|e| Error::internal(format!("insert task failed: {e}")))?
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        let pool = self.pool.clone();
        let database = self.database.clone();
        let collection = collection.to_string();

        tokio::task::spawn_blocking(move || count_documents(&pool, &database, &collection))
            .await
            .map_err(|e| Error::internal(format!("count task failed: {e}")))?
    }
}
