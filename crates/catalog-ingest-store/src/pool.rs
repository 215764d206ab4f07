//! Database connection pool management.
//!
//! Connection pooling for the SQLite backend using r2d2. Pool construction
//! also runs pending migrations.

use std::path::Path;

use catalog_ingest_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Initialize a new database pool backed by the file at `db_path`.
///
/// The file is created if it does not exist and pending migrations are run
/// before the pool is returned.
///
/// # Example
///
/// ```no_run
/// use catalog_ingest_store::pool::init_pool;
/// use std::path::Path;
///
/// let pool = init_pool(Path::new("/var/lib/catalog-ingest/documents.db")).unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &Path) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA journal_mode = WAL;"));

    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    migrate(&pool)?;
    Ok(pool)
}

/// Initialize an in-memory database pool for testing.
///
/// An in-memory SQLite database belongs to a single connection, so the pool
/// holds exactly one.
///
/// # Example
///
/// ```
/// use catalog_ingest_store::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory();

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create in-memory pool: {}", e)))?;

    migrate(&pool)?;
    Ok(pool)
}

/// Get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}

fn migrate(pool: &DbPool) -> Result<()> {
    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    let applied = migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    if applied > 0 {
        tracing::info!(
            applied,
            version = migrations::latest_version(),
            "Document store schema migrated"
        );
    }

    Ok(())
}
