//! Database connection pool manager.
//!
//! Manages a `SQLite` connection pool with WAL mode, foreign keys, and a
//! busy timeout.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use super::{schema::SCHEMA_SQL, DatabaseError};

/// Database connection pool manager.
///
/// `sqlite::memory:` databases are private per-connection, so a URL
/// containing `:memory:` pins the pool to a single connection — otherwise
/// concurrent callers would each see an empty, unrelated database.
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open (creating if missing) a `SQLite` database and configure its pool.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(DatabaseError::QueryFailed)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let is_memory = database_url.contains(":memory:");
        let max_connections = if is_memory { 1 } else { 10 };
        let min_connections = if is_memory { 1 } else { 2 };

        let pool = SqlitePoolOptions::new()
            .min_connections(min_connections)
            .max_connections(max_connections)
            .idle_timeout(Duration::from_secs(30))
            .max_lifetime(Duration::from_secs(1800))
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(DatabaseError::QueryFailed)?;

        Ok(Self { pool })
    }

    /// Install the schema (idempotent; every statement is `IF NOT EXISTS`).
    ///
    /// The whole batch is sent as a single `execute` call — the SQLite
    /// driver runs each `;`-separated statement in turn, which matters here
    /// because trigger bodies themselves contain semicolons and a naive
    /// per-statement split would cut a trigger body in half.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
