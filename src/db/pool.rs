//! SQLite connection pool with WAL mode.
//!
//! Provides a thread-safe connection pool for SQLite with Write-Ahead Logging (WAL)
//! enabled so request handlers can read while a write transaction is open.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<Sqlite>;

/// Create a new connection pool with WAL mode enabled.
///
/// # Arguments
/// * `db_path` - Path to the SQLite database file
///
/// # Returns
/// A connection pool ready for use
pub async fn create_pool(db_path: &Path) -> Result<DbPool, sqlx::Error> {
    let db_url = format!("sqlite:{}", db_path.display());

    let connect_options = SqliteConnectOptions::from_str(&db_url)?
        // Create the database file if it doesn't exist
        .create_if_missing(true)
        // WAL lets request handlers read while a writer holds the lock
        .journal_mode(SqliteJournalMode::Wal)
        // NORMAL is durable enough under WAL and avoids an fsync per commit
        .synchronous(SqliteSynchronous::Normal)
        // Reviewer links and pull request authors must reference real users
        .foreign_keys(true)
        // Write transactions start with BEGIN IMMEDIATE and wait here for the lock
        .busy_timeout(Duration::from_secs(30))
        // Auto-checkpoint WAL every 1000 pages (~4MB) to keep the log bounded
        .pragma("wal_autocheckpoint", "1000");

    let pool = SqlitePoolOptions::new()
        // One writer at a time anyway; extra connections serve reads
        .max_connections(5)
        // Keep one connection warm
        .min_connections(1)
        // Connection timeout
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await?;

    let mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await?;

    if !mode.0.eq_ignore_ascii_case("wal") {
        log::warn!("SQLite journal mode is {}, expected wal", mode.0);
    }

    Ok(pool)
}
