//! Database module
//!
//! SQLite connection pool setup and the product/conflict stores.

pub mod conflicts;
pub mod products;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Open the SQLite pool (WAL mode) and apply migrations
pub async fn connect(db_path: &str) -> Result<SqlitePool, BoxError> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .pragma("foreign_keys", "ON");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000;").execute(&pool).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database ready: {db_path} (WAL, busy_timeout=5000ms)");

    Ok(pool)
}

/// Open an in-memory pool with migrations applied.
///
/// Single connection: each `:memory:` connection is its own database.
pub async fn connect_in_memory() -> Result<SqlitePool, BoxError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
