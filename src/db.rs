// src/db.rs
use crate::services::history;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Opens the SQLite pool for `database_url` and makes sure the schema exists.
///
/// The database file is created if missing. An in-memory database lives only as
/// long as its connection, so those pools hold exactly one connection that never
/// expires.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let in_memory = database_url.contains(":memory:");

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .acquire_timeout(Duration::from_secs(30));
    if in_memory {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }
    let pool = pool_options.connect_with(options).await?;

    tracing::info!("Ensuring conversation schema...");
    let mut conn = pool.acquire().await?;
    history::ensure_schema(&mut conn).await?;
    tracing::info!("Database ready");

    Ok(pool)
}
