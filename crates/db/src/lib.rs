//! Postgres access for the content backend.
//!
//! - [`list_query`] -- filtered, paginated, ordered list fetches.
//! - [`collection`] -- per-table metadata and write changesets.
//! - [`repositories`] -- generic and entity-specific queries.
//! - [`retry`] -- transient-failure classification for sqlx errors.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod collection;
pub mod list_query;
pub mod models;
pub mod repositories;
pub mod retry;

pub type DbPool = sqlx::PgPool;

/// Default maximum number of pooled connections per credential tier.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool and connect eagerly.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Create a pool that connects on first use.
///
/// Only the URL is parsed here, so a pool can be built for a store that is
/// not reachable yet.
pub fn create_lazy_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)
}

/// Round-trip a trivial query to verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
