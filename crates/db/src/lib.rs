//! Persistence layer for accounts.
//!
//! - [`store::AccountStore`] -- the storage seam the API depends on.
//! - [`repositories::AccountRepo`] / [`repositories::PgAccountStore`] -- PostgreSQL.
//! - [`memory::MemoryAccountStore`] -- in-process store for tests and local tooling.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use memory::MemoryAccountStore;
pub use repositories::PgAccountStore;
pub use store::{AccountStore, StatusFilter, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
