//! Persistence for projects, brand styles, pages and pipeline jobs.
//!
//! The Postgres layer follows the usual split: row models in [`models`],
//! zero-sized repositories taking `&PgPool` in [`repositories`]. Callers
//! outside this crate go through the [`store::ProjectStore`] trait, which
//! has a Postgres implementation and an in-memory one used by tests and
//! database-less local runs.

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use store::{PgStore, ProjectStore, StoreError};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Maximum connections held by the pool.
pub const MAX_CONNECTIONS: u32 = 10;

/// Open a connection pool against `database_url`.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
