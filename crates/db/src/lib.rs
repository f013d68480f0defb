//! Database layer: connection pool, embedded migrations, models, and
//! repositories.
//!
//! Repositories own all SQL; business rules stay in the API layer. Every
//! repository method takes `&PgPool` (or a transaction) explicitly so tests
//! can drive them against an isolated database.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

/// Shared Postgres connection pool type.
pub type DbPool = sqlx::PgPool;

/// Embedded migrations, compiled into the binary from `./migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("running database migrations");
    MIGRATOR.run(pool).await
}

/// Cheap connectivity probe used by the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
