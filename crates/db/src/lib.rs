//! PostgreSQL persistence for the task board: connection pool, migrations,
//! row models and repositories.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

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

/// Schema and timer figures reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStatus {
    /// Version of the newest successfully applied migration, 0 before any.
    pub schema_version: i64,
    /// Cards with a running timer, across all users.
    pub running_timers: i64,
}

pub async fn board_status(pool: &DbPool) -> Result<BoardStatus, sqlx::Error> {
    let (schema_version, running_timers): (i64, i64) = sqlx::query_as(
        "SELECT
            (SELECT COALESCE(MAX(version), 0) FROM _sqlx_migrations WHERE success),
            (SELECT COUNT(*) FROM cards WHERE ticking_from IS NOT NULL)",
    )
    .fetch_one(pool)
    .await?;
    Ok(BoardStatus {
        schema_version,
        running_timers,
    })
}

/// Apply all pending migrations embedded from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
