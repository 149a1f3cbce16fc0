use crate::error::DbError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Upper bound on concurrently open connections.
pub const MAX_CONNECTIONS: u32 = 25;
/// Connections kept warm; anything above this is closed after `IDLE_TIMEOUT`.
pub const MIN_IDLE_CONNECTIONS: u32 = 5;
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool eagerly opens a connection, so an unreachable database or a bad
/// connection string fails here rather than on the first request.
pub async fn connect(db_conn: &str) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_IDLE_CONNECTIONS)
        .idle_timeout(IDLE_TIMEOUT)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(db_conn)
        .await
        .map_err(DbError::ConnectionError)?;

    tracing::info!(max_connections = MAX_CONNECTIONS, "Database connected successfully.");
    Ok(pool)
}

/// Applies the embedded schema migrations.
///
/// Every statement is `IF NOT EXISTS`, so this is safe against a database
/// whose tables were created out of band.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
