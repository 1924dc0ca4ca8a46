use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Failures surfaced from the data-access collaborator. Never retried
/// here; callers report them upward unchanged.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Open the connection pool once at startup. Individual connections are
/// checked out per operation and returned on every exit path by the pool.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    if config.url.is_empty() {
        return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await?;

    info!("Created database pool ({} max connections)", config.max_connections);
    Ok(pool)
}

/// Pings the pool to ensure connectivity.
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
