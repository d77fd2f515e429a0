//! PostgreSQL persistence for the waitroom service.
//!
//! Exposes pool construction (with startup connect-retry), the embedded
//! migrations, a health check, the row models and one repository per table.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Pool sizing and startup retry behaviour.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Total connection attempts before giving up (at least one is made).
    pub connect_attempts: u32,
    /// Fixed delay between failed attempts.
    pub retry_delay: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_attempts: 10,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Create a connection pool, retrying while the database is not yet reachable.
///
/// Returns the error of the final attempt if every attempt fails.
pub async fn connect_with_retry(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<DbPool, sqlx::Error> {
    let attempts = settings.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(database_url)
            .await;

        match result {
            Ok(pool) => {
                if attempt > 1 {
                    tracing::info!(attempt, "Connected to database after retry");
                }
                return Ok(pool);
            }
            Err(err) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %err,
                    "Waiting for database",
                );
                tokio::time::sleep(settings.retry_delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
