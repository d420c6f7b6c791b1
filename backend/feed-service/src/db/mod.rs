//! Database access layer: pool construction, embedded migrations, and the
//! repository modules.

pub mod post_repo;
pub mod reaction_repo;
pub mod reply_repo;
pub mod user_repo;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Creates the connection pool, verifies it, and applies pending migrations.
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        // Timeout for acquiring a connection from the pool
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        // Close connections idle for longer than this
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        // Maximum lifetime of a connection (to handle stale connections)
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        // Test connections before returning them from the pool
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    MIGRATOR.run(&pool).await?;

    info!(
        max_connections = config.max_connections,
        "database pool created and migrations applied"
    );
    Ok(pool)
}
