//! Database connection pool

use snippetbox_shared::config::DatabaseSettings;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::time::Duration;

/// Open the pool and make sure the server actually answers before returning it.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(settings.pool_max_size)
        .acquire_timeout(Duration::from_secs(settings.pool_timeout_seconds))
        .connect(&settings.url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}
