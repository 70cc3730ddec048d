//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and an acquisition
//! bound. The acquire timeout also covers establishing new connections, so
//! an unreachable store fails within it rather than hanging.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::StoreConfig;

fn pool_options(config: &StoreConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
}

/// Create a lazy PostgreSQL connection pool.
///
/// No connection is opened until the first request, so the server starts
/// even when the store is down and reports it per request instead.
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::from_env()?;
/// let pool = create_pool(&config);
/// ```
pub fn create_pool(config: &StoreConfig) -> PgPool {
    pool_options(config).connect_lazy_with(config.connect_options())
}

/// Create a pool and open one connection up front.
///
/// # Errors
///
/// Returns an error if the store cannot be reached within the acquire timeout.
pub async fn connect_pool(config: &StoreConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config)
        .connect_with(config.connect_options())
        .await
}
