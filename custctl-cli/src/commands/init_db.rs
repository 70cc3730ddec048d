//! Create the customers table once and exit

use anyhow::{Context, Result};

use custctl_server::db::{connect_pool, ensure_schema};
use custctl_server::StoreConfig;

pub async fn run_init_db() -> Result<()> {
    let config = StoreConfig::from_env().context("Invalid store configuration")?;

    let pool = connect_pool(&config)
        .await
        .with_context(|| format!("Failed to connect to {}:{}", config.host, config.port))?;

    ensure_schema(&pool, config.query_timeout)
        .await
        .context("Failed to create customers table")?;
    pool.close().await;

    tracing::info!(database = %config.database, "customers table ready");
    Ok(())
}
