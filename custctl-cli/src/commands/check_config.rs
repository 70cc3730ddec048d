//! Validate store configuration without connecting

use anyhow::{Context, Result};

use custctl_server::StoreConfig;

pub fn run_check_config() -> Result<()> {
    let config = StoreConfig::from_env().context("Invalid store configuration")?;

    println!("host            {}", config.host);
    println!("port            {}", config.port);
    println!("database        {}", config.database);
    println!("username        {}", config.username);
    println!("password        [REDACTED]");
    println!("ssl mode        {:?}", config.ssl_mode);
    println!("max connections {}", config.max_connections);
    println!("acquire timeout {}s", config.acquire_timeout.as_secs());
    println!("query timeout   {}s", config.query_timeout.as_secs());

    Ok(())
}
