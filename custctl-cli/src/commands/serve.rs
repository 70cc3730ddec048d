//! HTTP server command
//!
//! Runs the customer record API against PostgreSQL, or against an
//! in-process store with `--memory`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use custctl_server::db::{create_pool, ensure_schema, CustomerStore, MemoryCustomerStore, PgCustomerStore};
use custctl_server::{run_server, AppState, RecordService, ServerConfig, StoreConfig};

/// Slack added on top of the store bounds for the whole-request timeout
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CUSTCTL_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Create the customers table before serving if it does not exist
    #[arg(long, conflicts_with = "memory")]
    pub ensure_schema: bool,

    /// Serve from an in-process store instead of PostgreSQL (data is lost on exit)
    #[arg(long)]
    pub memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let (store, store_kind, request_timeout) = if args.memory {
        tracing::warn!("Using in-memory store; records will not persist");
        let store: Arc<dyn CustomerStore> = Arc::new(MemoryCustomerStore::new());
        (store, "memory", ServerConfig::default().request_timeout)
    } else {
        let store_config = StoreConfig::from_env().context("Invalid store configuration")?;
        tracing::info!(
            host = %store_config.host,
            port = store_config.port,
            database = %store_config.database,
            "Using PostgreSQL store"
        );

        let pool = create_pool(&store_config);
        if args.ensure_schema {
            ensure_schema(&pool, store_config.query_timeout)
                .await
                .context("Failed to create customers table")?;
        }

        let request_timeout =
            store_config.acquire_timeout + store_config.query_timeout + REQUEST_TIMEOUT_SLACK;
        let store: Arc<dyn CustomerStore> =
            Arc::new(PgCustomerStore::new(pool, store_config.query_timeout));
        (store, "postgres", request_timeout)
    };

    let state = AppState::new(RecordService::new(store), store_kind);
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        request_timeout,
    };

    tracing::info!("Starting custctl server on {}", args.bind);
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
