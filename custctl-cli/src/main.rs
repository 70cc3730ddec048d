//! custctl - customer record service
//!
//! Entry point for the record service binary:
//! - `serve` runs the HTTP API
//! - `init-db` creates the customers table
//! - `check-config` validates store settings without connecting
//!
//! Settings come from the environment, optionally seeded from a `.env` file.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "custctl",
    author,
    version,
    about = "Append/list record service for customer records",
    long_about = "HTTP service that appends and lists customer records in PostgreSQL. \
                  Store settings are read from SQL_SERVER, SQL_DB, SQL_USER and SQL_PASSWORD."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the customers table if it does not exist
    InitDb,
    /// Validate store configuration and print it (password redacted)
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be populated
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    logging::init(logging::LogOptions {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::InitDb => commands::init_db::run_init_db().await,
        Commands::CheckConfig => commands::check_config::run_check_config(),
    };

    logging::flush();
    result
}
