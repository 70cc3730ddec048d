//! custctl-server: customer record service
//!
//! Append and list customer records over HTTP, backed by PostgreSQL
//! through a bounded, lazily connected sqlx pool.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
pub use service::{CreatedRecord, RecordService, ServiceError};
