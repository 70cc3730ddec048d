//! Database layer - connection pool, schema bootstrap and repositories
//!
//! # Design Principles
//!
//! - One pooled connection per operation, released on every exit path
//! - One parameterized statement per operation (autocommit, atomic)
//! - Every acquisition and statement is time-bounded

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{connect_pool, create_pool};
pub use repos::*;
pub use schema::ensure_schema;
