//! Customer repository
//!
//! Append and list only. Each call acquires one pooled connection, runs one
//! parameterized statement under a timeout, and drops the connection guard
//! before returning, including on error.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tokio::sync::RwLock;

use crate::models::{Customer, NewCustomer};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Connection could not be acquired, established or authenticated
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// Statement exceeded its time bound
    #[error("store operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Store accepted the connection but rejected the insert
    #[error("store rejected write: {0}")]
    Write(#[source] sqlx::Error),

    /// Store accepted the connection but rejected the select
    #[error("store rejected read: {0}")]
    Read(#[source] sqlx::Error),
}

/// Which side of the store a failed statement was on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Write,
    Read,
}

impl DbError {
    /// Classify an error returned while executing a statement.
    pub(crate) fn from_statement(err: sqlx::Error, op: Op, bound: Duration) -> Self {
        let kind = match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => Failure::Unavailable,
            sqlx::Error::Database(db) => Failure::from_sqlstate(db.code().as_deref()),
            _ => Failure::Rejected,
        };

        match (kind, op) {
            (Failure::Unavailable, _) => Self::Unavailable(err),
            (Failure::TimedOut, _) => Self::Timeout(bound),
            (Failure::Rejected, Op::Write) => Self::Write(err),
            (Failure::Rejected, Op::Read) => Self::Read(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Unavailable,
    TimedOut,
    Rejected,
}

impl Failure {
    fn from_sqlstate(code: Option<&str>) -> Self {
        match code {
            // statement_timeout
            Some("57014") => Self::TimedOut,
            // admin_shutdown, crash_shutdown, cannot_connect_now, unknown database
            Some("57P01" | "57P02" | "57P03" | "3D000") => Self::Unavailable,
            // connection exceptions, authorization failures
            Some(code) if code.starts_with("08") || code.starts_with("28") => Self::Unavailable,
            _ => Self::Rejected,
        }
    }
}

/// Append/list storage for customer records
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Append one record.
    async fn insert(&self, customer: &NewCustomer) -> Result<(), DbError>;

    /// All records in insertion order.
    async fn list_all(&self) -> Result<Vec<Customer>, DbError>;
}

/// PostgreSQL-backed customer store
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to acquire store connection");
            DbError::Unavailable(e)
        })
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn insert(&self, customer: &NewCustomer) -> Result<(), DbError> {
        let mut conn = self.acquire().await?;

        let result = tokio::time::timeout(
            self.query_timeout,
            sqlx::query("INSERT INTO customers (name, email) VALUES ($1, $2)")
                .bind(customer.name.as_str())
                .bind(customer.email.as_str())
                .execute(&mut *conn),
        )
        .await;

        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(DbError::from_statement(e, Op::Write, self.query_timeout)),
            Err(_) => {
                // Abandoned mid-protocol; don't hand it back to the pool
                conn.close_on_drop();
                Err(DbError::Timeout(self.query_timeout))
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<Customer>, DbError> {
        let mut conn = self.acquire().await?;

        let result = tokio::time::timeout(
            self.query_timeout,
            sqlx::query_as::<_, Customer>("SELECT name, email FROM customers ORDER BY id ASC")
                .fetch_all(&mut *conn),
        )
        .await;

        match result {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => Err(DbError::from_statement(e, Op::Read, self.query_timeout)),
            Err(_) => {
                conn.close_on_drop();
                Err(DbError::Timeout(self.query_timeout))
            }
        }
    }
}

/// In-process customer store (tests and `serve --memory`)
#[derive(Default)]
pub struct MemoryCustomerStore {
    records: RwLock<Vec<Customer>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn insert(&self, customer: &NewCustomer) -> Result<(), DbError> {
        self.records.write().await.push(Customer::from(customer.clone()));
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Customer>, DbError> {
        Ok(self.records.read().await.clone())
    }
}
