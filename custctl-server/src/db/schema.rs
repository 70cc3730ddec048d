//! Idempotent bootstrap of the customers table

use std::time::Duration;

use sqlx::PgPool;

use super::repos::customers::Op;
use super::repos::DbError;

/// Create the customers table if it does not exist.
///
/// `id` is a monotonic identity column; list order follows it. Connection
/// failures report as [`DbError::Unavailable`]; `query_timeout` is the bound
/// reported if the server cancels the statement.
pub async fn ensure_schema(pool: &PgPool, query_timeout: Duration) -> Result<(), DbError> {
    tracing::info!("Ensuring customers table exists");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DbError::from_statement(e, Op::Write, query_timeout))?;

    Ok(())
}
