//! Record service: validate, then append or list through the store

use std::sync::Arc;

use serde::Serialize;

use crate::db::{CustomerStore, DbError};
use crate::models::{Customer, NewCustomer, ValidationError};

/// Confirmation returned by create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedRecord {
    pub message: &'static str,
    pub name: String,
}

impl CreatedRecord {
    fn new(name: String) -> Self {
        Self {
            message: "Customer created",
            name,
        }
    }
}

/// Error from a record service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] DbError),
}

/// Customer record service
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn CustomerStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// Validate and append a record.
    ///
    /// Validation runs before the store is touched, so invalid input never
    /// acquires a connection or writes anything.
    pub async fn create_record(
        &self,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<CreatedRecord, ServiceError> {
        let customer = NewCustomer::parse(name, email)?;

        self.store.insert(&customer).await?;
        tracing::debug!(name = customer.name.as_str(), "customer created");

        Ok(CreatedRecord::new(customer.name.into_string()))
    }

    /// All records, oldest first.
    pub async fn list_records(&self) -> Result<Vec<Customer>, ServiceError> {
        let records = self.store.list_all().await?;
        tracing::debug!(count = records.len(), "customers listed");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCustomerStore;
    use async_trait::async_trait;

    fn service() -> RecordService {
        RecordService::new(Arc::new(MemoryCustomerStore::new()))
    }

    #[tokio::test]
    async fn create_then_list() {
        let svc = service();
        let created = svc
            .create_record(Some("John Doe"), Some("john@example.com"))
            .await
            .unwrap();
        assert_eq!(created.message, "Customer created");
        assert_eq!(created.name, "John Doe");

        let records = svc.list_records().await.unwrap();
        assert_eq!(
            records,
            vec![Customer {
                name: "John Doe".into(),
                email: "john@example.com".into(),
            }]
        );
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let svc = service();

        let err = svc
            .create_record(Some(""), Some("john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Empty { field: "name" })));

        let err = svc.create_record(Some("John"), Some("")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Empty { field: "email" })));

        assert!(svc.list_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_creates_are_not_lost() {
        let svc = service();

        let a = svc.clone();
        let b = svc.clone();
        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.create_record(Some("Alice"), Some("alice@example.com")).await }),
            tokio::spawn(async move { b.create_record(Some("Bob"), Some("bob@example.com")).await }),
        );
        ra.unwrap().unwrap();
        rb.unwrap().unwrap();

        let mut names: Vec<_> = svc
            .list_records()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        struct DownStore;

        #[async_trait]
        impl CustomerStore for DownStore {
            async fn insert(&self, _: &NewCustomer) -> Result<(), DbError> {
                Err(DbError::Unavailable(sqlx::Error::PoolTimedOut))
            }

            async fn list_all(&self) -> Result<Vec<Customer>, DbError> {
                Err(DbError::Unavailable(sqlx::Error::PoolTimedOut))
            }
        }

        let svc = RecordService::new(Arc::new(DownStore));
        let err = svc
            .create_record(Some("John"), Some("john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(DbError::Unavailable(_))));

        let err = svc.list_records().await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(DbError::Unavailable(_))));
    }
}
