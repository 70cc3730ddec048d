//! Customer endpoints
//!
//! `POST /customers/` appends, `GET /customers/` lists everything.
//! The slash-less path is routed to the same handlers.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::Customer;
use crate::service::CreatedRecord;

/// Create customer request
///
/// Fields are optional here so a missing one is reported as empty
/// rather than as a decode failure.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /customers/ - append a customer
async fn create_customer(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateCustomerRequest>,
) -> Result<Json<CreatedRecord>, ApiError> {
    let created = state
        .service
        .create_record(req.name.as_deref(), req.email.as_deref())
        .await?;

    Ok(Json(created))
}

/// GET /customers/ - list all customers
async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.service.list_records().await?;
    Ok(Json(customers))
}

/// Customer routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customers/", get(list_customers).post(create_customer))
        .route("/customers", get(list_customers).post(create_customer))
}
