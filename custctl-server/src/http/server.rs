//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::service::RecordService;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Upper bound on a whole request; answered with 408 when exceeded
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub service: RecordService,
    /// Backing store name reported by /health
    pub store_kind: &'static str,
}

impl AppState {
    pub fn new(service: RecordService, store_kind: &'static str) -> Self {
        Self {
            service,
            store_kind,
        }
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:8000"),
                HeaderValue::from_static("http://127.0.0.1:8000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::customers::router())
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let store = PgCustomerStore::new(create_pool(&store_config), store_config.query_timeout);
/// let state = AppState::new(RecordService::new(Arc::new(store)), "postgres");
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CustomerStore, DbError, MemoryCustomerStore};
    use crate::models::{Customer, NewCustomer};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let service = RecordService::new(Arc::new(MemoryCustomerStore::new()));
        build_router(AppState::new(service, "memory"), &ServerConfig::default())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(!config.cors_permissive);
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn create_then_list_scenario() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/customers/",
                r#"{"name":"John Doe","email":"john@example.com"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Customer created", "name": "John Doe"})
        );

        let response = app.oneshot(get("/customers/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([{"name": "John Doe", "email": "john@example.com"}])
        );
    }

    #[tokio::test]
    async fn empty_list_is_an_empty_array() {
        let response = app().oneshot(get("/customers/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn path_without_trailing_slash() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json("/customers", r#"{"name":"Ada","email":"ada@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/customers")).await.unwrap();
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_write() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json("/customers/", r#"{"name":"","email":"john@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "validation_error");

        let response = app.oneshot(get("/customers/")).await.unwrap();
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn nul_in_name_is_a_validation_error() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/customers/",
                r#"{"name":"A\u0000B","email":"a@example.com"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "name: must not contain control characters");

        let response = app.oneshot(get("/customers/")).await.unwrap();
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let response = app()
            .oneshot(post_json("/customers/", r#"{"name":"John Doe"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["message"], "email cannot be empty");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let response = app()
            .oneshot(post_json("/customers/", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let app = app();
        for (name, email) in [("Zed", "z@example.com"), ("Amy", "a@example.com"), ("Max", "m@example.com")] {
            let body = json!({"name": name, "email": email}).to_string();
            let response = app.clone().oneshot(post_json("/customers/", &body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(get("/customers/")).await.unwrap();
        let body = json_body(response).await;
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, ["Zed", "Amy", "Max"]);
    }

    /// Store that never answers within a request
    struct StalledStore;

    #[async_trait]
    impl CustomerStore for StalledStore {
        async fn insert(&self, _customer: &NewCustomer) -> Result<(), DbError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<Customer>, DbError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_answers_408() {
        let config = ServerConfig {
            request_timeout: Duration::from_secs(2),
            ..ServerConfig::default()
        };
        let service = RecordService::new(Arc::new(StalledStore));
        let app = build_router(AppState::new(service, "stalled"), &config);

        let response = app.oneshot(get("/customers/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
