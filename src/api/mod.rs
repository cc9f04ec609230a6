//! HTTP API - axum router over the core operations.
//!
//! - `suppliers.rs`, `products.rs`, `transactions.rs`: routes + handlers, one file per resource
//! - `errors.rs`: mapping of [`crate::errors::Error`] to status codes and JSON bodies
//!
//! Every mutating handler opens one database transaction, passes it to the core and
//! commits on success. An early return drops the transaction, which rolls it back.

use axum::Router;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::Result;

/// Error responses
pub mod errors;
/// `/products` routes, including stock adjustment
pub mod products;
/// `/suppliers` routes
pub mod suppliers;
/// `/transactions` routes
pub mod transactions;

pub use errors::ApiError;

/// Shared data available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
}

impl AppState {
    /// Creates a new `AppState` around a database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Builds the full HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(suppliers::router())
        .merge(products::router())
        .merge(transactions::router())
        .with_state(state)
}

/// Binds `bind_address` and serves the API until Ctrl-C.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(db: DatabaseConnection, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(db)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)]

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Sends one request through a fresh router and returns status and JSON body.
    pub async fn send(
        db: &DatabaseConnection,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let app = super::router(super::AppState::new(db.clone()));
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(json) => request.body(Body::from(json.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
