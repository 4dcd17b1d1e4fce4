//! API server implementation.
//!
//! This module provides the main API server that handles HTTP requests.

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::middleware::RequestIdLayer;
use crate::routes::create_router;
use crate::state::AppState;

/// Builds the router with every middleware layer applied.
pub fn build_app(state: Arc<AppState>) -> Router {
    let timeout = state.config.request_timeout();

    create_router(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(RequestIdLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// API server.
pub struct ApiServer {
    /// Server configuration
    config: ApiConfig,
    /// Application state
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            config: state.config.clone(),
            state,
        }
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ApiError> {
        let addr = self.config.bind_address();

        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ApiError::Internal(format!("Invalid bind address: {e}")))?;

        TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to bind to {addr}: {e}")))
    }

    /// Runs the API server until `shutdown_signal` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let app = build_app(Arc::clone(&self.state));

        let local = listener
            .local_addr()
            .map_err(|e| ApiError::Internal(format!("Listener has no address: {e}")))?;
        info!(address = %local, "API server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

        warn!("API server shutting down");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scpi_security::PasswordParams;

    fn test_state() -> Arc<AppState> {
        let config = ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ApiConfig::default()
        };
        Arc::new(AppState::with_defaults(config, &PasswordParams::minimal()).unwrap())
    }

    #[test]
    fn test_api_server_new() {
        let state = test_state();
        let server = ApiServer::new(Arc::clone(&state));

        assert!(Arc::ptr_eq(server.state(), &state));
    }

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let server = ApiServer::new(test_state());
        let listener = server.bind().await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
