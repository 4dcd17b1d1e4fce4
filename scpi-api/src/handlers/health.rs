//! Health check handler.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Component statuses
    pub components: ComponentStatus,
}

/// Component status.
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    /// API server status
    pub api: &'static str,
    /// Product catalog status
    pub catalog: &'static str,
    /// Registered accounts
    pub users: usize,
    /// Open sessions
    pub sessions: usize,
}

/// Health check handler.
///
/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let catalog = if state.catalog.list().is_ok() {
        "healthy"
    } else {
        "unavailable"
    };

    let response = HealthResponse {
        status: if catalog == "healthy" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
        components: ComponentStatus {
            api: "healthy",
            catalog,
            users: state.users.len(),
            sessions: state.sessions.active_session_count(),
        },
    };

    Json(response)
}
