//! Read-only REST API over a finished run.
//!
//! Provides two GET endpoints:
//! - `/status`: final system status and run summary
//! - `/telemetry`: per-tick records with optional range filtering

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::kpi::RunSummary;
use crate::sim::types::{SystemStatus, TickResult};

pub use types::{ErrorResponse, StatusResponse, TelemetryRecord};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes and wrapped in `Arc`; all data is
/// read-only so no locks are needed.
pub struct AppState {
    /// Status snapshot taken at the end of the run.
    pub status: SystemStatus,
    pub summary: RunSummary,
    /// Per-tick simulation results.
    pub results: Vec<TickResult>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/telemetry", get(handlers::get_telemetry))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
