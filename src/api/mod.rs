//! REST API for assessments.
//!
//! Endpoints:
//! - `GET /assessment`: assessment for the loaded scenario
//! - `GET /projection`: per-year savings with optional range filtering
//! - `GET /incentives`: incentive listing, total, and category subtotals
//! - `POST /assess`: assess an arbitrary location against the loaded regional data

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::engine::{Assessment, Engine};
use crate::region::RegionTable;

pub use types::{ErrorResponse, IncentivesResponse, ProjectionQuery};

/// Immutable application state shared across all request handlers.
///
/// Constructed once at startup and wrapped in `Arc`; no locks needed
/// since the engine is stateless and the scenario result is read-only.
pub struct AppState {
    /// Engine used for `POST /assess`.
    pub engine: Engine<RegionTable>,
    /// Assessment of the loaded scenario.
    pub assessment: Assessment,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/assessment", get(handlers::get_assessment))
        .route("/projection", get(handlers::get_projection))
        .route("/incentives", get(handlers::get_incentives))
        .route("/assess", post(handlers::post_assess))
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
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
