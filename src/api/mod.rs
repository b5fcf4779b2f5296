//! REST API for plant state, on-demand estimates and the report.
//!
//! Provides four GET endpoints:
//! - `/state`: plant inputs, estimate, head sweep and conversation
//! - `/estimate`: single-point estimate with optional query overrides
//! - `/curve`: power-versus-head curve with optional query overrides
//! - `/report`: PDF report download

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::assistant::Conversation;
use crate::hydro::{HeadRange, PlantParameters, PowerEstimate, SweepResult};

pub use types::{CurveQuery, ErrorResponse, EstimateQuery, EstimateResponse, StateResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`; handlers never mutate it.
pub struct AppState {
    /// Plant inputs the server was started with.
    pub plant: PlantParameters,
    /// Estimate for `plant`.
    pub estimate: PowerEstimate,
    /// Head range used for `curve` and as the `/curve` default.
    pub head_range: HeadRange,
    /// Power curve for `plant` over `head_range`.
    pub curve: SweepResult,
    /// Exchanges made before the server started.
    pub conversation: Conversation,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/estimate", get(handlers::get_estimate))
        .route("/curve", get(handlers::get_curve))
        .route("/report", get(handlers::get_report))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns the I/O error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
