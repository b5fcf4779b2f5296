//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::assistant::Conversation;
use crate::hydro::{HeadRange, PlantParameters, PowerEstimate, SweepResult};

/// Everything the server was started with.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub plant: PlantParameters,
    pub estimate: PowerEstimate,
    pub head_range: HeadRange,
    pub curve: SweepResult,
    /// Exchanges in chronological order.
    pub conversation: Conversation,
}

/// Optional overrides for `/estimate`; absent fields fall back to the
/// server's plant.
#[derive(Debug, Default, Deserialize)]
pub struct EstimateQuery {
    pub flow_lps: Option<f64>,
    pub head_m: Option<f64>,
    pub loss_pct: Option<f64>,
    pub efficiency: Option<f64>,
    pub piezometric_head_m: Option<f64>,
}

/// Validated inputs and the estimate computed from them.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub plant: PlantParameters,
    pub estimate: PowerEstimate,
}

/// Optional overrides for `/curve`.
#[derive(Debug, Default, Deserialize)]
pub struct CurveQuery {
    pub flow_lps: Option<f64>,
    pub loss_pct: Option<f64>,
    /// First head (m).
    pub start_m: Option<f64>,
    /// Last head, inclusive (m).
    pub end_m: Option<f64>,
    /// Head spacing (m).
    pub step_m: Option<f64>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Offending parameter name.
    pub field: &'static str,
}
