//! Plant inputs and the values derived from them.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::constants::{
    DEFAULT_EFFICIENCY, DEFAULT_FLOW_RATE_LPS, DEFAULT_HEAD_M, DEFAULT_LOSS_PERCENT,
    DEFAULT_PIEZOMETRIC_HEAD_M,
};
use super::estimator::{HeadRange, PowerEstimator};

/// Rejection raised when plant inputs leave their physical domain.
///
/// The estimator functions themselves are total; this error exists only at
/// the boundary where raw inputs become a [`PlantParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParameterError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("loss_percent must be within [0, 100], got {0}")]
    LossOutOfRange(f64),
    #[error("efficiency must be within (0, 1], got {0}")]
    EfficiencyOutOfRange(f64),
    #[error("invalid head range at {field}: {reason}")]
    InvalidHeadRange {
        field: &'static str,
        reason: &'static str,
    },
}

impl ParameterError {
    /// Name of the offending input.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonFinite { field, .. }
            | Self::Negative { field, .. }
            | Self::InvalidHeadRange { field, .. } => field,
            Self::LossOutOfRange(_) => "loss_percent",
            Self::EfficiencyOutOfRange(_) => "efficiency",
        }
    }
}

/// Validated hydraulic inputs of one plant.
///
/// Immutable once built: every field is checked by [`PlantParameters::new`]
/// and exposed through accessors.
///
/// # Examples
///
/// ```
/// use hydrogpt::hydro::PlantParameters;
///
/// let plant = PlantParameters::new(100.0, 50.0, 0.0, 0.7).unwrap();
/// assert!((plant.estimate().power_kw - 34.335).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlantParameters {
    flow_rate_lps: f64,
    head_m: f64,
    loss_percent: f64,
    piezometric_head_m: f64,
    efficiency: f64,
}

impl PlantParameters {
    /// Validates and builds plant parameters.
    ///
    /// The piezometric head starts at its default; see
    /// [`PlantParameters::with_piezometric_head`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] for non-finite values, negative flow or
    /// head, a loss outside `[0, 100]` or an efficiency outside `(0, 1]`.
    pub fn new(
        flow_rate_lps: f64,
        head_m: f64,
        loss_percent: f64,
        efficiency: f64,
    ) -> Result<Self, ParameterError> {
        let flow_rate_lps = non_negative("flow_rate_lps", flow_rate_lps)?;
        let head_m = non_negative("head_m", head_m)?;
        let loss_percent = finite("loss_percent", loss_percent)?;
        if !(0.0..=100.0).contains(&loss_percent) {
            return Err(ParameterError::LossOutOfRange(loss_percent));
        }
        let efficiency = finite("efficiency", efficiency)?;
        if efficiency <= 0.0 || efficiency > 1.0 {
            return Err(ParameterError::EfficiencyOutOfRange(efficiency));
        }
        Ok(Self {
            flow_rate_lps,
            head_m,
            loss_percent,
            piezometric_head_m: DEFAULT_PIEZOMETRIC_HEAD_M,
            efficiency,
        })
    }

    /// Returns a copy carrying the given piezometric head.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if the value is negative or not finite.
    pub fn with_piezometric_head(self, piezometric_head_m: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            piezometric_head_m: non_negative("piezometric_head_m", piezometric_head_m)?,
            ..self
        })
    }

    /// Average flow rate (l/s).
    pub fn flow_rate_lps(&self) -> f64 {
        self.flow_rate_lps
    }

    /// Available gross head (m).
    pub fn head_m(&self) -> f64 {
        self.head_m
    }

    /// Network loss (%).
    pub fn loss_percent(&self) -> f64 {
        self.loss_percent
    }

    /// Current piezometric head (m). Informational only.
    pub fn piezometric_head_m(&self) -> f64 {
        self.piezometric_head_m
    }

    /// Turbine/system efficiency (fraction).
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Gross head derated by the network loss.
    pub fn effective_head_m(&self) -> f64 {
        PowerEstimator::derive_effective_head(self.head_m, self.loss_percent)
    }

    /// Single-point power estimate for this plant.
    pub fn estimate(&self) -> PowerEstimate {
        let effective_head_m = self.effective_head_m();
        PowerEstimate {
            effective_head_m,
            power_kw: PowerEstimator::estimate_power(
                self.flow_rate_lps,
                effective_head_m,
                self.efficiency,
            ),
        }
    }

    /// Power-versus-head curve for this plant's flow and loss.
    ///
    /// Uses the fixed sweep efficiency, not [`PlantParameters::efficiency`].
    pub fn efficiency_curve(&self, range: &HeadRange) -> SweepResult {
        PowerEstimator::compute_efficiency_curve(
            self.flow_rate_lps,
            self.loss_percent,
            &range.values(),
        )
    }
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self {
            flow_rate_lps: DEFAULT_FLOW_RATE_LPS,
            head_m: DEFAULT_HEAD_M,
            loss_percent: DEFAULT_LOSS_PERCENT,
            piezometric_head_m: DEFAULT_PIEZOMETRIC_HEAD_M,
            efficiency: DEFAULT_EFFICIENCY,
        }
    }
}

impl fmt::Display for PlantParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flow={:.1} l/s  head={:.1} m  loss={}%  piezometric={:.1} m  eta={:.2}",
            self.flow_rate_lps,
            self.head_m,
            self.loss_percent,
            self.piezometric_head_m,
            self.efficiency,
        )
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::NonFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ParameterError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ParameterError::Negative { field, value });
    }
    // Normalise -0.0 so downstream products never print as "-0.00".
    Ok(value + 0.0)
}

/// Power estimate for one set of plant parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerEstimate {
    /// Loss-derated head the estimate was computed from (m).
    pub effective_head_m: f64,
    /// Estimated electrical output (kW).
    pub power_kw: f64,
}

impl fmt::Display for PowerEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} kW (effective head {:.2} m)",
            self.power_kw, self.effective_head_m
        )
    }
}

/// One point of the power-versus-head curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Gross head before loss derating (m).
    pub head_m: f64,
    /// Estimated output at that head (kW).
    pub power_kw: f64,
}

/// Ordered power-versus-head curve, in the order the heads were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SweepResult {
    points: Vec<SweepPoint>,
}

impl SweepResult {
    pub(crate) fn from_points(points: Vec<SweepPoint>) -> Self {
        Self { points }
    }

    /// All points in sweep order.
    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    /// Iterates points in sweep order.
    pub fn iter(&self) -> std::slice::Iter<'_, SweepPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest power on the curve, or `None` for an empty sweep.
    pub fn peak_power_kw(&self) -> Option<f64> {
        self.points.iter().map(|p| p.power_kw).reduce(f64::max)
    }
}

impl<'a> IntoIterator for &'a SweepResult {
    type Item = &'a SweepPoint;
    type IntoIter = std::slice::Iter<'a, SweepPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_sidebar_values() {
        let p = PlantParameters::default();
        assert_eq!(p.flow_rate_lps(), 50.0);
        assert_eq!(p.head_m(), 80.0);
        assert_eq!(p.loss_percent(), 18.0);
        assert_eq!(p.piezometric_head_m(), 120.0);
        assert_eq!(p.efficiency(), 0.7);
    }

    #[test]
    fn new_accepts_boundary_values() {
        assert!(PlantParameters::new(0.0, 0.0, 0.0, 1.0).is_ok());
        assert!(PlantParameters::new(0.0, 0.0, 100.0, 0.01).is_ok());
    }

    #[test]
    fn new_rejects_negative_flow() {
        let err = PlantParameters::new(-1.0, 80.0, 18.0, 0.7).unwrap_err();
        assert_eq!(err.field(), "flow_rate_lps");
    }

    #[test]
    fn new_rejects_negative_head() {
        let err = PlantParameters::new(50.0, -0.5, 18.0, 0.7).unwrap_err();
        assert!(matches!(err, ParameterError::Negative { field: "head_m", .. }));
    }

    #[test]
    fn new_rejects_loss_outside_percentage_range() {
        assert_eq!(
            PlantParameters::new(50.0, 80.0, 100.5, 0.7),
            Err(ParameterError::LossOutOfRange(100.5))
        );
        assert_eq!(
            PlantParameters::new(50.0, 80.0, -1.0, 0.7),
            Err(ParameterError::LossOutOfRange(-1.0))
        );
    }

    #[test]
    fn new_rejects_efficiency_outside_unit_interval() {
        assert!(PlantParameters::new(50.0, 80.0, 18.0, 0.0).is_err());
        assert!(PlantParameters::new(50.0, 80.0, 18.0, 1.2).is_err());
    }

    #[test]
    fn new_rejects_nan_and_infinity() {
        let err = PlantParameters::new(f64::NAN, 80.0, 18.0, 0.7).unwrap_err();
        assert_eq!(err.field(), "flow_rate_lps");
        let err = PlantParameters::new(50.0, f64::INFINITY, 18.0, 0.7).unwrap_err();
        assert_eq!(err.field(), "head_m");
    }

    #[test]
    fn piezometric_head_is_validated() {
        let p = PlantParameters::default();
        assert!(p.with_piezometric_head(-3.0).is_err());
        let p = p.with_piezometric_head(95.0).unwrap();
        assert_eq!(p.piezometric_head_m(), 95.0);
    }

    #[test]
    fn piezometric_head_does_not_change_estimate() {
        let a = PlantParameters::default();
        let b = a.with_piezometric_head(10.0).unwrap();
        assert_eq!(a.estimate(), b.estimate());
    }

    #[test]
    fn validated_effective_head_is_never_negative() {
        for loss in [0.0, 18.0, 50.0, 99.9, 100.0] {
            let p = PlantParameters::new(50.0, 80.0, loss, 0.7).unwrap();
            assert!(p.effective_head_m() >= 0.0);
            assert!(p.estimate().power_kw >= 0.0);
        }
    }

    #[test]
    fn estimate_display_rounds_to_two_decimals() {
        let e = PowerEstimate {
            effective_head_m: 65.6,
            power_kw: 22.523_76,
        };
        assert_eq!(e.to_string(), "22.52 kW (effective head 65.60 m)");
    }

    #[test]
    fn peak_power_of_empty_sweep_is_none() {
        assert_eq!(SweepResult::default().peak_power_kw(), None);
    }
}
