//! Steady-state hydraulic power model and the head sweep built on it.

use serde::Serialize;

use super::constants::{
    DEFAULT_SWEEP_EFFICIENCY, GRAVITY_M_S2, LITERS_PER_M3, REFERENCE_HEAD_END_M,
    REFERENCE_HEAD_START_M, REFERENCE_HEAD_STEP_M, WATER_DENSITY_KG_M3, WATTS_PER_KW,
};
use super::types::{ParameterError, SweepPoint, SweepResult};

/// Upper bound on the number of heads a [`HeadRange`] may expand to.
pub const MAX_SWEEP_POINTS: usize = 10_000;

/// Hydraulic power estimator.
///
/// Stateless: every function is pure and total over `f64`, so it can be
/// called from any number of threads without coordination. Out-of-domain
/// inputs (negative head, loss above 100 %) are not rejected here and
/// propagate into the result; validate with
/// [`PlantParameters::new`](super::PlantParameters::new) first.
#[derive(Debug, Default, Clone, Copy)]
pub struct PowerEstimator;

impl PowerEstimator {
    /// Electrical output in kW for a flow, an (already derated) head and an
    /// efficiency.
    ///
    /// `P = Q[m^3/s] * H * g * rho * eta`, reported in kW.
    ///
    /// # Arguments
    ///
    /// * `flow_rate_lps` - Volumetric flow (l/s)
    /// * `head_m` - Head seen by the turbine (m), typically the effective head
    /// * `efficiency` - Conversion efficiency (fraction)
    ///
    /// # Examples
    ///
    /// ```
    /// use hydrogpt::hydro::PowerEstimator;
    ///
    /// let kw = PowerEstimator::estimate_power(100.0, 50.0, 0.7);
    /// assert!((kw - 34.335).abs() < 1e-9);
    /// ```
    pub fn estimate_power(flow_rate_lps: f64, head_m: f64, efficiency: f64) -> f64 {
        let flow_m3s = flow_rate_lps / LITERS_PER_M3;
        let power_watts = flow_m3s * head_m * GRAVITY_M_S2 * WATER_DENSITY_KG_M3 * efficiency;
        power_watts / WATTS_PER_KW
    }

    /// Gross head derated by a percentage network loss.
    pub fn derive_effective_head(head_m: f64, loss_percent: f64) -> f64 {
        head_m * (1.0 - loss_percent / 100.0)
    }

    /// Evaluates the power formula at every head in `head_range_m`.
    ///
    /// Each head is derated by `loss_percent` and evaluated at
    /// [`DEFAULT_SWEEP_EFFICIENCY`]. The result keeps the input order.
    ///
    /// # Arguments
    ///
    /// * `flow_rate_lps` - Volumetric flow (l/s)
    /// * `loss_percent` - Network loss applied to every head (%)
    /// * `head_range_m` - Gross heads to evaluate (m)
    ///
    /// # Returns
    ///
    /// One [`SweepPoint`] per input head, `head_m` holding the gross head.
    pub fn compute_efficiency_curve(
        flow_rate_lps: f64,
        loss_percent: f64,
        head_range_m: &[f64],
    ) -> SweepResult {
        let points = head_range_m
            .iter()
            .map(|&head_m| {
                let effective_head_m = Self::derive_effective_head(head_m, loss_percent);
                SweepPoint {
                    head_m,
                    power_kw: Self::estimate_power(
                        flow_rate_lps,
                        effective_head_m,
                        DEFAULT_SWEEP_EFFICIENCY,
                    ),
                }
            })
            .collect();
        SweepResult::from_points(points)
    }
}

/// Inclusive arithmetic range of gross heads for the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadRange {
    start_m: f64,
    end_m: f64,
    step_m: f64,
}

impl HeadRange {
    /// Builds a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidHeadRange`] when a bound is not
    /// finite, `start_m < 0`, `step_m <= 0`, `end_m < start_m`, or the range
    /// would expand beyond [`MAX_SWEEP_POINTS`].
    pub fn new(start_m: f64, end_m: f64, step_m: f64) -> Result<Self, ParameterError> {
        let invalid = |field, reason| ParameterError::InvalidHeadRange { field, reason };

        if !start_m.is_finite() {
            return Err(invalid("start_m", "must be finite"));
        }
        if !end_m.is_finite() {
            return Err(invalid("end_m", "must be finite"));
        }
        if !step_m.is_finite() || step_m <= 0.0 {
            return Err(invalid("step_m", "must be a finite number > 0"));
        }
        if start_m < 0.0 {
            return Err(invalid("start_m", "must be >= 0"));
        }
        if end_m < start_m {
            return Err(invalid("end_m", "must be >= start_m"));
        }

        let range = Self {
            start_m,
            end_m,
            step_m,
        };
        // Checked in f64 so a huge span never reaches the usize cast.
        if range.whole_steps() >= MAX_SWEEP_POINTS as f64 {
            return Err(invalid("step_m", "too small for the range"));
        }
        Ok(range)
    }

    /// The reference sweep: 10, 20, ..., 150 m.
    pub fn reference() -> Self {
        Self {
            start_m: REFERENCE_HEAD_START_M,
            end_m: REFERENCE_HEAD_END_M,
            step_m: REFERENCE_HEAD_STEP_M,
        }
    }

    pub fn start_m(&self) -> f64 {
        self.start_m
    }

    pub fn end_m(&self) -> f64 {
        self.end_m
    }

    pub fn step_m(&self) -> f64 {
        self.step_m
    }

    /// Number of heads in the range.
    pub fn point_count(&self) -> usize {
        self.whole_steps() as usize + 1
    }

    /// Whole steps between start and end.
    fn whole_steps(&self) -> f64 {
        // Small slack so an end bound hit exactly by `start + n * step`
        // survives rounding in the division.
        let span = (self.end_m - self.start_m) / self.step_m;
        (span + 1e-9).floor()
    }

    /// Expands the range into ascending heads.
    ///
    /// Each value is computed as `start + i * step`, so no error accumulates
    /// along the range.
    pub fn values(&self) -> Vec<f64> {
        (0..self.point_count())
            .map(|i| self.start_m + i as f64 * self.step_m)
            .collect()
    }
}

impl Default for HeadRange {
    fn default() -> Self {
        Self::reference()
    }
}
