//! Physical constants and fixed model parameters.

/// Gravitational acceleration (m/s^2).
pub const GRAVITY_M_S2: f64 = 9.81;

/// Density of water (kg/m^3).
pub const WATER_DENSITY_KG_M3: f64 = 1000.0;

/// Liters per cubic meter, used to convert l/s inputs to m^3/s.
pub const LITERS_PER_M3: f64 = 1000.0;

/// Watts per kilowatt.
pub const WATTS_PER_KW: f64 = 1000.0;

/// Efficiency applied to a single-point estimate when none is configured.
pub const DEFAULT_EFFICIENCY: f64 = 0.7;

/// Efficiency used by the head sweep.
///
/// The curve is illustrative, so it stays at this value even when the
/// plant's own estimate uses a different configured efficiency.
pub const DEFAULT_SWEEP_EFFICIENCY: f64 = 0.7;

// -- Reference sweep range --

/// First head value of the reference sweep (m).
pub const REFERENCE_HEAD_START_M: f64 = 10.0;

/// Last head value of the reference sweep, inclusive (m).
pub const REFERENCE_HEAD_END_M: f64 = 150.0;

/// Spacing between reference sweep points (m).
pub const REFERENCE_HEAD_STEP_M: f64 = 10.0;

// -- Sidebar defaults --

/// Default average flow rate (l/s).
pub const DEFAULT_FLOW_RATE_LPS: f64 = 50.0;

/// Default available gross head (m).
pub const DEFAULT_HEAD_M: f64 = 80.0;

/// Default network loss (%).
pub const DEFAULT_LOSS_PERCENT: f64 = 18.0;

/// Default current piezometric head (m).
pub const DEFAULT_PIEZOMETRIC_HEAD_M: f64 = 120.0;
