//! Power formula, parameter validation and head sweeps.

pub mod constants;
pub mod estimator;
pub mod types;

pub use estimator::{HeadRange, PowerEstimator};
pub use types::{ParameterError, PlantParameters, PowerEstimate, SweepPoint, SweepResult};
