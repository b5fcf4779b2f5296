//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use hydrogpt::hydro::{HeadRange, PlantParameters};

/// Power for the default plant (50 l/s, 80 m, 18% loss, eta 0.7), in kW.
pub const REFERENCE_POWER_KW: f64 = 22.523_76;

/// Default plant (flow 50 l/s, head 80 m, loss 18%, piezometric 120 m).
pub fn reference_plant() -> PlantParameters {
    PlantParameters::default()
}

/// Reference sweep: 10 to 150 m in 10 m steps.
pub fn reference_range() -> HeadRange {
    HeadRange::reference()
}

/// Asserts `actual` is within `tol` of `expected`.
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}

/// Per-test scratch path under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hydrogpt-{}-{name}", std::process::id()))
}
