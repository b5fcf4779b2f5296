//! Hydroelectric power estimator with a chat assistant and report export.

pub mod assistant;
pub mod cli;
pub mod config;
pub mod hydro;
pub mod io;
pub mod report;
pub mod telemetry;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "tui")]
pub mod tui;
