//! File export helpers.

pub mod export;
