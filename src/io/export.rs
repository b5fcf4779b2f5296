//! CSV export for the power-versus-head curve.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::hydro::SweepResult;

/// Column header for curve CSV export.
pub const CURVE_HEADER: &str = "head_m,power_kw";

/// Exports a sweep to a CSV file at the given path.
///
/// Writes a header row followed by one data row per sweep point, in sweep
/// order. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `curve` - Sweep to export
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_curve_csv(curve: &SweepResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_curve_csv(curve, buf)
}

/// Writes a sweep as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_curve_csv(curve: &SweepResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(CURVE_HEADER.split(','))?;
    for p in curve {
        wtr.write_record(&[format!("{:.2}", p.head_m), format!("{:.5}", p.power_kw)])?;
    }

    wtr.flush()?;
    Ok(())
}
