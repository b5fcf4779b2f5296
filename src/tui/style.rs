//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Power curve line color.
pub const CURVE_COLOR: Color = Color::Cyan;
/// Current operating point marker.
pub const MARKER_COLOR: Color = Color::Yellow;
/// Selected sidebar field.
pub const SELECTED_FG: Color = Color::Black;
pub const SELECTED_BG: Color = Color::Cyan;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::Blue;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Status line color.
pub const STATUS_FG: Color = Color::Magenta;
/// Speaker labels in the conversation panel.
pub const USER_FG: Color = Color::Green;
pub const ASSISTANT_FG: Color = Color::Cyan;

/// Computes Y-axis bounds from chart data points with 10% headroom.
///
/// Power is never negative, so the lower bound is pinned at zero.
pub fn auto_bounds_y(series: &[(f64, f64)]) -> [f64; 2] {
    let max = series
        .iter()
        .map(|&(_, y)| y)
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return [0.0, 1.0];
    }
    [0.0, max * 1.1]
}

/// X-axis bounds spanning every point, at least one unit wide.
pub fn auto_bounds_x(series: &[(f64, f64)]) -> [f64; 2] {
    let lo = series.iter().map(|&(x, _)| x).fold(f64::INFINITY, f64::min);
    let hi = series
        .iter()
        .map(|&(x, _)| x)
        .fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    [lo, hi.max(lo + 1.0)]
}
