// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unit helpers: conversions between spreadsheet column/row units and pixels,
// plus aspect-preserving fit computation shared by both renderers.
//
// Column widths are measured in character units: one unit is a 7px digit
// cell plus 5px of padding. Row heights are measured in points at 96 DPI.

/// Pixel width of one column width unit.
pub const COLUMN_UNIT_PX: f64 = 7.0;
/// Fixed padding added to every column, in pixels.
pub const COLUMN_PADDING_PX: f64 = 5.0;
/// Pixels per row height point.
pub const ROW_PX_PER_UNIT: f64 = 96.0 / 72.0;

/// Column width units to pixels.
pub fn col_units_to_pixels(width: f64) -> f64 {
    width * COLUMN_UNIT_PX + COLUMN_PADDING_PX
}

/// Pixels to the nearest column width unit, never below 1.
pub fn pixels_to_col_units(px: f64) -> f64 {
    ((px - COLUMN_PADDING_PX) / COLUMN_UNIT_PX).round().max(1.0)
}

/// Row height points to pixels.
pub fn row_units_to_pixels(height: f64) -> f64 {
    height * ROW_PX_PER_UNIT
}

/// Pixels to the nearest row height point, never below 1.
pub fn pixels_to_row_units(px: f64) -> f64 {
    (px / ROW_PX_PER_UNIT).round().max(1.0)
}

/// Uniform scale that fits a `width` x `height` box inside
/// `max_width` x `max_height` without upscaling.
///
/// Degenerate (zero or non-finite) input dimensions yield 1.0.
pub fn fit_scale(width: f64, height: f64, max_width: f64, max_height: f64) -> f64 {
    if !(width > 0.0 && height > 0.0) {
        return 1.0;
    }
    let scale = (max_width / width).min(max_height / height).min(1.0);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
