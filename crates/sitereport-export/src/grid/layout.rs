// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid sizing: the uniform photo cell, image placement inside a cell, and
// logo anchoring. Pure functions over pixels and sheet units.

use sitereport_core::GridConfig;

use crate::units::{
    col_units_to_pixels, fit_scale, pixels_to_col_units, pixels_to_row_units,
    row_units_to_pixels,
};

/// Photo column width and data row height shared by every data row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoCell {
    /// Column width, in column width units.
    pub col_width: f64,
    /// Row height, in points.
    pub row_height: f64,
    /// Realised cell width in pixels.
    pub width_px: f64,
    /// Realised cell height in pixels.
    pub height_px: f64,
}

/// Compute the uniform photo cell from the largest photo dimensions of the
/// batch.
///
/// The largest photo is scaled down (never up) to fit the configured maximum
/// cell, then the cell is grown to the configured minimum. The result is
/// snapped to whole sheet units that stay inside `[min, max]`.
pub fn uniform_photo_cell(max_img_w: u32, max_img_h: u32, config: &GridConfig) -> PhotoCell {
    let (img_w, img_h) = (max_img_w as f64, max_img_h as f64);
    let scale = fit_scale(
        if img_w > 0.0 { img_w } else { config.max_cell_width_px },
        if img_h > 0.0 { img_h } else { config.max_cell_height_px },
        config.max_cell_width_px,
        config.max_cell_height_px,
    );

    let scaled_w = if img_w > 0.0 {
        (img_w * scale).round()
    } else {
        config.min_cell_width_px
    };
    let scaled_h = if img_h > 0.0 {
        (img_h * scale).round()
    } else {
        config.min_cell_height_px
    };

    let desired_w = scaled_w.clamp(config.min_cell_width_px, config.max_cell_width_px);
    let desired_h = scaled_h.clamp(config.min_cell_height_px, config.max_cell_height_px);

    let col_width = snap_units(
        desired_w,
        config.min_cell_width_px,
        config.max_cell_width_px,
        col_units_to_pixels,
        pixels_to_col_units,
    );
    let row_height = snap_units(
        desired_h,
        config.min_cell_height_px,
        config.max_cell_height_px,
        row_units_to_pixels,
        pixels_to_row_units,
    );

    PhotoCell {
        col_width,
        row_height,
        width_px: col_units_to_pixels(col_width),
        height_px: row_units_to_pixels(row_height),
    }
}

/// Nearest whole unit for `desired_px`, nudged so its pixel size stays
/// within `[min_px, max_px]`.
fn snap_units(
    desired_px: f64,
    min_px: f64,
    max_px: f64,
    to_px: fn(f64) -> f64,
    from_px: fn(f64) -> f64,
) -> f64 {
    let mut units = from_px(desired_px);
    while to_px(units) > max_px && units > 1.0 {
        units -= 1.0;
    }
    while to_px(units) < min_px {
        units += 1.0;
    }
    units
}

/// Where an embedded photo sits inside its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    pub width_px: f64,
    pub height_px: f64,
    /// Horizontal inset as a fraction of the cell width.
    pub inset_x: f64,
    /// Vertical inset as a fraction of the cell height.
    pub inset_y: f64,
    pub offset_x_px: u32,
    pub offset_y_px: u32,
}

/// Scale a photo into `cell`, preserving aspect ratio, and centre it.
///
/// Photos are only upscaled when they are smaller than the configured
/// minimum cell, and then only up to that minimum.
pub fn place_in_cell(img_w: u32, img_h: u32, cell: &PhotoCell, config: &GridConfig) -> CellPlacement {
    let w = (img_w as f64).max(1.0);
    let h = (img_h as f64).max(1.0);

    let fit = (cell.width_px / w).min(cell.height_px / h);
    let mut scale = if fit > 1.0 {
        let min_fill = (config.min_cell_width_px / w).min(config.min_cell_height_px / h);
        fit.min(min_fill.max(1.0))
    } else {
        fit
    };
    if !scale.is_finite() || scale <= 0.0 {
        scale = 1.0;
    }

    let width_px = (w * scale).max(1.0);
    let height_px = (h * scale).max(1.0);
    let inset_x = (1.0 - (width_px / cell.width_px).min(1.0)) / 2.0;
    let inset_y = (1.0 - (height_px / cell.height_px).min(1.0)) / 2.0;

    CellPlacement {
        width_px,
        height_px,
        inset_x,
        inset_y,
        offset_x_px: (inset_x * cell.width_px).round() as u32,
        offset_y_px: (inset_y * cell.height_px).round() as u32,
    }
}

/// Resolve a horizontal pixel position to a `(column, offset_px)` anchor.
///
/// Positions beyond the last column clamp to the start of the last column.
pub fn column_anchor(x_px: f64, column_widths_px: &[f64]) -> (u16, u32) {
    let mut remaining = x_px.max(0.0);
    for (idx, width) in column_widths_px.iter().enumerate() {
        if remaining <= *width {
            return (idx as u16, remaining.round() as u32);
        }
        remaining -= width;
    }
    (column_widths_px.len().saturating_sub(1) as u16, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_within_bounds(cell: &PhotoCell, config: &GridConfig) {
        assert!(
            cell.width_px >= config.min_cell_width_px && cell.width_px <= config.max_cell_width_px,
            "width {} out of bounds",
            cell.width_px
        );
        assert!(
            cell.height_px >= config.min_cell_height_px
                && cell.height_px <= config.max_cell_height_px,
            "height {} out of bounds",
            cell.height_px
        );
    }

    #[test]
    fn cell_stays_within_bounds_for_any_dimensions() {
        let config = GridConfig::default();
        let dims = [
            (0, 0),
            (1, 1),
            (0, 500),
            (500, 0),
            (10_000, 1),
            (1, 10_000),
            (160, 110),
            (360, 260),
            (4000, 3000),
            (361, 261),
            (u32::MAX, u32::MAX),
        ];
        for (w, h) in dims {
            let cell = uniform_photo_cell(w, h, &config);
            assert_within_bounds(&cell, &config);
        }
        for w in (0..2000).step_by(37) {
            for h in (0..2000).step_by(41) {
                assert_within_bounds(&uniform_photo_cell(w, h, &config), &config);
            }
        }
    }

    #[test]
    fn no_photos_gives_minimum_cell() {
        let config = GridConfig::default();
        let cell = uniform_photo_cell(0, 0, &config);
        // 160px snaps to 23 units (166px); 110px snaps to 83pt (110.67px).
        assert_eq!(cell.col_width, 23.0);
        assert_eq!(cell.row_height, 83.0);
    }

    #[test]
    fn large_photo_is_scaled_to_max_box() {
        let config = GridConfig::default();
        let cell = uniform_photo_cell(1600, 1200, &config);
        // scale = min(360/1600, 260/1200) = 0.21667 -> 347 x 260
        assert!((cell.width_px - 348.0).abs() <= 7.0);
        assert!(cell.height_px <= 260.0 && cell.height_px > 255.0);
    }

    #[test]
    fn placement_is_centred_and_fits() {
        let config = GridConfig::default();
        let cell = uniform_photo_cell(1600, 1200, &config);
        let placed = place_in_cell(1200, 1600, &cell, &config);
        assert!(placed.width_px <= cell.width_px + 1e-9);
        assert!(placed.height_px <= cell.height_px + 1e-9);
        assert!(placed.inset_x > 0.0);
        assert!(placed.inset_y.abs() < 1e-9);
        let right_gap = cell.width_px - placed.width_px - placed.offset_x_px as f64;
        assert!((right_gap - placed.offset_x_px as f64).abs() <= 1.0);
    }

    #[test]
    fn small_photo_upscales_only_to_minimum() {
        let config = GridConfig::default();
        // A big neighbour forces a large cell; a tiny photo must not blow up.
        let cell = uniform_photo_cell(3000, 2000, &config);
        let placed = place_in_cell(40, 20, &cell, &config);
        // min fill = min(160/40, 110/20) = 4 -> 160 x 80
        assert!((placed.width_px - 160.0).abs() < 1e-9);
        assert!((placed.height_px - 80.0).abs() < 1e-9);

        let medium = place_in_cell(200, 150, &cell, &config);
        assert_eq!((medium.width_px, medium.height_px), (200.0, 150.0));
    }

    #[test]
    fn anchor_walks_columns() {
        let widths = [47.0, 159.0, 166.0];
        assert_eq!(column_anchor(10.0, &widths), (0, 10));
        assert_eq!(column_anchor(100.0, &widths), (1, 53));
        assert_eq!(column_anchor(300.0, &widths), (2, 94));
        assert_eq!(column_anchor(10_000.0, &widths), (2, 0));
        assert_eq!(column_anchor(-5.0, &widths), (0, 0));
    }
}
