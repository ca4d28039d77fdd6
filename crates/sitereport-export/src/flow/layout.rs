// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flow layout: word wrapping, analytic card measurement, and look-ahead
// pagination. All lengths are PDF points with the origin at the bottom-left.

use sitereport_core::FlowConfig;

use super::metrics::{Face, text_width};
use crate::units::fit_scale;

/// Gap between the label and value columns.
const COLUMN_GUTTER: f32 = 8.0;
/// Horizontal text padding inside a table cell, both sides together.
const CELL_TEXT_PADDING: f32 = 6.0;
/// Vertical padding added to each table row.
const ROW_PADDING: f32 = 6.0;
/// Space between the title and the metadata lines in the header.
const TITLE_GAP: f32 = 6.0;

/// Page and column geometry derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub block_width: f32,
    pub label_width: f32,
    pub value_width: f32,
}

impl FlowGeometry {
    pub fn new(config: &FlowConfig) -> Self {
        let (page_width, page_height) = config.paper_size.dimensions_pt();
        let block_width = page_width - config.margin * 2.0;
        let label_width = block_width * config.label_share;
        Self {
            page_width,
            page_height,
            margin: config.margin,
            block_width,
            label_width,
            value_width: block_width - label_width - COLUMN_GUTTER,
        }
    }

    /// Top of the content area on a page without the header.
    pub fn content_top(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Height available to cards on a page without the header.
    pub fn usable_height(&self) -> f32 {
        self.page_height - self.margin * 2.0
    }
}

/// Greedy word wrap measured against the Helvetica metrics.
///
/// Whitespace runs collapse to single spaces. A word wider than `max_width`
/// is kept whole on its own line. Empty input yields `[empty_marker]`.
pub fn wrap_text(text: &str, max_width: f32, face: Face, size: f32, empty_marker: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if text_width(&candidate, face, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(empty_marker.to_string());
    }
    lines
}

/// Height of the page-one header block's content (title plus metadata
/// lines, or the logo if taller), excluding padding.
pub fn header_content_height(config: &FlowConfig, metadata_lines: usize, logo_height: f32) -> f32 {
    let text_height = metadata_lines as f32 * config.line_height + config.title_font_size + TITLE_GAP;
    text_height.max(logo_height)
}

/// One wrapped label/value row of a card table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label_lines: Vec<String>,
    pub value_lines: Vec<String>,
    pub height: f32,
}

/// What occupies the image region of a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageRegion {
    /// A photo drawn at the given size.
    Photo { width: f32, height: f32 },
    /// Bordered box with the "no photo" caption.
    Placeholder,
    /// No photo column: the region only holds the badge.
    BadgeOnly,
}

/// Drawn size of a `px_w` x `px_h` photo fitted into the block width and the
/// configured maximum image height. Never upscales.
pub fn photo_size(px_w: u32, px_h: u32, geometry: &FlowGeometry, config: &FlowConfig) -> (f32, f32) {
    let scale = fit_scale(
        px_w as f64,
        px_h as f64,
        geometry.block_width as f64,
        config.image_max_height as f64,
    ) as f32;
    (px_w as f32 * scale, px_h as f32 * scale)
}

impl ImageRegion {
    pub fn height(&self, config: &FlowConfig) -> f32 {
        match self {
            Self::Photo { height, .. } => *height,
            Self::Placeholder => config.placeholder_height,
            Self::BadgeOnly => config.badge_height,
        }
    }
}

/// Analytic size of one card, computed before anything is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct CardMetrics {
    pub image: ImageRegion,
    pub rows: Vec<TableRow>,
    pub table_height: f32,
}

impl CardMetrics {
    /// Wrap every label/value pair and total the table height.
    pub fn measure(
        image: ImageRegion,
        pairs: &[(String, String)],
        geometry: &FlowGeometry,
        config: &FlowConfig,
        empty_marker: &str,
    ) -> Self {
        let size = config.body_font_size;
        let rows: Vec<TableRow> = pairs
            .iter()
            .map(|(label, value)| {
                let label_lines = wrap_text(
                    label,
                    geometry.label_width - CELL_TEXT_PADDING,
                    Face::Bold,
                    size,
                    empty_marker,
                );
                let value_lines = wrap_text(
                    value,
                    geometry.value_width - CELL_TEXT_PADDING,
                    Face::Regular,
                    size,
                    empty_marker,
                );
                let line_count = label_lines.len().max(value_lines.len());
                TableRow {
                    label_lines,
                    value_lines,
                    height: line_count as f32 * config.line_height + ROW_PADDING,
                }
            })
            .collect();
        let table_height = rows.iter().map(|r| r.height).sum();
        Self {
            image,
            rows,
            table_height,
        }
    }

    /// Height of the drawn card.
    pub fn card_height(&self, config: &FlowConfig) -> f32 {
        self.image.height(config) + config.table_gap + self.table_height + config.card_padding * 2.0
    }

    /// Vertical space the card consumes, including the gap below it.
    pub fn block_height(&self, config: &FlowConfig) -> f32 {
        self.card_height(config) + config.block_gap
    }
}

/// Position assigned to a card by [`paginate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub page: usize,
    /// Y coordinate of the card's top edge.
    pub top: f32,
}

/// Assign each block to a page, breaking before any block that would cross
/// `bottom`.
///
/// `first_cursor` is where content starts on page 0 (below the header);
/// later pages start at `page_top`. A block taller than a whole page is
/// placed at the top of a fresh page rather than split.
pub fn paginate(first_cursor: f32, page_top: f32, bottom: f32, heights: &[f32]) -> Vec<Slot> {
    let mut page = 0;
    let mut cursor = first_cursor;
    let mut fresh = first_cursor >= page_top;

    heights
        .iter()
        .map(|height| {
            if cursor - height < bottom && !fresh {
                page += 1;
                cursor = page_top;
            }
            let slot = Slot { page, top: cursor };
            cursor -= height;
            fresh = false;
            slot
        })
        .collect()
}
