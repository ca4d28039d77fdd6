// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::PaperSize;
use crate::error::{Result, SiteReportError};

/// Settings shared by both renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub grid: GridConfig,
    pub flow: FlowConfig,
    pub labels: ExportLabels,
    /// Place the request's logo in the document header.
    pub embed_logo: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            flow: FlowConfig::default(),
            labels: ExportLabels::default(),
            embed_logo: true,
        }
    }
}

impl ExportConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!(path = %path.as_ref().display(), "Export configuration loaded");
        Ok(config)
    }

    /// Reject settings the renderers cannot lay out.
    pub fn validate(&self) -> Result<()> {
        let g = &self.grid;
        if g.min_cell_width_px <= 0.0 || g.min_cell_height_px <= 0.0 {
            return Err(SiteReportError::Config(
                "minimum photo cell size must be positive".into(),
            ));
        }
        if g.min_cell_width_px > g.max_cell_width_px || g.min_cell_height_px > g.max_cell_height_px
        {
            return Err(SiteReportError::Config(
                "minimum photo cell size exceeds maximum".into(),
            ));
        }
        // The column width unit is 7px wide; a narrower window cannot be hit.
        if g.max_cell_width_px - g.min_cell_width_px < 7.0 {
            return Err(SiteReportError::Config(
                "photo cell width range must span at least 7px".into(),
            ));
        }
        if g.max_cell_height_px - g.min_cell_height_px < 2.0 {
            return Err(SiteReportError::Config(
                "photo cell height range must span at least 2px".into(),
            ));
        }

        let f = &self.flow;
        if !(0.1..=0.9).contains(&f.label_share) {
            return Err(SiteReportError::Config(
                "label column share must be between 0.1 and 0.9".into(),
            ));
        }
        let (page_w, page_h) = f.paper_size.dimensions_pt();
        if f.margin * 2.0 >= page_w.min(page_h) {
            return Err(SiteReportError::Config(
                "page margins leave no printable area".into(),
            ));
        }
        Ok(())
    }
}

/// Grid (spreadsheet) renderer settings. Lengths are in pixels unless the
/// name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub min_cell_width_px: f64,
    pub min_cell_height_px: f64,
    pub max_cell_width_px: f64,
    pub max_cell_height_px: f64,
    pub logo_max_width_px: f64,
    pub logo_max_height_px: f64,
    pub logo_margin_px: f64,
    /// Width of the running-number column, in column width units.
    pub number_column_width: f64,
    /// Width of text and number columns, in column width units.
    pub text_column_width: f64,
    /// Height of the column header row, in points.
    pub header_row_height: f64,
    pub metadata_line_height_px: f64,
    pub metadata_padding_px: f64,
    pub sheet_name: String,
    pub creator: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_cell_width_px: 160.0,
            min_cell_height_px: 110.0,
            max_cell_width_px: 360.0,
            max_cell_height_px: 260.0,
            logo_max_width_px: 140.0,
            logo_max_height_px: 70.0,
            logo_margin_px: 8.0,
            number_column_width: 6.0,
            text_column_width: 22.0,
            header_row_height: 22.0,
            metadata_line_height_px: 18.0,
            metadata_padding_px: 16.0,
            sheet_name: "Protokoll".into(),
            creator: "SiteReport".into(),
        }
    }
}

/// Flow (paginated document) renderer settings, in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub paper_size: PaperSize,
    pub margin: f32,
    pub line_height: f32,
    pub body_font_size: f32,
    pub title_font_size: f32,
    pub header_gap: f32,
    pub header_padding: f32,
    pub block_gap: f32,
    pub image_max_height: f32,
    pub placeholder_height: f32,
    pub table_gap: f32,
    pub card_padding: f32,
    /// Fraction of the block width given to the label column.
    pub label_share: f32,
    pub badge_height: f32,
    pub badge_padding: f32,
    pub badge_font_size: f32,
    pub logo_max_width: f32,
    pub logo_max_height: f32,
    /// Render a placeholder instead of skipping the card when a photo
    /// cannot be decoded.
    pub placeholder_on_decode_failure: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin: 36.0,
            line_height: 14.0,
            body_font_size: 11.0,
            title_font_size: 16.0,
            header_gap: 18.0,
            header_padding: 14.0,
            block_gap: 20.0,
            image_max_height: 260.0,
            placeholder_height: 170.0,
            table_gap: 12.0,
            card_padding: 12.0,
            label_share: 0.35,
            badge_height: 18.0,
            badge_padding: 8.0,
            badge_font_size: 10.0,
            logo_max_width: 120.0,
            logo_max_height: 60.0,
            placeholder_on_decode_failure: false,
        }
    }
}

/// User-visible strings placed into the documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportLabels {
    pub default_title: String,
    pub project: String,
    pub date: String,
    pub description: String,
    pub attendees: String,
    pub number_header: String,
    pub badge_prefix: String,
    pub no_photo: String,
    pub empty_value: String,
    pub default_filename: String,
}

impl Default for ExportLabels {
    fn default() -> Self {
        Self {
            default_title: "Protokoll".into(),
            project: "Projekt".into(),
            date: "Datum".into(),
            description: "Beschreibung".into(),
            attendees: "Anwesende Personen".into(),
            number_header: "No.".into(),
            badge_prefix: "Bild".into(),
            no_photo: "Kein Bild vorhanden".into(),
            empty_value: "—".into(),
            default_filename: "protokoll".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ExportConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn inverted_cell_bounds_rejected() {
        let mut config = ExportConfig::default();
        config.grid.min_cell_width_px = 400.0;
        assert!(matches!(
            config.validate(),
            Err(SiteReportError::Config(_))
        ));
    }

    #[test]
    fn partial_json_takes_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"embed_logo": false, "flow": {"margin": 48.0}}"#,
        )
        .expect("write");

        let config = ExportConfig::load(&path).expect("load");
        assert!(!config.embed_logo);
        assert_eq!(config.flow.margin, 48.0);
        assert_eq!(config.flow.line_height, 14.0);
        assert_eq!(config.grid.max_cell_width_px, 360.0);
        assert_eq!(config.labels.badge_prefix, "Bild");
    }
}
