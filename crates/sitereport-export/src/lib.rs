// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sitereport-export: Document export engine for SiteReport.
//
// Lays out a batch of report entries (text fields plus an optional photo)
// into two targets: a grid-based XLSX workbook and a flowed, paginated PDF.
// Both renderers share the unit helpers and the pass-scoped image cache.

pub mod exporter;
pub mod filename;
pub mod flow;
pub mod grid;
pub mod image;
pub mod units;

// Re-export the primary structs so callers can use `sitereport_export::Exporter` etc.
pub use exporter::Exporter;
pub use flow::FlowRenderer;
pub use grid::GridRenderer;
pub use image::{ImageCache, ImageKind, ImageMeta};

use sitereport_core::Diagnostics;

/// Serialized document plus the bookkeeping of the pass that produced it.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use sitereport_core::{ColumnSpec, ExportRequest, MemoryPhotoStore, Record};

    /// Encode a solid-colour image of the given size.
    pub fn solid_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 150])));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format)
            .expect("encode test image");
        buffer
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        solid_image(width, height, ImageFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        solid_image(width, height, ImageFormat::Jpeg)
    }

    /// Three entries with a "Note" text column and a "Photo" column; the
    /// second entry's photo blob is corrupt.
    pub fn corrupt_second_photo() -> (ExportRequest, MemoryPhotoStore) {
        let mut store = MemoryPhotoStore::new();
        store.insert("p1", png(640, 480));
        store.insert("p2", b"definitely not an image".to_vec());
        store.insert("p3", jpeg(300, 600));

        let request = ExportRequest {
            title: "Begehung".into(),
            project_name: "Neubau Nord".into(),
            date: "2026-03-14".into(),
            description: "Rohbauabnahme".into(),
            attendee_list: "A. Maier, B. Kurz".into(),
            logo_image_ref: None,
            columns: vec![ColumnSpec::text("Note"), ColumnSpec::photo("Photo")],
            records: vec![
                Record::new("r1").with_field("Note", "Riss im Putz").with_photo("p1"),
                Record::new("r2").with_field("Note", "Fenster fehlt").with_photo("p2"),
                Record::new("r3").with_field("Note", "Treppe ok").with_photo("p3"),
            ],
        };
        (request, store)
    }

    /// Text-only request with `count` entries.
    pub fn text_only(count: usize) -> ExportRequest {
        ExportRequest {
            title: "Notizen".into(),
            project_name: "Hof".into(),
            date: "2026-01-02".into(),
            columns: vec![ColumnSpec::text("Note"), ColumnSpec::number("Menge")],
            records: (0..count)
                .map(|i| {
                    Record::new(format!("r{i}").as_str())
                        .with_field("Note", format!("Eintrag {i}"))
                        .with_field("Menge", i as f64)
                        // Photo refs are ignored without a photo column.
                        .with_photo("missing")
                })
                .collect(),
            ..ExportRequest::default()
        }
    }
}
