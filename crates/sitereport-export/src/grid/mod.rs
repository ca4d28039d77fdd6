// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid renderer: lays out a report as an XLSX worksheet using
// `rust_xlsxwriter`.
//
// Sheet structure (0-based rows):
//   0..=4  metadata block, merged across all columns, logo top-right
//   5      spacer
//   6      column header row ("No." + column names)
//   7..    one row per record, uniform height, photo centred in its cell
//
// Rendering runs in two passes over the records: a sizing pass that decodes
// every photo and tracks the largest dimensions, and a layout pass that
// writes the cells and embeds the photos at the uniform cell size.

pub mod layout;

use rust_xlsxwriter::{
    Color, DocProperties, Format, FormatAlign, FormatBorder, FormatPattern, Image,
    ObjectMovement, Workbook, Worksheet, XlsxError,
};
use sitereport_core::error::{Result, SiteReportError};
use sitereport_core::{
    ColumnKind, Diagnostics, ExportConfig, ExportFormat, ExportRequest, FieldValue, PhotoSource,
    Record,
};
use tracing::{debug, info, instrument, warn};

use crate::RenderedDocument;
use crate::image::{ImageCache, ImageMeta, decode_image};
use crate::units::{col_units_to_pixels, fit_scale, pixels_to_row_units, row_units_to_pixels};
use layout::{PhotoCell, column_anchor, place_in_cell, uniform_photo_cell};

const METADATA_LAST_ROW: u32 = 4;
const SPACER_ROW: u32 = 5;
const HEADER_ROW: u32 = 6;
const FIRST_DATA_ROW: u32 = 7;
/// Baseline height of the first metadata row, in points.
const METADATA_BASE_ROW_HEIGHT: f64 = 18.0;
const METADATA_LINES: f64 = 5.0;
/// Excel's per-cell text limit, in characters.
const MAX_CELL_CHARS: usize = 32_767;

const BORDER_COLOR: u32 = 0xE5E7EB;
const METADATA_FILL: u32 = 0xF3F4F6;
const METADATA_TEXT: u32 = 0x111827;
const HEADER_FILL: u32 = 0x1F2937;

/// Renders an [`ExportRequest`] into an XLSX workbook.
pub struct GridRenderer<'a> {
    config: &'a ExportConfig,
}

/// Cell formats used across the sheet. Every format carries the thin
/// border so the whole table rectangle is outlined.
struct GridFormats {
    metadata: Format,
    title_run: Format,
    label_run: Format,
    value_run: Format,
    header: Format,
    text: Format,
    number: Format,
    photo: Format,
    blank: Format,
}

impl GridFormats {
    fn new() -> Self {
        let bordered = Format::new()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(BORDER_COLOR));
        let run = Format::new()
            .set_font_name("Calibri")
            .set_font_color(Color::RGB(METADATA_TEXT));

        Self {
            metadata: bordered
                .clone()
                .set_font_name("Calibri")
                .set_font_size(11)
                .set_font_color(Color::RGB(METADATA_TEXT))
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(METADATA_FILL))
                .set_align(FormatAlign::Top)
                .set_align(FormatAlign::Left)
                .set_text_wrap(),
            title_run: run.clone().set_bold().set_font_size(14),
            label_run: run.clone().set_bold().set_font_size(11),
            value_run: run.set_font_size(11),
            header: bordered
                .clone()
                .set_bold()
                .set_font_color(Color::White)
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            text: bordered
                .clone()
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            number: bordered
                .clone()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            photo: bordered
                .clone()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            blank: bordered,
        }
    }
}

impl<'a> GridRenderer<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Render the request. Photo failures degrade the affected row only; the
    /// row is still written with an empty photo cell. Over-long text is
    /// shortened to the cell limit and reported.
    ///
    /// A request without a photo column yields no issues as long as its logo
    /// (if any) loads and no text needs shortening. An unusable logo is
    /// reported once and left out.
    #[instrument(skip_all, fields(records = request.records.len(), columns = request.columns.len()))]
    pub fn render(
        &self,
        request: &ExportRequest,
        source: &dyn PhotoSource,
        cache: &mut ImageCache,
    ) -> Result<RenderedDocument> {
        let grid = &self.config.grid;
        let mut diagnostics = Diagnostics::new(ExportFormat::Xlsx, request.records.len());

        // -- Pass 1: sizing ---------------------------------------------------
        let (max_w, max_h) = self.measure_photos(request, source, cache, &mut diagnostics);
        let cell = uniform_photo_cell(max_w, max_h, grid);
        info!(
            max_w,
            max_h,
            col_width = cell.col_width,
            row_height = cell.row_height,
            "Uniform photo cell computed"
        );

        // -- Pass 2: layout ---------------------------------------------------
        let formats = GridFormats::new();
        let mut workbook = Workbook::new();
        let title = non_empty(&request.title, &self.config.labels.default_title);
        let properties = DocProperties::new()
            .set_title(title)
            .set_author(&grid.creator);
        workbook.set_properties(&properties);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&grid.sheet_name).map_err(sheet_err)?;

        let column_widths = self.column_widths(request, &cell);
        for (col, width) in column_widths.iter().enumerate() {
            worksheet
                .set_column_width(col as u16, *width)
                .map_err(sheet_err)?;
        }

        self.write_metadata(worksheet, request, &formats, column_widths.len(), &mut diagnostics)?;
        self.place_logo(worksheet, request, source, &column_widths, &mut diagnostics)?;
        self.write_header_row(worksheet, request, &formats)?;
        self.write_records(worksheet, request, cache, &cell, &formats, &mut diagnostics)?;

        // Grid export never drops rows.
        diagnostics.exported_count = request.records.len();

        let bytes = workbook.save_to_buffer().map_err(|err| {
            SiteReportError::Serialization(format!("failed to write workbook: {}", err))
        })?;
        info!(
            bytes = bytes.len(),
            rows = request.records.len(),
            issues = diagnostics.warning_count(),
            "Workbook serialized"
        );

        Ok(RenderedDocument { bytes, diagnostics })
    }

    /// Decode every photo once and return the largest width and height seen.
    fn measure_photos(
        &self,
        request: &ExportRequest,
        source: &dyn PhotoSource,
        cache: &mut ImageCache,
        diagnostics: &mut Diagnostics,
    ) -> (u32, u32) {
        if request.photo_column().is_none() {
            return (0, 0);
        }

        let mut max_w = 0u32;
        let mut max_h = 0u32;
        for (idx, record) in request.records.iter().enumerate() {
            let Some(photo_ref) = &record.photo_ref else {
                continue;
            };
            match cache.prepare(&record.id, photo_ref, source) {
                Ok(meta) => {
                    max_w = max_w.max(meta.width);
                    max_h = max_h.max(meta.height);
                }
                Err(err) => {
                    warn!(entry = idx + 1, error = %err, "Photo left out of grid row");
                    diagnostics.push_issue(format!(
                        "Eintrag {}: Bild konnte nicht vorbereitet werden ({}).",
                        idx + 1,
                        err
                    ));
                }
            }
        }
        (max_w, max_h)
    }

    /// Column widths in column units: running number, then each column.
    fn column_widths(&self, request: &ExportRequest, cell: &PhotoCell) -> Vec<f64> {
        let grid = &self.config.grid;
        std::iter::once(grid.number_column_width)
            .chain(request.columns.iter().map(|col| {
                if col.is_photo {
                    cell.col_width
                } else {
                    grid.text_column_width
                }
            }))
            .collect()
    }

    fn write_metadata(
        &self,
        worksheet: &mut Worksheet,
        request: &ExportRequest,
        formats: &GridFormats,
        total_cols: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let labels = &self.config.labels;
        let last_col = (total_cols - 1) as u16;

        worksheet
            .merge_range(0, 0, METADATA_LAST_ROW, last_col, "", &formats.metadata)
            .map_err(sheet_err)?;

        let empty = labels.empty_value.as_str();
        let lines = [
            (format!("{}: ", labels.project), non_empty(&request.project_name, empty)),
            (format!("{}: ", labels.date), non_empty(&request.date, empty)),
            (format!("{}: ", labels.description), non_empty(&request.description, empty)),
            (format!("{}: ", labels.attendees), non_empty(&request.attendee_list, empty)),
        ];

        // The whole rich string shares one cell, so values draw from a
        // common budget in reading order.
        let fixed: usize = lines.iter().map(|(label, _)| label.chars().count() + 1).sum();
        let mut budget = MAX_CELL_CHARS.saturating_sub(fixed);
        let raw_title = non_empty(&request.title, empty);
        let mut shortened: Vec<&str> = Vec::new();
        let mut kept: Vec<&str> = Vec::with_capacity(lines.len() + 1);
        let names = std::iter::once("Titel").chain(lines.iter().map(|(label, _)| label.as_str()));
        let values = std::iter::once(raw_title).chain(lines.iter().map(|(_, value)| *value));
        for (name, value) in names.zip(values) {
            let (text, cut) = clamp_chars(value, budget);
            if cut {
                shortened.push(name.trim_end_matches([':', ' ']));
            }
            budget -= text.chars().count();
            kept.push(text);
        }
        let title = kept[0];

        // Blank runs are rejected by the writer.
        let mut runs: Vec<(&Format, &str)> = Vec::new();
        if !title.is_empty() {
            runs.push((&formats.title_run, title));
        }
        for ((label, _), value) in lines.iter().zip(&kept[1..]) {
            if !runs.is_empty() {
                runs.push((&formats.value_run, "\n"));
            }
            runs.push((&formats.label_run, label.as_str()));
            if !value.is_empty() {
                runs.push((&formats.value_run, *value));
            }
        }
        if !shortened.is_empty() {
            warn!(fields = ?shortened, "Metadata shortened to the cell limit");
            diagnostics.push_issue(format!(
                "Kopfbereich: {} auf {} Zeichen gekürzt.",
                shortened.join(", "),
                MAX_CELL_CHARS
            ));
        }
        worksheet
            .write_rich_string_with_format(0, 0, &runs, &formats.metadata)
            .map_err(sheet_err)?;

        for col in 0..=last_col {
            worksheet
                .write_blank(SPACER_ROW, col, &formats.blank)
                .map_err(sheet_err)?;
        }
        Ok(())
    }

    /// Size the first metadata row and anchor the logo at its top-right.
    fn place_logo(
        &self,
        worksheet: &mut Worksheet,
        request: &ExportRequest,
        source: &dyn PhotoSource,
        column_widths: &[f64],
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let grid = &self.config.grid;
        let text_height_px = METADATA_LINES * grid.metadata_line_height_px + grid.metadata_padding_px;
        let mut content_height_px = text_height_px;

        let logo = match (&request.logo_image_ref, self.config.embed_logo) {
            (Some(logo_ref), true) => match source.load(logo_ref).and_then(|b| decode_image(&b)) {
                Ok(meta) => Some(meta),
                Err(err) => {
                    warn!(error = %err, "Logo skipped");
                    diagnostics.push_issue(format!("Logo konnte nicht geladen werden ({}).", err));
                    None
                }
            },
            _ => None,
        };

        if let Some(meta) = logo {
            let scale = fit_scale(
                meta.width as f64,
                meta.height as f64,
                grid.logo_max_width_px,
                grid.logo_max_height_px,
            );
            let draw_w = (meta.width as f64 * scale).max(1.0);
            let draw_h = (meta.height as f64 * scale).max(1.0);
            content_height_px = content_height_px.max(draw_h + grid.logo_margin_px * 2.0);

            let widths_px: Vec<f64> = column_widths.iter().map(|w| col_units_to_pixels(*w)).collect();
            let total_px: f64 = widths_px.iter().sum();
            let logo_x = (total_px - draw_w - grid.logo_margin_px).max(0.0);
            let (col, offset_x) = column_anchor(logo_x, &widths_px);

            match self.logo_image(&meta, draw_w, draw_h) {
                Ok(image) => {
                    let inserted = worksheet.insert_image_with_offset(
                        0,
                        col,
                        &image,
                        offset_x,
                        grid.logo_margin_px as u32,
                    );
                    match inserted {
                        Ok(_) => debug!(col, offset_x, draw_w, draw_h, "Logo anchored"),
                        Err(err) => diagnostics
                            .push_issue(format!("Logo konnte nicht eingebettet werden ({}).", err)),
                    }
                }
                Err(err) => {
                    diagnostics.push_issue(format!("Logo konnte nicht eingebettet werden ({}).", err));
                }
            }
        }

        let row_height = METADATA_BASE_ROW_HEIGHT.max(pixels_to_row_units(content_height_px));
        worksheet.set_row_height(0, row_height).map_err(sheet_err)?;
        Ok(())
    }

    fn logo_image(&self, meta: &ImageMeta, draw_w: f64, draw_h: f64) -> Result<Image> {
        let image = Image::new_from_buffer(&meta.encoded)
            .map_err(|err| SiteReportError::Embed(err.to_string()))?
            .set_scale_to_size(draw_w, draw_h, false)
            .set_object_movement(ObjectMovement::MoveButDontSizeWithCells)
            .set_alt_text("Logo");
        Ok(image)
    }

    fn write_header_row(
        &self,
        worksheet: &mut Worksheet,
        request: &ExportRequest,
        formats: &GridFormats,
    ) -> Result<()> {
        worksheet
            .write_string_with_format(
                HEADER_ROW,
                0,
                self.config.labels.number_header.as_str(),
                &formats.header,
            )
            .map_err(sheet_err)?;
        for (idx, col) in request.columns.iter().enumerate() {
            let (name, cut) = clamp_chars(&col.name, MAX_CELL_CHARS);
            if cut {
                warn!(column = idx + 1, "Column name shortened to the cell limit");
            }
            worksheet
                .write_string_with_format(HEADER_ROW, (idx + 1) as u16, name, &formats.header)
                .map_err(sheet_err)?;
        }
        worksheet
            .set_row_height(HEADER_ROW, self.config.grid.header_row_height)
            .map_err(sheet_err)?;
        Ok(())
    }

    fn write_records(
        &self,
        worksheet: &mut Worksheet,
        request: &ExportRequest,
        cache: &ImageCache,
        cell: &PhotoCell,
        formats: &GridFormats,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        for (idx, record) in request.records.iter().enumerate() {
            let row = FIRST_DATA_ROW + idx as u32;
            worksheet.set_row_height(row, cell.row_height).map_err(sheet_err)?;
            worksheet
                .write_number_with_format(row, 0, (idx + 1) as f64, &formats.number)
                .map_err(sheet_err)?;

            for (col_idx, column) in request.columns.iter().enumerate() {
                let col = (col_idx + 1) as u16;
                if column.is_photo {
                    worksheet
                        .write_blank(row, col, &formats.photo)
                        .map_err(sheet_err)?;
                    continue;
                }
                let format = match column.kind {
                    ColumnKind::Number => &formats.number,
                    _ => &formats.text,
                };
                if write_field(worksheet, row, col, record, &column.name, format)? {
                    warn!(entry = idx + 1, column = %column.name, "Text shortened to the cell limit");
                    diagnostics.push_issue(format!(
                        "Eintrag {}: Text in Spalte \"{}\" auf {} Zeichen gekürzt.",
                        idx + 1,
                        column.name,
                        MAX_CELL_CHARS
                    ));
                }
            }

            let Some((photo_idx, _)) = request.photo_column() else {
                continue;
            };
            // Failed decodes were reported during sizing.
            if let Some(meta) = cache.get(&record.id) {
                let col = (photo_idx + 1) as u16;
                if let Err(err) = self.embed_photo(worksheet, row, col, meta, cell) {
                    warn!(entry = idx + 1, error = %err, "Photo embedding failed");
                    diagnostics.push_issue(format!(
                        "Eintrag {}: Bild konnte nicht eingebettet werden ({}).",
                        idx + 1,
                        err
                    ));
                }
            }
        }
        Ok(())
    }

    fn embed_photo(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        meta: &ImageMeta,
        cell: &PhotoCell,
    ) -> Result<()> {
        let placed = place_in_cell(meta.width, meta.height, cell, &self.config.grid);
        let image = Image::new_from_buffer(&meta.encoded)
            .map_err(|err| SiteReportError::Embed(err.to_string()))?
            .set_scale_to_size(placed.width_px, placed.height_px, false)
            .set_object_movement(ObjectMovement::MoveButDontSizeWithCells);
        worksheet
            .insert_image_with_offset(row, col, &image, placed.offset_x_px, placed.offset_y_px)
            .map_err(|err| SiteReportError::Embed(err.to_string()))?;
        debug!(
            row,
            width = placed.width_px,
            height = placed.height_px,
            inset_x = placed.inset_x,
            inset_y = placed.inset_y,
            cell_h = row_units_to_pixels(cell.row_height),
            "Photo embedded"
        );
        Ok(())
    }
}

/// Write one field cell. Returns whether the text had to be shortened.
fn write_field(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    record: &Record,
    column: &str,
    format: &Format,
) -> Result<bool> {
    let mut shortened = false;
    match record.field(column) {
        Some(FieldValue::Number(n)) => worksheet.write_number_with_format(row, col, *n, format),
        Some(FieldValue::Text(s)) if !s.is_empty() => {
            let (text, cut) = clamp_chars(s, MAX_CELL_CHARS);
            shortened = cut;
            worksheet.write_string_with_format(row, col, text, format)
        }
        _ => worksheet.write_blank(row, col, format),
    }
    .map_err(sheet_err)?;
    Ok(shortened)
}

/// Longest prefix of `text` with at most `max` characters, and whether
/// anything was cut.
fn clamp_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((end, _)) => (&text[..end], true),
        None => (text, false),
    }
}

fn non_empty<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    if value.trim().is_empty() { fallback } else { value }
}

fn sheet_err(err: XlsxError) -> SiteReportError {
    SiteReportError::Serialization(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{corrupt_second_photo, png, text_only};
    use sitereport_core::{MemoryPhotoStore, PhotoRef};

    fn render(request: &ExportRequest, store: &MemoryPhotoStore) -> RenderedDocument {
        let config = ExportConfig::default();
        let mut cache = ImageCache::new();
        GridRenderer::new(&config)
            .render(request, store, &mut cache)
            .expect("render workbook")
    }

    /// Zip entry names are stored uncompressed, so a byte search finds them.
    fn has_entry(bytes: &[u8], name: &str) -> bool {
        bytes.windows(name.len()).any(|w| w == name.as_bytes())
    }

    /// Inflate one part of the saved workbook.
    fn read_part(bytes: &[u8], name: &str) -> String {
        use std::io::Read;

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("open zip");
        let mut part = archive.by_name(name).expect("workbook part");
        let mut xml = String::new();
        part.read_to_string(&mut xml).expect("read part");
        xml
    }

    #[test]
    fn corrupt_photo_keeps_row_and_reports_once() {
        let (request, store) = corrupt_second_photo();
        let doc = render(&request, &store);

        assert!(doc.bytes.starts_with(b"PK"));
        assert_eq!(doc.diagnostics.requested_count, 3);
        assert_eq!(doc.diagnostics.exported_count, 3);
        assert_eq!(doc.diagnostics.issues.len(), 1);
        assert!(doc.diagnostics.issues[0].starts_with("Eintrag 2:"));

        assert!(has_entry(&doc.bytes, "xl/media/image1"));
        assert!(has_entry(&doc.bytes, "xl/media/image2"));
        assert!(!has_entry(&doc.bytes, "xl/media/image3"));
    }

    #[test]
    fn text_only_workbook_embeds_nothing() {
        let doc = render(&text_only(3), &MemoryPhotoStore::new());

        assert_eq!(doc.diagnostics.exported_count, 3);
        assert!(doc.diagnostics.issues.is_empty());
        assert!(!has_entry(&doc.bytes, "xl/media"));
    }

    #[test]
    fn empty_request_writes_header_only() {
        let doc = render(&ExportRequest::default(), &MemoryPhotoStore::new());
        assert!(doc.bytes.starts_with(b"PK"));
        assert_eq!(doc.diagnostics.exported_count, 0);
        assert!(doc.diagnostics.issues.is_empty());
    }

    #[test]
    fn valid_logo_is_embedded() {
        let mut request = text_only(1);
        request.logo_image_ref = Some(PhotoRef::from("logo"));
        let mut store = MemoryPhotoStore::new();
        store.insert("logo", png(300, 120));

        let doc = render(&request, &store);
        assert!(doc.diagnostics.issues.is_empty());
        assert!(has_entry(&doc.bytes, "xl/media/image1"));
    }

    #[test]
    fn broken_logo_is_reported_and_omitted() {
        let mut request = text_only(1);
        request.logo_image_ref = Some(PhotoRef::from("logo"));
        let mut store = MemoryPhotoStore::new();
        store.insert("logo", b"GIF89a but not really".to_vec());

        let doc = render(&request, &store);
        assert_eq!(doc.diagnostics.exported_count, 1);
        assert_eq!(doc.diagnostics.issues.len(), 1);
        assert!(doc.diagnostics.issues[0].starts_with("Logo"));
        assert!(!has_entry(&doc.bytes, "xl/media"));
    }

    #[test]
    fn logo_is_skipped_when_disabled() {
        let mut request = text_only(1);
        request.logo_image_ref = Some(PhotoRef::from("logo"));
        let mut config = ExportConfig::default();
        config.embed_logo = false;
        let mut cache = ImageCache::new();

        let doc = GridRenderer::new(&config)
            .render(&request, &MemoryPhotoStore::new(), &mut cache)
            .expect("render workbook");
        assert!(doc.diagnostics.issues.is_empty());
    }

    #[test]
    fn column_widths_follow_column_kinds() {
        let config = ExportConfig::default();
        let renderer = GridRenderer::new(&config);
        let (request, _) = corrupt_second_photo();
        let cell = uniform_photo_cell(640, 600, &config.grid);

        let widths = renderer.column_widths(&request, &cell);
        assert_eq!(widths.len(), 3);
        assert_eq!(widths[0], config.grid.number_column_width);
        assert_eq!(widths[1], config.grid.text_column_width);
        assert_eq!(widths[2], cell.col_width);
    }

    #[test]
    fn workbook_author_is_recorded() {
        let doc = render(&text_only(1), &MemoryPhotoStore::new());
        let core = read_part(&doc.bytes, "docProps/core.xml");
        assert!(core.contains("SiteReport"), "core.xml: {core}");
        assert!(core.contains("Notizen"));
    }

    #[test]
    fn blank_empty_marker_does_not_abort() {
        let mut config = ExportConfig::default();
        config.labels.empty_value = String::new();
        config.validate().expect("config is valid");

        // Description and attendees are blank, so their runs are empty.
        let mut request = text_only(2);
        request.title = String::new();
        let mut cache = ImageCache::new();
        let doc = GridRenderer::new(&config)
            .render(&request, &MemoryPhotoStore::new(), &mut cache)
            .expect("render workbook");

        assert_eq!(doc.diagnostics.exported_count, 2);
        assert!(doc.diagnostics.issues.is_empty());
    }

    #[test]
    fn overlong_field_is_shortened_and_reported() {
        let mut request = text_only(3);
        request.records[1]
            .fields
            .insert("Note".into(), FieldValue::Text("x".repeat(40_000)));

        let doc = render(&request, &MemoryPhotoStore::new());
        assert_eq!(doc.diagnostics.exported_count, 3);
        assert_eq!(doc.diagnostics.issues.len(), 1);
        assert!(doc.diagnostics.issues[0].starts_with("Eintrag 2:"));
        assert!(doc.diagnostics.issues[0].contains("gekürzt"));

        let strings = read_part(&doc.bytes, "xl/sharedStrings.xml");
        assert!(strings.contains(&"x".repeat(MAX_CELL_CHARS)));
        assert!(!strings.contains(&"x".repeat(MAX_CELL_CHARS + 1)));
    }

    #[test]
    fn overlong_metadata_is_shortened_and_reported() {
        let mut request = text_only(1);
        request.description = "y".repeat(40_000);

        let doc = render(&request, &MemoryPhotoStore::new());
        assert_eq!(doc.diagnostics.exported_count, 1);
        assert_eq!(doc.diagnostics.issues.len(), 1);
        assert!(doc.diagnostics.issues[0].starts_with("Kopfbereich: Beschreibung"));
    }

    #[test]
    fn clamp_counts_characters_not_bytes() {
        assert_eq!(clamp_chars("äöü", 2), ("äö", true));
        assert_eq!(clamp_chars("äöü", 3), ("äöü", false));
        assert_eq!(clamp_chars("", 0), ("", false));
    }
}
