// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flow renderer: lays out a report as a paginated PDF using `printpdf` 0.8.
//
// Page one opens with a header block (title, metadata lines, logo). Every
// record then becomes a self-contained card: photo (or placeholder), a
// numbered badge, and a wrapped label/value table. Cards are measured before
// drawing and a page break is inserted ahead of any card that would cross the
// bottom margin, so no card is ever split.

pub mod canvas;
pub mod layout;
pub mod metrics;

use printpdf::{
    Mm, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, RawImageData, RawImageFormat,
    XObjectId,
};
use sitereport_core::error::{Result, SiteReportError};
use sitereport_core::{
    Diagnostics, ExportConfig, ExportFormat, ExportRequest, PhotoRef, PhotoSource, Record,
};
use tracing::{debug, info, instrument, warn};

use crate::RenderedDocument;
use crate::image::{ImageCache, ImageMeta, decode_image};
use crate::units::fit_scale;
use canvas::{Canvas, rgb};
use layout::{CardMetrics, FlowGeometry, ImageRegion, header_content_height, paginate, photo_size};
use metrics::{Face, text_width};

/// Resolution photos are resampled to before embedding.
const EMBED_DPI: f32 = 150.0;
/// Height of the accent bar along the top of the header block.
const ACCENT_BAR: f32 = 4.0;
/// Extra space below the title before the metadata lines.
const TITLE_SPACING: f32 = 8.0;
/// Indent of the placeholder caption inside its box.
const CAPTION_INDENT: f32 = 12.0;
/// Text padding inside table cells and the label/value divider offset.
const CELL_PADDING: f32 = 4.0;

/// An image that has been added to the document's resources.
struct Embedded {
    id: XObjectId,
    px_w: u32,
    px_h: u32,
}

/// A fully measured card, ready to draw.
struct Card {
    index: usize,
    metrics: CardMetrics,
    photo: Option<Embedded>,
}

/// Logo placed in the page-one header.
struct HeaderLogo {
    image: Embedded,
    width: f32,
    height: f32,
}

/// Renders an [`ExportRequest`] into a paginated PDF.
pub struct FlowRenderer<'a> {
    config: &'a ExportConfig,
}

impl<'a> FlowRenderer<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Render the request. A record whose card cannot be composed is left
    /// out of the document and reported; the rest of the batch continues.
    ///
    /// A request without a photo column yields no issues as long as its logo
    /// (if any) loads. An unusable logo is reported once and left out.
    #[instrument(skip_all, fields(records = request.records.len(), columns = request.columns.len()))]
    pub fn render(
        &self,
        request: &ExportRequest,
        source: &dyn PhotoSource,
        cache: &mut ImageCache,
    ) -> Result<RenderedDocument> {
        let flow = &self.config.flow;
        let geometry = FlowGeometry::new(flow);
        let mut diagnostics = Diagnostics::new(ExportFormat::Pdf, request.records.len());

        let title = non_empty(&request.title, &self.config.labels.default_title);
        let mut doc = PdfDocument::new(title);

        let logo = self.load_logo(&mut doc, request, source, &mut diagnostics);

        let mut cards = Vec::with_capacity(request.records.len());
        for (index, record) in request.records.iter().enumerate() {
            match self.compose_card(&mut doc, index, record, request, source, cache, &geometry, &mut diagnostics) {
                Ok(card) => cards.push(card),
                Err(err) => {
                    warn!(entry = index + 1, error = %err, "Card skipped");
                    diagnostics.push_issue(format!(
                        "Eintrag {}: PDF-Block konnte nicht erstellt werden ({}).",
                        index + 1,
                        err
                    ));
                }
            }
        }
        diagnostics.exported_count = cards.len();

        let mut pages = vec![Canvas::new()];
        let first_cursor = self.draw_header(&mut pages[0], request, logo.as_ref(), &geometry);

        let heights: Vec<f32> = cards.iter().map(|c| c.metrics.block_height(flow)).collect();
        let slots = paginate(first_cursor, geometry.content_top(), geometry.margin, &heights);
        for (card, slot) in cards.iter().zip(&slots) {
            let height = card.metrics.card_height(flow);
            if slot.top - height < geometry.margin {
                warn!(entry = card.index + 1, height, "Card taller than a page; placed at page top");
            }
            while pages.len() <= slot.page {
                pages.push(Canvas::new());
            }
            self.draw_card(&mut pages[slot.page], card, slot.top, &geometry);
        }

        let page_count = pages.len();
        let (w_mm, h_mm) = flow.paper_size.dimensions_mm();
        let pdf_pages: Vec<PdfPage> = pages
            .into_iter()
            .map(|canvas| PdfPage::new(Mm(w_mm as f32), Mm(h_mm as f32), canvas.into_ops()))
            .collect();
        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if bytes.is_empty() {
            return Err(SiteReportError::Serialization(
                "PDF writer produced no output".into(),
            ));
        }
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "PDF writer reported warnings");
        }

        info!(
            pages = page_count,
            cards = diagnostics.exported_count,
            issues = diagnostics.warning_count(),
            bytes = bytes.len(),
            "PDF serialized"
        );
        Ok(RenderedDocument { bytes, diagnostics })
    }

    fn load_logo(
        &self,
        doc: &mut PdfDocument,
        request: &ExportRequest,
        source: &dyn PhotoSource,
        diagnostics: &mut Diagnostics,
    ) -> Option<HeaderLogo> {
        let logo_ref = request.logo_image_ref.as_ref().filter(|_| self.config.embed_logo)?;
        let flow = &self.config.flow;

        let loaded = source
            .load(logo_ref)
            .and_then(|bytes| decode_image(&bytes))
            .and_then(|meta| {
                let scale = fit_scale(
                    meta.width as f64,
                    meta.height as f64,
                    flow.logo_max_width as f64,
                    flow.logo_max_height as f64,
                ) as f32;
                let width = meta.width as f32 * scale;
                let height = meta.height as f32 * scale;
                let image = embed(doc, &meta, width, height)?;
                Ok(HeaderLogo {
                    image,
                    width,
                    height,
                })
            });

        match loaded {
            Ok(logo) => Some(logo),
            Err(err) => {
                warn!(error = %err, "Logo skipped");
                diagnostics.push_issue(format!("Logo konnte nicht eingebettet werden ({}).", err));
                None
            }
        }
    }

    /// Measure a record's card and embed its photo. Nothing is drawn yet.
    #[allow(clippy::too_many_arguments)]
    fn compose_card(
        &self,
        doc: &mut PdfDocument,
        index: usize,
        record: &Record,
        request: &ExportRequest,
        source: &dyn PhotoSource,
        cache: &mut ImageCache,
        geometry: &FlowGeometry,
        diagnostics: &mut Diagnostics,
    ) -> Result<Card> {
        let flow = &self.config.flow;

        let (region, photo) = match (request.photo_column(), &record.photo_ref) {
            (None, _) => (ImageRegion::BadgeOnly, None),
            (Some(_), None) => (ImageRegion::Placeholder, None),
            (Some(_), Some(photo_ref)) => {
                match self.embed_photo(doc, record, photo_ref, source, cache, geometry) {
                    Ok((region, embedded)) => (region, Some(embedded)),
                    Err(err) if flow.placeholder_on_decode_failure => {
                        warn!(entry = index + 1, error = %err, "Photo replaced by placeholder");
                        diagnostics.push_issue(format!(
                            "Eintrag {}: Bild konnte nicht eingebettet werden ({}).",
                            index + 1,
                            err
                        ));
                        (ImageRegion::Placeholder, None)
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        let pairs: Vec<(String, String)> = request
            .value_columns()
            .map(|col| {
                let value = record.field(&col.name).map(|v| v.display()).unwrap_or_default();
                (col.name.clone(), value)
            })
            .collect();
        let metrics = CardMetrics::measure(region, &pairs, geometry, flow, &self.config.labels.empty_value);
        debug!(
            entry = index + 1,
            height = metrics.card_height(flow),
            rows = metrics.rows.len(),
            "Card measured"
        );

        Ok(Card {
            index,
            metrics,
            photo,
        })
    }

    fn embed_photo(
        &self,
        doc: &mut PdfDocument,
        record: &Record,
        photo_ref: &PhotoRef,
        source: &dyn PhotoSource,
        cache: &mut ImageCache,
        geometry: &FlowGeometry,
    ) -> Result<(ImageRegion, Embedded)> {
        let meta = cache.prepare(&record.id, photo_ref, source)?;
        let (width, height) = photo_size(meta.width, meta.height, geometry, &self.config.flow);
        let embedded = embed(doc, meta, width, height)?;
        Ok((ImageRegion::Photo { width, height }, embedded))
    }

    /// Draw the page-one header and return the cursor below it.
    fn draw_header(
        &self,
        canvas: &mut Canvas,
        request: &ExportRequest,
        logo: Option<&HeaderLogo>,
        geometry: &FlowGeometry,
    ) -> f32 {
        let flow = &self.config.flow;
        let labels = &self.config.labels;
        let palette = Palette::new();

        let lines = [
            format!("{}: {}", labels.project, request.project_name),
            format!("{}: {}", labels.date, request.date),
            format!("{}: {}", labels.description, request.description),
            format!("{}: {}", labels.attendees, request.attendee_list),
        ];
        let logo_height = logo.map(|l| l.height).unwrap_or(0.0);
        let content = header_content_height(flow, lines.len(), logo_height);
        let box_height = content + flow.header_padding * 2.0;

        let left = geometry.margin;
        let top = geometry.content_top();
        let bottom = top - box_height;

        canvas.rect(
            left,
            bottom,
            geometry.block_width,
            box_height,
            Some(&palette.soft_bg),
            Some(&palette.soft_border),
        );
        canvas.rect(
            left,
            top - ACCENT_BAR,
            geometry.block_width,
            ACCENT_BAR,
            Some(&palette.accent),
            None,
        );

        let title = non_empty(&request.title, &labels.default_title);
        let mut text_y = top - flow.header_padding - flow.title_font_size;
        canvas.text(
            title,
            left + flow.header_padding,
            text_y,
            flow.title_font_size,
            Face::Bold,
            &palette.accent,
        );
        text_y -= TITLE_SPACING;
        for line in &lines {
            text_y -= flow.line_height;
            canvas.text(
                line,
                left + flow.header_padding,
                text_y,
                flow.body_font_size,
                Face::Regular,
                &palette.ink,
            );
        }

        if let Some(logo) = logo {
            let x = geometry.page_width - geometry.margin - flow.header_padding - logo.width;
            let y = top - flow.header_padding - logo.height;
            canvas.image(
                &logo.image.id,
                x,
                y,
                logo.width,
                logo.height,
                logo.image.px_w,
                logo.image.px_h,
            );
        }

        bottom - flow.header_gap
    }

    fn draw_card(&self, canvas: &mut Canvas, card: &Card, top: f32, geometry: &FlowGeometry) {
        let flow = &self.config.flow;
        let labels = &self.config.labels;
        let palette = Palette::new();
        let pad = flow.card_padding;
        let left = geometry.margin;
        let width = geometry.block_width;
        let metrics = &card.metrics;

        let card_height = metrics.card_height(flow);
        canvas.rect(
            left,
            top - card_height,
            width,
            card_height,
            Some(&palette.soft_bg),
            Some(&palette.soft_border),
        );

        // -- Image region ------------------------------------------------------
        let image_height = metrics.image.height(flow);
        let image_y = top - pad - image_height;
        match (metrics.image, &card.photo) {
            (ImageRegion::Photo { width: w, height: h }, Some(photo)) => {
                let image_x = left + pad + (width - pad * 2.0 - w) / 2.0;
                canvas.image(&photo.id, image_x, image_y, w, h, photo.px_w, photo.px_h);
            }
            (ImageRegion::Placeholder, _) => {
                canvas.rect(
                    left + pad,
                    image_y,
                    width - pad * 2.0,
                    image_height,
                    None,
                    Some(&palette.soft_border),
                );
                canvas.text(
                    &labels.no_photo,
                    left + pad + CAPTION_INDENT,
                    image_y + image_height / 2.0 - 6.0,
                    flow.body_font_size,
                    Face::Regular,
                    &palette.muted,
                );
            }
            _ => {}
        }

        // -- Badge (drawn over the image) --------------------------------------
        let badge_text = format!("{} {}", labels.badge_prefix, card.index + 1);
        let badge_width = (width - pad * 2.0)
            .min(text_width(&badge_text, Face::Bold, flow.badge_font_size) + flow.badge_padding * 2.0);
        let badge_x = left + pad;
        let badge_y = top - pad - flow.badge_height;
        canvas.rect(
            badge_x,
            badge_y,
            badge_width,
            flow.badge_height,
            Some(&palette.accent),
            None,
        );
        canvas.text(
            &badge_text,
            badge_x + flow.badge_padding,
            badge_y + 4.0,
            flow.badge_font_size,
            Face::Bold,
            &palette.white,
        );

        // -- Label/value table -------------------------------------------------
        let table_left = left + pad;
        let table_right = left + width - pad;
        let divider_x = table_left + geometry.label_width + CELL_PADDING;
        let table_start = image_y - flow.table_gap;
        let mut row_top = table_start;

        canvas.line(table_left, row_top, table_right, row_top, &palette.soft_border);
        for (idx, row) in metrics.rows.iter().enumerate() {
            let row_bottom = row_top - row.height;
            if idx % 2 == 1 {
                canvas.rect(
                    table_left,
                    row_bottom,
                    table_right - table_left,
                    row.height,
                    Some(&palette.row_alt),
                    None,
                );
            }

            let first_baseline = row_top - flow.line_height;
            for (i, line) in row.label_lines.iter().enumerate() {
                canvas.text(
                    line,
                    table_left + CELL_PADDING,
                    first_baseline - i as f32 * flow.line_height,
                    flow.body_font_size,
                    Face::Bold,
                    &palette.ink,
                );
            }
            for (i, line) in row.value_lines.iter().enumerate() {
                canvas.text(
                    line,
                    divider_x + CELL_PADDING,
                    first_baseline - i as f32 * flow.line_height,
                    flow.body_font_size,
                    Face::Regular,
                    &palette.ink,
                );
            }

            canvas.line(table_left, row_bottom, table_right, row_bottom, &palette.soft_border);
            row_top = row_bottom;
        }
        if !metrics.rows.is_empty() {
            canvas.line(
                divider_x,
                table_start,
                divider_x,
                table_start - metrics.table_height,
                &palette.soft_border,
            );
        }
    }
}

/// Colours of the flow document.
struct Palette {
    accent: printpdf::Color,
    soft_border: printpdf::Color,
    soft_bg: printpdf::Color,
    row_alt: printpdf::Color,
    ink: printpdf::Color,
    muted: printpdf::Color,
    white: printpdf::Color,
}

impl Palette {
    fn new() -> Self {
        Self {
            accent: rgb(0.17, 0.24, 0.35),
            soft_border: rgb(0.86, 0.88, 0.9),
            soft_bg: rgb(0.97, 0.98, 0.99),
            row_alt: rgb(0.96, 0.97, 0.98),
            ink: rgb(0.1, 0.1, 0.1),
            muted: rgb(0.45, 0.47, 0.5),
            white: rgb(1.0, 1.0, 1.0),
        }
    }
}

/// Decode `meta`, resample it to the drawn size at [`EMBED_DPI`] (never
/// upscaling), and add it to the document.
fn embed(doc: &mut PdfDocument, meta: &ImageMeta, draw_w: f32, draw_h: f32) -> Result<Embedded> {
    let mut pixels = meta.decode_pixels()?;
    let target_w = (draw_w * EMBED_DPI / 72.0).ceil().max(1.0) as u32;
    let target_h = (draw_h * EMBED_DPI / 72.0).ceil().max(1.0) as u32;
    if target_w < pixels.width() || target_h < pixels.height() {
        pixels = pixels.resize(target_w, target_h, ::image::imageops::FilterType::Triangle);
    }

    let rgb_image = pixels.to_rgb8();
    let (px_w, px_h) = (rgb_image.width(), rgb_image.height());
    let raw = RawImage {
        pixels: RawImageData::U8(rgb_image.into_raw()),
        width: px_w as usize,
        height: px_h as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let id = doc.add_image(&raw);
    Ok(Embedded { id, px_w, px_h })
}

fn non_empty<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    if value.trim().is_empty() { fallback } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{corrupt_second_photo, jpeg, png, text_only};
    use sitereport_core::{ColumnSpec, MemoryPhotoStore};

    fn render(config: &ExportConfig, request: &ExportRequest, store: &MemoryPhotoStore) -> RenderedDocument {
        let mut cache = ImageCache::new();
        FlowRenderer::new(config)
            .render(request, store, &mut cache)
            .expect("render PDF")
    }

    fn page_count(bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(bytes)
            .expect("parse PDF")
            .get_pages()
            .len()
    }

    #[test]
    fn corrupt_photo_skips_its_card() {
        let (request, store) = corrupt_second_photo();
        let doc = render(&ExportConfig::default(), &request, &store);

        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.diagnostics.requested_count, 3);
        assert_eq!(doc.diagnostics.exported_count, 2);
        assert_eq!(doc.diagnostics.issues.len(), 1);
        assert!(doc.diagnostics.issues[0].contains("Eintrag 2"));
        assert!(page_count(&doc.bytes) >= 1);
    }

    #[test]
    fn corrupt_photo_becomes_placeholder_when_configured() {
        let (request, store) = corrupt_second_photo();
        let mut config = ExportConfig::default();
        config.flow.placeholder_on_decode_failure = true;
        let doc = render(&config, &request, &store);

        assert_eq!(doc.diagnostics.exported_count, 3);
        assert_eq!(doc.diagnostics.issues.len(), 1);
        assert!(doc.diagnostics.issues[0].contains("Eintrag 2"));
    }

    #[test]
    fn text_only_request_has_no_issues() {
        let request = text_only(4);
        let doc = render(&ExportConfig::default(), &request, &MemoryPhotoStore::new());

        assert_eq!(doc.diagnostics.exported_count, 4);
        assert!(doc.diagnostics.issues.is_empty());
        assert_eq!(page_count(&doc.bytes), 1);
    }

    #[test]
    fn empty_request_still_yields_header_page() {
        let doc = render(
            &ExportConfig::default(),
            &ExportRequest::default(),
            &MemoryPhotoStore::new(),
        );
        assert_eq!(doc.diagnostics.exported_count, 0);
        assert_eq!(page_count(&doc.bytes), 1);
    }

    #[test]
    fn cards_break_onto_new_pages() {
        // Each card is 316pt tall plus a 20pt gap. One fits below the
        // header on page 1, two fit on every later page.
        let mut store = MemoryPhotoStore::new();
        let mut request = ExportRequest {
            title: "Begehung".into(),
            project_name: "Hof".into(),
            columns: vec![ColumnSpec::text("Note"), ColumnSpec::photo("Photo")],
            ..ExportRequest::default()
        };
        for i in 0..5 {
            let key = format!("p{i}");
            store.insert(key.as_str(), jpeg(800, 600));
            request.records.push(
                Record::new(format!("r{i}"))
                    .with_field("Note", "kurz")
                    .with_photo(key.as_str()),
            );
        }

        let doc = render(&ExportConfig::default(), &request, &store);
        assert_eq!(doc.diagnostics.exported_count, 5);
        assert!(doc.diagnostics.issues.is_empty());
        assert_eq!(page_count(&doc.bytes), 3);
    }

    #[test]
    fn missing_photo_ref_draws_placeholder_without_issue() {
        let request = ExportRequest {
            columns: vec![ColumnSpec::text("Note"), ColumnSpec::photo("Photo")],
            records: vec![Record::new("r1").with_field("Note", "ohne Bild")],
            ..ExportRequest::default()
        };
        let doc = render(&ExportConfig::default(), &request, &MemoryPhotoStore::new());
        assert_eq!(doc.diagnostics.exported_count, 1);
        assert!(doc.diagnostics.issues.is_empty());
    }

    #[test]
    fn broken_logo_is_reported_once() {
        let mut request = text_only(1);
        request.logo_image_ref = Some(PhotoRef::from("logo"));
        let mut store = MemoryPhotoStore::new();
        store.insert("logo", b"nope".to_vec());

        let doc = render(&ExportConfig::default(), &request, &store);
        assert_eq!(doc.diagnostics.exported_count, 1);
        assert_eq!(doc.diagnostics.issues.len(), 1);
        assert!(doc.diagnostics.issues[0].starts_with("Logo"));
    }

    #[test]
    fn valid_logo_adds_no_issue() {
        let mut request = text_only(1);
        request.logo_image_ref = Some(PhotoRef::from("logo"));
        let mut store = MemoryPhotoStore::new();
        store.insert("logo", png(400, 100));

        let doc = render(&ExportConfig::default(), &request, &store);
        assert!(doc.diagnostics.issues.is_empty());
    }

    #[test]
    fn embed_downsamples_large_photos() {
        let meta = decode_image(&jpeg(3000, 2000)).expect("decode");
        let mut doc = PdfDocument::new("t");
        let embedded = embed(&mut doc, &meta, 300.0, 200.0).expect("embed");
        assert!(embedded.px_w <= 625);
        assert!(embedded.px_h <= 417);

        let small = decode_image(&png(40, 30)).expect("decode");
        let embedded = embed(&mut doc, &small, 300.0, 200.0).expect("embed");
        assert_eq!((embedded.px_w, embedded.px_h), (40, 30));
    }
}
