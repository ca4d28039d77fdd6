// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export orchestrator: picks the renderer for the requested format, owns the
// per-call image cache, and names the output file.

use chrono::NaiveDate;
use sitereport_core::error::Result;
use sitereport_core::{
    ExportConfig, ExportFormat, ExportRequest, ExportResult, ExportSink, PhotoSource, SinkReceipt,
};
use tracing::{info, instrument};

use crate::filename::build_filename;
use crate::flow::FlowRenderer;
use crate::grid::GridRenderer;
use crate::image::ImageCache;

/// Entry point for turning an [`ExportRequest`] into a finished document.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export using today's local date for a missing report date.
    pub fn export(
        &self,
        request: &ExportRequest,
        format: ExportFormat,
        source: &dyn PhotoSource,
    ) -> Result<ExportResult> {
        self.export_on(request, format, source, chrono::Local::now().date_naive())
    }

    /// Export with an explicit "today" for the filename fallback.
    ///
    /// Every call gets its own [`ImageCache`]; nothing decoded here outlives
    /// the call.
    #[instrument(skip(self, request, source), fields(records = request.records.len()))]
    pub fn export_on(
        &self,
        request: &ExportRequest,
        format: ExportFormat,
        source: &dyn PhotoSource,
        today: NaiveDate,
    ) -> Result<ExportResult> {
        let mut cache = ImageCache::new();
        let rendered = match format {
            ExportFormat::Xlsx => GridRenderer::new(&self.config).render(request, source, &mut cache)?,
            ExportFormat::Pdf => FlowRenderer::new(&self.config).render(request, source, &mut cache)?,
        };

        let filename = build_filename(
            &request.project_name,
            &request.date,
            today,
            format.extension(),
            &self.config.labels.default_filename,
        );
        info!(
            %filename,
            cached_photos = cache.len(),
            cache_hits = cache.hits(),
            summary = %rendered.diagnostics.summary(),
            "Export finished"
        );

        Ok(ExportResult {
            filename,
            payload: rendered.bytes,
            diagnostics: rendered.diagnostics,
        })
    }

    /// Export and hand the result to `sink`.
    pub fn export_to(
        &self,
        request: &ExportRequest,
        format: ExportFormat,
        source: &dyn PhotoSource,
        sink: &dyn ExportSink,
    ) -> Result<(ExportResult, SinkReceipt)> {
        let result = self.export(request, format, source)?;
        let receipt = sink.deliver(&result)?;
        info!(sink = sink.name(), locator = ?receipt.locator, "Export delivered");
        Ok((result, receipt))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::test_support::{corrupt_second_photo, text_only};
    use sitereport_core::{MemoryPhotoStore, SiteReportError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date")
    }

    /// Sink that remembers what it was given.
    #[derive(Default)]
    struct RecordingSink {
        delivered: RefCell<Vec<String>>,
        fail: bool,
    }

    impl ExportSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        fn deliver(&self, result: &ExportResult) -> Result<SinkReceipt> {
            if self.fail {
                return Err(SiteReportError::Sink("refused".into()));
            }
            self.delivered.borrow_mut().push(result.filename.clone());
            Ok(SinkReceipt {
                sink: self.name().to_string(),
                locator: Some(format!("mem://{}", result.filename)),
            })
        }
    }

    #[test]
    fn xlsx_export_keeps_every_row() {
        let (request, store) = corrupt_second_photo();
        let result = Exporter::default()
            .export_on(&request, ExportFormat::Xlsx, &store, today())
            .expect("export");

        assert_eq!(result.filename, "Neubau Nord_2026-03-14.xlsx");
        assert!(result.payload.starts_with(b"PK"));
        assert_eq!(result.diagnostics.exported_count, 3);
        assert_eq!(result.diagnostics.issues.len(), 1);
        assert_eq!(result.diagnostics.summary(), "3 von 3 Einträgen exportiert, 1 Warnungen");
        assert_eq!(
            result.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn pdf_export_drops_failed_card() {
        let (request, store) = corrupt_second_photo();
        let result = Exporter::default()
            .export_on(&request, ExportFormat::Pdf, &store, today())
            .expect("export");

        assert_eq!(result.filename, "Neubau Nord_2026-03-14.pdf");
        assert!(result.payload.starts_with(b"%PDF"));
        assert_eq!(result.diagnostics.exported_count, 2);
        assert_eq!(result.diagnostics.issues.len(), 1);
        assert_eq!(result.mime_type(), "application/pdf");
    }

    #[test]
    fn blank_project_uses_fallback_name() {
        let mut request = text_only(1);
        request.project_name = String::new();
        request.date = String::new();
        let result = Exporter::default()
            .export_on(&request, ExportFormat::Xlsx, &MemoryPhotoStore::new(), today())
            .expect("export");
        assert_eq!(result.filename, "protokoll_2026-05-01.xlsx");
    }

    #[test]
    fn payload_base64_is_non_empty() {
        let result = Exporter::default()
            .export_on(&text_only(2), ExportFormat::Pdf, &MemoryPhotoStore::new(), today())
            .expect("export");
        assert!(result.payload_base64().starts_with("JVBERi")); // "%PDF"
    }

    #[test]
    fn export_to_delivers_to_sink() {
        let sink = RecordingSink::default();
        let (result, receipt) = Exporter::default()
            .export_to(&text_only(1), ExportFormat::Xlsx, &MemoryPhotoStore::new(), &sink)
            .expect("deliver");

        assert_eq!(sink.delivered.borrow().as_slice(), [result.filename.clone()]);
        assert_eq!(receipt.sink, "recording");
        assert!(receipt.locator.is_some());
    }

    #[test]
    fn sink_failure_propagates() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let err = Exporter::default()
            .export_to(&text_only(1), ExportFormat::Pdf, &MemoryPhotoStore::new(), &sink)
            .expect_err("sink refuses");
        assert!(matches!(err, SiteReportError::Sink(_)));
    }
}
