// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the SiteReport export engine.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a report entry, assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to stored binary image data, resolved through a
/// [`PhotoSource`](crate::photo::PhotoSource).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(pub String);

impl From<&str> for PhotoRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value type of a report column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Number,
    Photo,
}

/// One column of the report. Column order is grid column order and flow
/// table row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(default)]
    pub is_photo: bool,
}

impl ColumnSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
            is_photo: false,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Number,
            is_photo: false,
        }
    }

    pub fn photo(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Photo,
            is_photo: true,
        }
    }
}

/// A scalar field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Text rendering used by the flow renderer and for text cells.
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A single report entry. Immutable for the duration of an export pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
    #[serde(default)]
    pub photo_ref: Option<PhotoRef>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
            photo_ref: None,
        }
    }

    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    pub fn with_photo(mut self, photo_ref: impl Into<PhotoRef>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }

    pub fn field(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }
}

/// The full export request. Produced by the caller, never mutated by the
/// engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportRequest {
    pub title: String,
    pub project_name: String,
    pub date: String,
    pub description: String,
    pub attendee_list: String,
    pub logo_image_ref: Option<PhotoRef>,
    pub columns: Vec<ColumnSpec>,
    pub records: Vec<Record>,
}

impl ExportRequest {
    /// The photo column and its position within `columns`, if any.
    pub fn photo_column(&self) -> Option<(usize, &ColumnSpec)> {
        self.columns.iter().enumerate().find(|(_, col)| col.is_photo)
    }

    /// Columns that carry scalar values, in request order.
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|col| !col.is_photo)
    }
}

/// Target document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Spreadsheet package produced by the grid renderer.
    Xlsx,
    /// Paginated document produced by the flow renderer.
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Upper bound on individually listed issues.
pub const MAX_ISSUES: usize = 20;

/// Bounded, human-readable issue log returned alongside every export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub format: ExportFormat,
    pub requested_count: usize,
    pub exported_count: usize,
    pub issues: Vec<String>,
    /// Failures beyond [`MAX_ISSUES`] that were counted but not listed.
    pub suppressed_issues: usize,
}

impl Diagnostics {
    pub fn new(format: ExportFormat, requested_count: usize) -> Self {
        Self {
            format,
            requested_count,
            exported_count: 0,
            issues: Vec::new(),
            suppressed_issues: 0,
        }
    }

    /// Record an issue; beyond the cap only the counter grows.
    pub fn push_issue(&mut self, message: impl Into<String>) {
        if self.issues.len() < MAX_ISSUES {
            self.issues.push(message.into());
        } else {
            self.suppressed_issues += 1;
        }
    }

    /// Total number of warnings, listed or not.
    pub fn warning_count(&self) -> usize {
        self.issues.len() + self.suppressed_issues
    }

    /// Post-export summary line for the caller's UI.
    pub fn summary(&self) -> String {
        format!(
            "{} von {} Einträgen exportiert, {} Warnungen",
            self.exported_count,
            self.requested_count,
            self.warning_count()
        )
    }
}

/// Output of one export pass.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub filename: String,
    pub payload: Vec<u8>,
    pub diagnostics: Diagnostics,
}

impl ExportResult {
    /// Base64 form of the payload, as handed to storage and share targets.
    pub fn payload_base64(&self) -> String {
        STANDARD.encode(&self.payload)
    }

    pub fn mime_type(&self) -> &'static str {
        self.diagnostics.format.mime_type()
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (mm_to_pt(w as f32), mm_to_pt(h as f32))
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_are_capped() {
        let mut diag = Diagnostics::new(ExportFormat::Xlsx, 30);
        for i in 0..25 {
            diag.push_issue(format!("issue {i}"));
        }
        assert_eq!(diag.issues.len(), MAX_ISSUES);
        assert_eq!(diag.suppressed_issues, 5);
        assert_eq!(diag.warning_count(), 25);
        assert_eq!(diag.issues[0], "issue 0");
    }

    #[test]
    fn summary_mentions_counts() {
        let mut diag = Diagnostics::new(ExportFormat::Pdf, 3);
        diag.exported_count = 2;
        diag.push_issue("Eintrag 2: kaputt");
        assert_eq!(diag.summary(), "2 von 3 Einträgen exportiert, 1 Warnungen");
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let json = r#"{
            "title": "Begehung",
            "projectName": "Neubau Nord",
            "columns": [
                {"name": "Note", "type": "text"},
                {"name": "Menge", "type": "number"},
                {"name": "Photo", "type": "photo", "isPhoto": true}
            ],
            "records": [
                {"id": "r1", "fields": {"Note": "Riss", "Menge": 3}, "photoRef": "p1"}
            ]
        }"#;
        let req: ExportRequest = serde_json::from_str(json).expect("parse");
        assert_eq!(req.project_name, "Neubau Nord");
        assert_eq!(req.photo_column().map(|(i, _)| i), Some(2));
        assert_eq!(req.value_columns().count(), 2);
        let record = &req.records[0];
        assert_eq!(record.field("Menge"), Some(&FieldValue::Number(3.0)));
        assert_eq!(record.photo_ref, Some(PhotoRef::from("p1")));
    }

    #[test]
    fn a4_in_points() {
        let (w, h) = PaperSize::A4.dimensions_pt();
        assert!((w - 595.28).abs() < 0.01);
        assert!((h - 841.89).abs() < 0.01);
    }

    #[test]
    fn format_parsing_and_mime() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
        assert!(ExportFormat::Xlsx.mime_type().contains("spreadsheetml"));
        assert!("docx".parse::<ExportFormat>().is_err());
    }
}
