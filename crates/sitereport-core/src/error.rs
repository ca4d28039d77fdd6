// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for SiteReport.

use thiserror::Error;

/// Top-level error type for all SiteReport operations.
#[derive(Debug, Error)]
pub enum SiteReportError {
    // -- Per-record image errors (caught at the record boundary) --
    #[error("image could not be decoded: {0}")]
    Decode(String),

    #[error("image could not be embedded: {0}")]
    Embed(String),

    #[error("photo not found: {0}")]
    PhotoNotFound(String),

    // -- Document errors --
    #[error("layout overflow: {0}")]
    LayoutOverflow(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -- Delivery --
    #[error("sink delivery failed: {0}")]
    Sink(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl SiteReportError {
    /// Whether the error concerns a single record's photo and must be
    /// recorded as a diagnostic instead of aborting the export.
    pub fn is_record_scoped(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Embed(_) | Self::PhotoNotFound(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SiteReportError>;
