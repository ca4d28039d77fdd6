// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic share interface.

use sitereport_core::error::Result;

/// Default text accompanying a shared report.
pub const SHARE_TEXT: &str = "Baustellen-Protokoll";
/// Default title of the share dialog.
pub const SHARE_DIALOG_TITLE: &str = "Protokoll teilen";

/// Everything the OS share sheet needs to offer a saved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    /// Subject line; the export filename.
    pub title: String,
    pub text: String,
    /// Locator of the already-saved file.
    pub url: String,
    pub dialog_title: String,
    pub mime_type: String,
}

impl ShareRequest {
    pub fn new(title: impl Into<String>, url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: SHARE_TEXT.to_string(),
            url: url.into(),
            dialog_title: SHARE_DIALOG_TITLE.to_string(),
            mime_type: mime_type.into(),
        }
    }
}

/// Share content via the OS share sheet.
pub trait ShareTarget {
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;

    /// Present the share sheet for a saved file. Returns Ok(()) once the
    /// sheet was shown; the user may still dismiss it.
    fn share(&self, request: &ShareRequest) -> Result<()>;
}
