// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Delivery interface for finished exports.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ExportResult;

/// Where a delivered export ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReceipt {
    /// Name of the sink that accepted the export.
    pub sink: String,
    /// Resource locator (path or URI) of the delivered file, if the sink
    /// produced one.
    pub locator: Option<String>,
}

/// Final destination of an export: download, device storage, or share
/// target. Platform-specific implementations are chosen by the caller.
pub trait ExportSink {
    /// Short name used in logs and receipts.
    fn name(&self) -> &str;

    /// Hand the finished export to the destination.
    fn deliver(&self, result: &ExportResult) -> Result<SinkReceipt>;
}
