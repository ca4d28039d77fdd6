// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SiteReport: Core types, configuration, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod photo;
pub mod sink;
pub mod types;

pub use config::{ExportConfig, ExportLabels, FlowConfig, GridConfig};
pub use error::SiteReportError;
pub use photo::{DirPhotoStore, MemoryPhotoStore, PhotoSource};
pub use sink::{ExportSink, SinkReceipt};
pub use types::*;
