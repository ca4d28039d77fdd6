// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The three delivery sinks.

use std::path::{Path, PathBuf};

use sitereport_core::error::{Result, SiteReportError};
use sitereport_core::{ExportResult, ExportSink, SinkReceipt};
use tracing::{info, instrument};

use crate::data_dir;
use crate::traits::{ShareRequest, ShareTarget};

/// Folder below the documents directory that holds device-storage exports.
pub const STORAGE_NAMESPACE: &str = "SiteReport";

/// Upper bound on " (n)" suffixes tried before giving up.
const MAX_DUPLICATES: u32 = 999;

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Writes the payload into a download folder. An existing file is never
/// overwritten; the new one gets a " (n)" suffix instead.
#[derive(Debug, Clone)]
pub struct DownloadSink {
    dir: PathBuf,
}

impl DownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sink writing into the user's download folder.
    pub fn user_downloads() -> Result<Self> {
        Ok(Self::new(data_dir::downloads_dir()?))
    }
}

impl ExportSink for DownloadSink {
    fn name(&self) -> &str {
        "download"
    }

    #[instrument(skip_all, fields(filename = %result.filename))]
    fn deliver(&self, result: &ExportResult) -> Result<SinkReceipt> {
        std::fs::create_dir_all(&self.dir)?;
        let path = unique_path(&self.dir, &result.filename)?;
        std::fs::write(&path, &result.payload)?;
        info!(path = %path.display(), bytes = result.payload.len(), "Export downloaded");
        Ok(SinkReceipt {
            sink: self.name().to_string(),
            locator: Some(path.display().to_string()),
        })
    }
}

/// First free path for `filename` in `dir`: `name.ext`, `name (1).ext`, ...
fn unique_path(dir: &Path, filename: &str) -> Result<PathBuf> {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };
    for n in 1..=MAX_DUPLICATES {
        let name = match ext {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(SiteReportError::Sink(format!(
        "no free filename for {} in {}",
        filename,
        dir.display()
    )))
}

// ---------------------------------------------------------------------------
// Device storage
// ---------------------------------------------------------------------------

/// Persists the payload under `<root>/SiteReport/<filename>`, replacing an
/// earlier export of the same name, and returns a `file://` locator.
#[derive(Debug, Clone)]
pub struct DeviceStorageSink {
    root: PathBuf,
}

impl DeviceStorageSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Sink writing into the application documents directory.
    pub fn documents() -> Result<Self> {
        Ok(Self::new(data_dir::documents_dir()?))
    }

    pub fn directory(&self) -> PathBuf {
        self.root.join(STORAGE_NAMESPACE)
    }

    /// Write the payload and return the absolute path it landed at.
    fn save(&self, result: &ExportResult) -> Result<PathBuf> {
        if result.filename.contains(['/', '\\']) || result.filename.trim().is_empty() {
            return Err(SiteReportError::Sink(format!(
                "invalid export filename: {:?}",
                result.filename
            )));
        }
        let dir = self.directory();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(&result.filename);
        std::fs::write(&path, &result.payload)?;
        Ok(std::fs::canonicalize(&path)?)
    }
}

impl ExportSink for DeviceStorageSink {
    fn name(&self) -> &str {
        "storage"
    }

    #[instrument(skip_all, fields(filename = %result.filename))]
    fn deliver(&self, result: &ExportResult) -> Result<SinkReceipt> {
        let path = self.save(result)?;
        let locator = file_uri(&path);
        info!(%locator, bytes = result.payload.len(), "Export stored");
        Ok(SinkReceipt {
            sink: self.name().to_string(),
            locator: Some(locator),
        })
    }
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

// ---------------------------------------------------------------------------
// Share
// ---------------------------------------------------------------------------

/// Saves like [`DeviceStorageSink`], then offers the saved file to a
/// [`ShareTarget`]. The file stays on disk if sharing fails.
pub struct ShareSink {
    storage: DeviceStorageSink,
    target: Box<dyn ShareTarget>,
}

impl ShareSink {
    pub fn new(storage: DeviceStorageSink, target: Box<dyn ShareTarget>) -> Self {
        Self { storage, target }
    }
}

impl ExportSink for ShareSink {
    fn name(&self) -> &str {
        "share"
    }

    #[instrument(skip_all, fields(filename = %result.filename, platform = self.target.platform_name()))]
    fn deliver(&self, result: &ExportResult) -> Result<SinkReceipt> {
        let path = self.storage.save(result)?;
        let locator = file_uri(&path);
        let request = ShareRequest::new(result.filename.as_str(), locator.as_str(), result.mime_type());
        self.target.share(&request)?;
        info!(%locator, "Export shared");
        Ok(SinkReceipt {
            sink: self.name().to_string(),
            locator: Some(locator),
        })
    }
}
