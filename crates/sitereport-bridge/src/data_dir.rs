// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware default directories for the desktop sinks.

use std::path::PathBuf;

use sitereport_core::error::Result;

/// Application documents directory, created if needed. Device-storage
/// exports land in a namespace folder below it.
pub fn documents_dir() -> Result<PathBuf> {
    let dir = data_base().join("sitereport").join("documents");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// The user's download folder, created if needed.
pub fn downloads_dir() -> Result<PathBuf> {
    let dir = match std::env::var("XDG_DOWNLOAD_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home().join("Downloads"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn data_base() -> PathBuf {
    // Try XDG data dir, then fallback to home
    match std::env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home().join(".local").join("share"),
    }
}

fn home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        // Last resort
        .unwrap_or_else(|_| std::env::temp_dir())
}
