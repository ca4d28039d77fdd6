// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sitereport-bridge: Where finished exports go.
//
// Provides the three delivery sinks (browser-style download folder, app
// document storage, OS share sheet) and the share-target abstraction the
// share sink hands its file to. Native share sheets are not built here; on
// every target the stub reports `PlatformUnavailable`.

pub mod data_dir;
pub mod sinks;
pub mod stub;
pub mod traits;

pub use sinks::{DeviceStorageSink, DownloadSink, ShareSink};
pub use stub::StubShareTarget;
pub use traits::{ShareRequest, ShareTarget};

/// Share target for the current platform.
pub fn platform_share_target() -> Box<dyn ShareTarget> {
    Box::new(stub::StubShareTarget)
}
