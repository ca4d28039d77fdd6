// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub share target for desktop/CI builds where no native share sheet exists.

use sitereport_core::error::{Result, SiteReportError};

use crate::traits::{ShareRequest, ShareTarget};

/// Share target that always reports `PlatformUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubShareTarget;

impl ShareTarget for StubShareTarget {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn share(&self, request: &ShareRequest) -> Result<()> {
        tracing::warn!(url = %request.url, "ShareTarget::share called on stub target");
        Err(SiteReportError::PlatformUnavailable)
    }
}
