// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: photo decoding, format tagging, and the pass-scoped cache.

pub mod cache;
pub mod prepare;

pub use cache::ImageCache;
pub use prepare::{ImageKind, ImageMeta, decode_image};
