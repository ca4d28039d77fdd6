// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pass-scoped image cache keyed by record id.
//
// One cache lives for exactly one export call and is dropped with it; the
// sizing pass and the embedding pass both read from it so each photo is
// loaded and decoded once.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use sitereport_core::error::{Result, SiteReportError};
use sitereport_core::{PhotoRef, PhotoSource, RecordId};
use tracing::{debug, warn};

use super::prepare::{ImageMeta, decode_image};

#[derive(Debug)]
enum Slot {
    Ready(ImageMeta),
    Failed(Failure),
}

/// A remembered failure, kept with its kind so a repeated lookup returns the
/// same error the first attempt did.
#[derive(Debug, Clone, PartialEq)]
enum Failure {
    Decode(String),
    Embed(String),
    NotFound(String),
}

impl Failure {
    fn from_error(err: &SiteReportError) -> Self {
        match err {
            SiteReportError::Decode(detail) => Self::Decode(detail.clone()),
            SiteReportError::Embed(detail) => Self::Embed(detail.clone()),
            SiteReportError::PhotoNotFound(detail) => Self::NotFound(detail.clone()),
            other => Self::Decode(other.to_string()),
        }
    }

    fn to_error(&self) -> SiteReportError {
        match self {
            Self::Decode(detail) => SiteReportError::Decode(detail.clone()),
            Self::Embed(detail) => SiteReportError::Embed(detail.clone()),
            Self::NotFound(detail) => SiteReportError::PhotoNotFound(detail.clone()),
        }
    }
}

/// Decoded photos of the current export pass.
#[derive(Debug, Default)]
pub struct ImageCache {
    slots: HashMap<RecordId, Slot>,
    hits: usize,
}

impl ImageCache {
    /// Empty cache for one export pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and decode the photo of record `id`, or return the cached result.
    ///
    /// A failure is remembered too: asking again returns an error of the
    /// same kind and message without touching the source.
    pub fn prepare(
        &mut self,
        id: &RecordId,
        photo_ref: &PhotoRef,
        source: &dyn PhotoSource,
    ) -> Result<&ImageMeta> {
        let mut fresh_error = None;
        let slot = match self.slots.entry(id.clone()) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let slot = match load_and_decode(photo_ref, source) {
                    Ok(meta) => Slot::Ready(meta),
                    Err(err) => {
                        warn!(record = %id, photo = %photo_ref, error = %err, "Photo preparation failed");
                        let slot = Slot::Failed(Failure::from_error(&err));
                        fresh_error = Some(err);
                        slot
                    }
                };
                entry.insert(slot)
            }
        };

        if let Some(err) = fresh_error {
            return Err(err);
        }
        match slot {
            Slot::Ready(meta) => Ok(meta),
            Slot::Failed(failure) => Err(failure.to_error()),
        }
    }

    /// Successfully prepared photo of record `id`, if any.
    pub fn get(&self, id: &RecordId) -> Option<&ImageMeta> {
        match self.slots.get(id) {
            Some(Slot::Ready(meta)) => Some(meta),
            _ => None,
        }
    }

    /// Whether record `id` was attempted and failed.
    pub fn has_failed(&self, id: &RecordId) -> bool {
        matches!(self.slots.get(id), Some(Slot::Failed(_)))
    }

    /// Number of records attempted so far, failed ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no record has been attempted yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of lookups answered without decoding.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

fn load_and_decode(photo_ref: &PhotoRef, source: &dyn PhotoSource) -> Result<ImageMeta> {
    let bytes = source.load(photo_ref).map_err(|err| {
        if err.is_record_scoped() {
            err
        } else {
            // Storage trouble for one photo is still a per-record failure.
            SiteReportError::Decode(format!("photo {} unreadable: {}", photo_ref, err))
        }
    })?;
    debug!(photo = %photo_ref, len = bytes.len(), "Decoding photo");
    decode_image(&bytes)
}
