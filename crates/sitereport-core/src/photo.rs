// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photo accessor: resolves a `PhotoRef` to the stored image bytes.
//
// Record storage itself lives outside the engine; exports only need a way to
// fetch the binary blob behind each reference.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SiteReportError};
use crate::types::PhotoRef;

/// Caller-supplied accessor for stored image data.
pub trait PhotoSource {
    /// Load the raw bytes behind `photo_ref`.
    fn load(&self, photo_ref: &PhotoRef) -> Result<Vec<u8>>;
}

/// In-memory photo store, keyed by reference.
#[derive(Debug, Default, Clone)]
pub struct MemoryPhotoStore {
    blobs: HashMap<PhotoRef, Vec<u8>>,
}

impl MemoryPhotoStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `photo_ref`, replacing earlier bytes.
    pub fn insert(&mut self, photo_ref: impl Into<PhotoRef>, bytes: Vec<u8>) {
        self.blobs.insert(photo_ref.into(), bytes);
    }

    /// Number of stored photos.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no photos.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl PhotoSource for MemoryPhotoStore {
    fn load(&self, photo_ref: &PhotoRef) -> Result<Vec<u8>> {
        self.blobs
            .get(photo_ref)
            .cloned()
            .ok_or_else(|| SiteReportError::PhotoNotFound(photo_ref.to_string()))
    }
}

/// Photo store backed by a directory; a reference is a relative file name.
#[derive(Debug, Clone)]
pub struct DirPhotoStore {
    root: PathBuf,
}

impl DirPhotoStore {
    /// Store resolving references relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, photo_ref: &PhotoRef) -> Result<PathBuf> {
        let relative = Path::new(&photo_ref.0);
        // References must stay inside the store.
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || photo_ref.0.is_empty() {
            return Err(SiteReportError::PhotoNotFound(photo_ref.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl PhotoSource for DirPhotoStore {
    fn load(&self, photo_ref: &PhotoRef) -> Result<Vec<u8>> {
        let path = self.resolve(photo_ref)?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), len = bytes.len(), "Photo loaded");
                Ok(bytes)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(SiteReportError::PhotoNotFound(photo_ref.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryPhotoStore::new();
        store.insert("p1", vec![1, 2, 3]);
        assert_eq!(store.load(&PhotoRef::from("p1")).expect("load"), vec![1, 2, 3]);
        assert!(matches!(
            store.load(&PhotoRef::from("p2")),
            Err(SiteReportError::PhotoNotFound(_))
        ));
    }

    #[test]
    fn dir_store_reads_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.jpg"), b"jpeg").expect("write");
        let store = DirPhotoStore::new(dir.path());
        assert_eq!(store.load(&PhotoRef::from("a.jpg")).expect("load"), b"jpeg");
        assert!(matches!(
            store.load(&PhotoRef::from("missing.jpg")),
            Err(SiteReportError::PhotoNotFound(_))
        ));
    }

    #[test]
    fn dir_store_rejects_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirPhotoStore::new(dir.path());
        assert!(store.load(&PhotoRef::from("../etc/passwd")).is_err());
        assert!(store.load(&PhotoRef::from("/etc/passwd")).is_err());
    }
}
