//! [`FsStorage`]: documents on the local filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::storage::{Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Fs";

/// Storage over a content directory on disk.
///
/// # Example
///
/// ```no_run
/// use std::path::{Path, PathBuf};
/// use quire_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// let exists = storage.exists(Path::new("guides/setup.md"));
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    source_dir: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Content root.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Absolute location of `path`, refusing anything outside the root.
    fn locate(&self, path: &Path) -> Result<PathBuf, StorageError> {
        let inside = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(self.source_dir.join(path))
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &Path) -> Result<String, StorageError> {
        let full = self.locate(path)?;
        tracing::debug!(path = %full.display(), "Reading document");
        fs::read_to_string(&full).map_err(|e| StorageError::from_io(e, full).with_backend(BACKEND))
    }

    fn exists(&self, path: &Path) -> bool {
        self.locate(path).is_ok_and(|full| full.is_file())
    }

    fn mtime(&self, path: &Path) -> Result<f64, StorageError> {
        let full = self.locate(path)?;
        let modified = fs::metadata(&full)
            .and_then(|meta| meta.modified())
            .map_err(|e| StorageError::from_io(e, &full).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }
}
