//! In-memory [`MockStorage`] for tests.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

#[derive(Debug, Default)]
struct MockFile {
    content: String,
    mtime: f64,
    unreadable: bool,
}

/// Documents held in memory.
///
/// Files are added with the `with_*` builders; `set_*` mutate a shared
/// instance after it has been handed to a resolver. Mtimes default to `0.0`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use quire_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("guides/setup.md", "# Setup\n\nContent.");
///
/// assert!(storage.exists(Path::new("guides/setup.md")));
/// assert!(!storage.exists(Path::new("guides/index.md")));
/// ```
///
/// # Panics
///
/// Every method panics if the internal lock is poisoned.
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<HashMap<PathBuf, MockFile>>,
}

impl MockStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.set_file(path, content);
        self
    }

    /// Set the modification time of a document, in seconds since the epoch.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<PathBuf>, mtime: f64) -> Self {
        self.set_mtime(path, mtime);
        self
    }

    /// Add a document that exists but fails to read.
    #[must_use]
    pub fn with_unreadable(self, path: impl Into<PathBuf>) -> Self {
        self.files.write().unwrap().insert(
            path.into(),
            MockFile {
                unreadable: true,
                ..MockFile::default()
            },
        );
        self
    }

    /// Replace the content of a document, creating it if needed.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .entry(path.into())
            .or_default()
            .content = content.into();
    }

    /// Change the modification time of a document, creating it if needed.
    pub fn set_mtime(&self, path: impl Into<PathBuf>, mtime: f64) {
        self.files
            .write()
            .unwrap()
            .entry(path.into())
            .or_default()
            .mtime = mtime;
    }

    fn check(path: &Path) -> Result<(), StorageError> {
        if path.components().all(|c| matches!(c, Component::Normal(_))) {
            Ok(())
        } else {
            Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND))
        }
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &Path) -> Result<String, StorageError> {
        Self::check(path)?;
        match self.files.read().unwrap().get(path) {
            Some(file) if file.unreadable => Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND)),
            Some(file) => Ok(file.content.clone()),
            None => Err(StorageError::not_found(path).with_backend(BACKEND)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        Self::check(path).is_ok() && self.files.read().unwrap().contains_key(path)
    }

    fn mtime(&self, path: &Path) -> Result<f64, StorageError> {
        Self::check(path)?;
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|file| file.mtime)
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}
