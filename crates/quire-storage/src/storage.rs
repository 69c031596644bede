//! The [`Storage`] trait and its error type.
//!
//! Paths passed to a storage are relative to the content root, for example
//! `home.md`, `guides/setup.md` or `guides/index.md`. A path that would leave
//! the root (`..`, absolute paths) is an [`StorageErrorKind::InvalidPath`]
//! error for reads and a plain "missing" for existence checks.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// What went wrong, independent of the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// No document at the path.
    NotFound,
    /// The document exists but may not be read.
    PermissionDenied,
    /// The path escapes the content root.
    InvalidPath,
    /// The document is not UTF-8 text.
    InvalidUtf8,
    /// Anything else.
    Other,
}

impl StorageErrorKind {
    fn describe(self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidPath => "Invalid path",
            Self::InvalidUtf8 => "Not valid UTF-8",
            Self::Other => "Error",
        }
    }
}

impl From<io::ErrorKind> for StorageErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::InvalidData => Self::InvalidUtf8,
            _ => Self::Other,
        }
    }
}

/// Storage failure: a semantic kind plus the path, backend and cause.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic category.
    pub kind: StorageErrorKind,
    /// Path the operation was about.
    pub path: Option<PathBuf>,
    /// Backend name (`Fs`, `Mock`).
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Error of `kind` without context.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// `NotFound` for `path`.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Classify an I/O error on `path`.
    #[must_use]
    pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::new(err.kind().into())
            .with_path(path)
            .with_source(err)
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether the document simply isn't there.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl fmt::Display for StorageError {
    /// `[Fs] Permission denied: <cause> (path: guides/setup.md)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        f.write_str(self.kind.describe())?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

/// Read access to the markdown files under a content root.
pub trait Storage: Send + Sync {
    /// Full text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document is missing, unreadable, not
    /// UTF-8, or `path` escapes the root.
    fn read(&self, path: &Path) -> Result<String, StorageError>;

    /// Whether a document exists at `path`. Failures count as absent.
    fn exists(&self, path: &Path) -> bool;

    /// Modification time in seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document is missing or `path` escapes
    /// the root.
    fn mtime(&self, path: &Path) -> Result<f64, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_with_backend_and_path() {
        let err = StorageError::not_found("guides/setup.md").with_backend("Fs");
        assert_eq!(err.to_string(), "[Fs] Not found (path: guides/setup.md)");
    }

    #[test]
    fn test_from_io_keeps_cause() {
        use std::error::Error;

        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::from_io(io, "locked.md");

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
        assert_eq!(err.path, Some(PathBuf::from("locked.md")));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Permission denied: denied (path: locked.md)");
    }

    #[test]
    fn test_io_kind_mapping() {
        assert_eq!(
            StorageErrorKind::from(io::ErrorKind::InvalidData),
            StorageErrorKind::InvalidUtf8
        );
        assert_eq!(
            StorageErrorKind::from(io::ErrorKind::TimedOut),
            StorageErrorKind::Other
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(StorageError::not_found("x.md").is_not_found());
        assert!(!StorageError::new(StorageErrorKind::InvalidPath).is_not_found());
    }
}
