//! File-based cache implementation.
//!
//! [`FileCache`] keeps one file per entry inside a per-bucket directory. The
//! first line of each file is the etag; the rest is the payload:
//!
//! ```text
//! {etag}\n{data bytes}
//! ```
//!
//! Writes go to a sibling temp file that is renamed into place, so a reader
//! sees either the previous entry or the new one, never a partial write.
//!
//! A `VERSION` file in the cache root guards against stale layouts: on
//! mismatch the whole directory is wiped and recreated.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Cache, CacheBucket};

/// Suffix for in-flight writes.
const TMP_SUFFIX: &str = ".tmp";

/// Distinguishes concurrent temp files written by the same process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION              # cache format version
/// +-- pages/               # bucket "pages"
/// |   +-- guides%2Fsetup   # entry for key "guides/setup"
/// +-- navigation/
///     +-- ...
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open a file cache at `root`, wiping it if `version` differs.
    ///
    /// Errors while validating are logged and never fatal; a cache that
    /// cannot be written simply misses.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    /// Root directory of the cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(encode_key(name)),
        })
    }
}

struct FileCacheBucket {
    dir: PathBuf,
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let file = fs::File::open(self.dir.join(encode_key(key))).ok()?;
        let mut reader = BufReader::new(file);

        let mut header = Vec::new();
        reader.read_until(b'\n', &mut header).ok()?;
        if header.pop() != Some(b'\n') {
            return None;
        }
        if !etag.is_empty() && header != etag.as_bytes() {
            return None;
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        if etag.contains('\n') {
            tracing::debug!(key, "Refusing to cache entry with multi-line etag");
            return;
        }
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::debug!(dir = %self.dir.display(), error = %e, "Cannot create cache bucket");
            return;
        }

        let path = self.dir.join(encode_key(key));
        let tmp = self.dir.join(format!(
            "{}.{}.{}{TMP_SUFFIX}",
            encode_key(key),
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let mut buf = Vec::with_capacity(etag.len() + 1 + value.len());
        buf.extend_from_slice(etag.as_bytes());
        buf.push(b'\n');
        buf.extend_from_slice(value);

        if let Err(e) = fs::write(&tmp, &buf).and_then(|()| fs::rename(&tmp, &path)) {
            tracing::debug!(path = %path.display(), error = %e, "Cache write failed");
            let _ = fs::remove_file(&tmp);
        }
    }
}

/// Bytes escaped in entry file names: controls plus the path separators and
/// `%` itself.
const KEY_SET: &AsciiSet = &CONTROLS.add(b'%').add(b'/').add(b'\\');

/// Map a key to a single file name.
///
/// Slugs contain `/`, so separators are percent-encoded to keep every entry a
/// direct child of its bucket directory. A leading dot is encoded too so keys
/// can never name `.` or `..`.
fn encode_key(key: &str) -> String {
    if key.is_empty() {
        return "%00".to_owned();
    }
    match key.strip_prefix('.') {
        Some(rest) => format!("%2E{}", utf8_percent_encode(rest, KEY_SET)),
        None => utf8_percent_encode(key, KEY_SET).to_string(),
    }
}

fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!(version, "Cache version matches");
            return;
        }
        Ok(stored) => {
            tracing::info!(stored = %stored, current = version, "Cache version changed, wiping cache");
        }
        Err(_) => {
            tracing::info!(root = %root.display(), "Initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!(error = %e, "Failed to remove cache directory");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!(error = %e, "Failed to create cache directory");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!(error = %e, "Failed to write cache VERSION file");
    }
}
