//! Render caches for Quire.
//!
//! Rendering is a pure function of the source files, so everything here is an
//! optimization that may miss at any time. A [`Cache`] hands out named
//! [`CacheBucket`]s; each entry carries an etag chosen by the caller (Quire
//! uses the source mtime) and a lookup only hits when the etag matches.
//!
//! Backends:
//!
//! - [`NullCache`]: caching disabled
//! - [`MemoryCache`]: shared in-process map
//! - [`FileCache`]: one file per entry under `.quire/cache`, wiped when the
//!   version changes
//!
//! # Example
//!
//! ```
//! use quire_cache::{Cache, MemoryCache};
//!
//! let pages = MemoryCache::new().bucket("pages");
//! pages.set("home.md", "42.0", b"<h1>Home</h1>");
//!
//! assert_eq!(pages.get("home.md", "42.0").as_deref(), Some(&b"<h1>Home</h1>"[..]));
//! assert_eq!(pages.get("home.md", "43.0"), None);
//! ```

mod ext;
mod file;
mod memory;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// Key-value entries validated by an etag.
pub trait CacheBucket: Send + Sync {
    /// Value stored under `key` with the same `etag`.
    ///
    /// An empty `etag` accepts whatever etag the entry was stored with.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store `value`, replacing any previous entry for `key`.
    fn set(&self, key: &str, etag: &str, value: &[u8]);
}

/// Source of named [`CacheBucket`]s.
///
/// Buckets with different names never see each other's keys; two handles for
/// the same name share entries.
pub trait Cache: Send + Sync {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// Bucket that stores nothing.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}
}

/// Cache used when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_never_hits() {
        let pages = NullCache.bucket("pages");

        pages.set("home.md", "1", b"<h1>Home</h1>");

        assert_eq!(pages.get("home.md", "1"), None);
        assert_eq!(pages.get("home.md", ""), None);
    }
}
