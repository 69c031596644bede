//! Typed helpers on top of raw cache buckets.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// JSON and string access for any [`CacheBucket`], including
/// `Box<dyn CacheBucket>`.
///
/// # Example
///
/// ```
/// use quire_cache::{Cache, CacheBucketExt, MemoryCache};
///
/// let bucket = MemoryCache::new().bucket("pages");
///
/// bucket.set_json("guides/setup.md", "1700000000", &vec!["Install", "Usage"]);
/// let toc: Option<Vec<String>> = bucket.get_json("guides/setup.md", "1700000000");
/// assert_eq!(toc.unwrap().len(), 2);
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Decode a JSON entry. Undecodable entries count as misses.
    fn get_json<T: DeserializeOwned>(&self, key: &str, etag: &str) -> Option<T> {
        let bytes = self.get(key, etag)?;
        serde_json::from_slice(&bytes)
            .inspect_err(|e| tracing::debug!(key, error = %e, "Discarding undecodable cache entry"))
            .ok()
    }

    /// Store `value` as JSON. Values that fail to serialize are not cached.
    fn set_json<T: Serialize>(&self, key: &str, etag: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set(key, etag, &bytes),
            Err(e) => tracing::debug!(key, error = %e, "Not caching unserializable value"),
        }
    }

    /// Read a UTF-8 entry.
    fn get_string(&self, key: &str, etag: &str) -> Option<String> {
        String::from_utf8(self.get(key, etag)?).ok()
    }

    fn set_string(&self, key: &str, etag: &str, value: &str) {
        self.set(key, etag, value.as_bytes());
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cache, MemoryCache};

    #[test]
    fn test_json_round_trip_through_box_dyn() {
        let cache = MemoryCache::new();
        let bucket: Box<dyn CacheBucket> = cache.bucket("pages");

        bucket.set_json("guide", "1", &vec!["a", "b"]);
        let value: Option<Vec<String>> = bucket.get_json("guide", "1");

        assert_eq!(value, Some(vec!["a".to_owned(), "b".to_owned()]));
    }

    #[test]
    fn test_json_type_mismatch_is_miss() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("pages");

        bucket.set_string("guide", "1", "not json");
        let value: Option<Vec<String>> = bucket.get_json("guide", "1");

        assert_eq!(value, None);
    }

    #[test]
    fn test_string_helpers() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("pages");

        bucket.set_string("k", "e", "<p>hi</p>");

        assert_eq!(bucket.get_string("k", "e"), Some("<p>hi</p>".to_owned()));
        assert_eq!(bucket.get_string("k", "other"), None);
    }
}
