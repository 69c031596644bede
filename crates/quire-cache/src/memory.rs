//! In-process cache implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{Cache, CacheBucket};

/// Stored entry: etag plus immutable payload.
type Entry = (String, Arc<[u8]>);

type Buckets = HashMap<String, HashMap<String, Entry>>;

/// In-memory [`Cache`] shared by all bucket handles it creates.
///
/// Writers replace the `Arc` for a key; readers clone the payload out, so an
/// entry a reader already holds is never changed underneath it.
#[derive(Clone, Default)]
pub struct MemoryCache {
    buckets: Arc<RwLock<Buckets>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            buckets: Arc::clone(&self.buckets),
        })
    }
}

struct MemoryCacheBucket {
    name: String,
    buckets: Arc<RwLock<Buckets>>,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let buckets = self.buckets.read().ok()?;
        let (stored_etag, data) = buckets.get(&self.name)?.get(key)?;
        if !etag.is_empty() && stored_etag != etag {
            return None;
        }
        Some(data.to_vec())
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        let Ok(mut buckets) = self.buckets.write() else {
            tracing::warn!(bucket = %self.name, "Memory cache lock poisoned, skipping write");
            return;
        };
        buckets
            .entry(self.name.clone())
            .or_default()
            .insert(key.to_owned(), (etag.to_owned(), Arc::from(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_and_get() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("pages");

        bucket.set("guide", "1.0", b"<p>guide</p>");

        assert_eq!(bucket.get("guide", "1.0"), Some(b"<p>guide</p>".to_vec()));
    }

    #[test]
    fn test_memory_etag_mismatch_misses() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("pages");

        bucket.set("guide", "1.0", b"old");

        assert_eq!(bucket.get("guide", "2.0"), None);
        assert_eq!(bucket.get("guide", ""), Some(b"old".to_vec()));
    }

    #[test]
    fn test_memory_overwrite_replaces_entry() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("pages");

        bucket.set("guide", "1", b"first");
        bucket.set("guide", "2", b"second");

        assert_eq!(bucket.get("guide", "1"), None);
        assert_eq!(bucket.get("guide", "2"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_memory_handles_share_storage() {
        let cache = MemoryCache::new();
        cache.bucket("pages").set("k", "e", b"shared");

        assert_eq!(cache.bucket("pages").get("k", "e"), Some(b"shared".to_vec()));
        assert_eq!(cache.clone().bucket("pages").get("k", "e"), Some(b"shared".to_vec()));
    }

    #[test]
    fn test_memory_buckets_are_isolated() {
        let cache = MemoryCache::new();
        cache.bucket("alpha").set("key", "e", b"alpha");
        cache.bucket("beta").set("key", "e", b"beta");

        assert_eq!(cache.bucket("alpha").get("key", "e"), Some(b"alpha".to_vec()));
        assert_eq!(cache.bucket("beta").get("key", "e"), Some(b"beta".to_vec()));
    }

    #[test]
    fn test_memory_concurrent_readers() {
        let cache = MemoryCache::new();
        cache.bucket("pages").set("k", "e", b"value");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.bucket("pages").get("k", "e"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(b"value".to_vec()));
        }
    }
}
