//! In-memory cache for laid-out diagrams.
//!
//! Uses moka's high-performance concurrent cache implementation.

use std::sync::Arc;

use moka::sync::Cache;

/// Thread-safe in-memory cache with configurable capacity.
///
/// The flow service keys it by flow id and stores each diagram with the
/// revision of the record it was laid out from.
#[derive(Clone)]
pub struct MemCache<K, V> {
    entries: Cache<K, V>,
}

impl<K, V> MemCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Allocate a new [`MemCache`].
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Cache::new(capacity as u64),
        }
    }

    pub fn set(
        &self,
        key: K,
        value: V,
    ) {
        self.entries.insert(key, value);
    }

    /// Returns the cached value or runs `init` and caches its result.
    ///
    /// Concurrent callers for the same key share a single `init` run. Errors
    /// are not cached.
    pub fn try_get_with<E>(
        &self,
        key: K,
        init: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, Arc<E>>
    where
        E: Send + Sync + 'static,
    {
        self.entries.try_get_with(key, init)
    }

    pub fn remove(
        &self,
        key: &K,
    ) {
        self.entries.invalidate(key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_try_get_with() {
        let cache: MemCache<String, u32> = MemCache::new(8);
        assert_eq!(cache.try_get_with("a".to_string(), || Ok::<_, String>(1)), Ok(1));

        // cached value wins over a new initializer
        assert_eq!(cache.try_get_with("a".to_string(), || Ok::<_, String>(2)), Ok(1));

        let err = cache.try_get_with("b".to_string(), || Err("boom".to_string())).unwrap_err();
        assert_eq!(*err, "boom");
        assert_eq!(cache.try_get_with("b".to_string(), || Ok::<_, String>(3)), Ok(3));
    }

    #[test]
    fn test_set_and_remove() {
        let cache: MemCache<String, u32> = MemCache::new(8);
        cache.set("a".to_string(), 1);
        assert_eq!(cache.try_get_with("a".to_string(), || Ok::<_, String>(9)), Ok(1));

        cache.set("a".to_string(), 2);
        assert_eq!(cache.try_get_with("a".to_string(), || Ok::<_, String>(9)), Ok(2));

        cache.remove(&"a".to_string());
        assert_eq!(cache.try_get_with("a".to_string(), || Ok::<_, String>(9)), Ok(9));
    }

    #[test]
    fn test_concurrent_callers_share_one_init() {
        let cache: MemCache<u32, u32> = MemCache::new(8);
        let runs = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let v = cache.try_get_with(1, || {
                        runs.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(20));
                        Ok::<_, String>(7)
                    });
                    assert_eq!(v, Ok(7));
                });
            }
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
