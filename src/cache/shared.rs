//! Shared Cache Module
//!
//! Exclusive-lock wrapper that makes the LRU cache safe for concurrent use.

use parking_lot::Mutex;

use super::{ByteView, EvictionCallback, LruCache};

// == Shared Cache ==
/// Thread-safe wrapper around [`LruCache`].
///
/// The inner cache is built lazily on the first write, so groups that are
/// created but never populated cost nothing beyond the wrapper itself.
/// Reads against an uninitialized cache report a miss without allocating.
///
/// The lock is held only for the cache operation itself plus the
/// synchronous eviction callback; it is never held across an await.
pub struct SharedCache {
    max_bytes: u64,
    inner: Mutex<Slot>,
}

struct Slot {
    lru: Option<LruCache>,
    /// Handed to the LRU cache when it is first built
    on_evict: Option<EvictionCallback>,
}

impl SharedCache {
    /// Creates a wrapper with the given byte budget and optional
    /// eviction callback.
    pub fn new(max_bytes: u64, on_evict: Option<EvictionCallback>) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(Slot {
                lru: None,
                on_evict,
            }),
        }
    }

    /// Looks up a key, touching it on a hit.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut slot = self.inner.lock();
        slot.lru.as_mut()?.get(key)
    }

    /// Inserts a value, initializing the inner cache on first use.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut slot = self.inner.lock();
        if slot.lru.is_none() {
            let on_evict = slot.on_evict.take();
            slot.lru = Some(LruCache::new(self.max_bytes, on_evict));
        }
        slot.lru
            .as_mut()
            .expect("cache initialized above")
            .add(key, value);
    }

    /// Returns the number of entries; 0 before first write.
    pub fn len(&self) -> usize {
        self.inner.lock().lru.as_ref().map_or(0, LruCache::len)
    }

    /// Returns the accumulated cost in bytes; 0 before first write.
    pub fn used_bytes(&self) -> u64 {
        self.inner
            .lock()
            .lru
            .as_ref()
            .map_or(0, LruCache::used_bytes)
    }
}

impl std::fmt::Debug for SharedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache")
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}
