//! LRU Cache Module
//!
//! Byte-bounded key/value store with least-recently-used eviction.

use std::collections::{HashMap, VecDeque};

use super::ByteView;

/// Callback invoked for each evicted entry, while the cache lock is held.
pub type EvictionCallback = Box<dyn FnMut(&str, &ByteView) + Send>;

// == LRU Cache ==
/// Recency-ordered store bounded by a byte budget.
///
/// Keys are tracked in a deque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Cost charged against the budget for each entry is
/// `key.len() + value.len()`. A `max_bytes` of 0 means unbounded.
///
/// Not thread-safe on its own; callers serialize access (see
/// [`SharedCache`](super::SharedCache)).
pub struct LruCache {
    /// Byte budget; 0 disables eviction
    max_bytes: u64,
    /// Accumulated cost of all entries
    used: u64,
    /// Recency order, most recent at the front
    order: VecDeque<String>,
    /// Key-value storage
    entries: HashMap<String, ByteView>,
    /// Optional eviction callback
    on_evict: Option<EvictionCallback>,
}

impl LruCache {
    // == Constructor ==
    /// Creates a new cache with the given byte budget.
    ///
    /// # Arguments
    /// * `max_bytes` - Maximum total cost; 0 means unbounded
    /// * `on_evict` - Optional callback invoked for each evicted entry
    pub fn new(max_bytes: u64, on_evict: Option<EvictionCallback>) -> Self {
        Self {
            max_bytes,
            used: 0,
            order: VecDeque::new(),
            entries: HashMap::new(),
            on_evict,
        }
    }

    // == Get ==
    /// Looks up a key, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        if let Some(value) = self.entries.get(key) {
            let value = value.clone();
            self.touch(key);
            Some(value)
        } else {
            None
        }
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts from the back while the
    /// budget is exceeded.
    ///
    /// Replacing an existing key adjusts `used` by the value-length delta
    /// and marks the key most recently used. The just-inserted entry is
    /// itself evicted if its cost alone exceeds the budget.
    pub fn add(&mut self, key: &str, value: ByteView) {
        if let Some(old) = self.entries.get_mut(key) {
            self.used = self.used - old.len() as u64 + value.len() as u64;
            *old = value;
            self.touch(key);
        } else {
            self.order.push_front(key.to_string());
            self.used += (key.len() + value.len()) as u64;
            self.entries.insert(key.to_string(), value);
        }

        while self.max_bytes > 0 && self.used > self.max_bytes {
            self.remove_oldest();
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry; no-op when empty.
    pub fn remove_oldest(&mut self) {
        if let Some(key) = self.order.pop_back() {
            if let Some(value) = self.entries.remove(&key) {
                self.used -= (key.len() + value.len()) as u64;
                if let Some(callback) = self.on_evict.as_mut() {
                    callback(&key, &value);
                }
            }
        }
    }

    // == Touch ==
    /// Moves a key to the front of the recency order.
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_front(key.to_string());
    }

    // == Length ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the accumulated cost of all entries in bytes.
    pub fn used_bytes(&self) -> u64 {
        self.used
    }
}

impl std::fmt::Debug for LruCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used", &self.used)
            .field("len", &self.order.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn view(s: &str) -> ByteView {
        ByteView::copy_from(s.as_bytes())
    }

    #[test]
    fn test_get_hit_and_miss() {
        let mut cache = LruCache::new(0, None);
        cache.add("k1", view("v1"));

        assert_eq!(cache.get("k1"), Some(view("v1")));
        assert_eq!(cache.get("k2"), None);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut cache = LruCache::new(0, None);
        for i in 0..100 {
            cache.add(&format!("key{}", i), view("value"));
        }
        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_eviction_keeps_used_within_budget() {
        // Capacity fits one cost-4 entry plus half of another; each add
        // past the first evicts back down to a single entry.
        let cap = "k1k2k3".len() as u64;
        let mut cache = LruCache::new(cap, None);

        cache.add("k1", view("v1"));
        cache.add("k2", view("v2"));
        cache.add("k3", view("v3"));

        assert_eq!(cache.get("k1"), None);
        assert_eq!(cache.get("k2"), None);
        assert_eq!(cache.get("k3"), Some(view("v3")));
        assert_eq!(cache.len(), 1);
        assert!(cache.used_bytes() <= cap);
    }

    #[test]
    fn test_get_protects_from_eviction() {
        let mut cache = LruCache::new(12, None);
        cache.add("k1", view("v1"));
        cache.add("k2", view("v2"));
        cache.add("k3", view("v3"));

        // k1 becomes most recently used, so k2 is next out.
        assert!(cache.get("k1").is_some());
        cache.add("k4", view("v4"));

        assert!(cache.get("k1").is_some());
        assert_eq!(cache.get("k2"), None);
    }

    #[test]
    fn test_replace_adjusts_used() {
        let mut cache = LruCache::new(0, None);
        cache.add("key", view("short"));
        let before = cache.used_bytes();

        cache.add("key", view("a much longer value"));

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.used_bytes(),
            before - "short".len() as u64 + "a much longer value".len() as u64
        );
        assert_eq!(cache.get("key"), Some(view("a much longer value")));
    }

    #[test]
    fn test_on_evict_callback_order() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let callback: EvictionCallback = Box::new(move |key, _value| {
            sink.lock().unwrap().push(key.to_string());
        });

        let mut cache = LruCache::new(10, Some(callback));
        cache.add("key1", view("123456")); // cost 10
        cache.add("k2", view("k2")); // cost 4, evicts key1
        cache.add("k3", view("k3")); // cost 4, fits
        cache.add("k4", view("k4")); // cost 4, evicts k2

        assert_eq!(*evicted.lock().unwrap(), vec!["key1", "k2"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_oversized_entry_is_evicted_immediately() {
        let mut cache = LruCache::new(4, None);
        cache.add("key", view("far too large to fit"));

        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
    }

    #[test]
    fn test_remove_oldest_empty_is_noop() {
        let mut cache = LruCache::new(10, None);
        cache.remove_oldest();
        assert_eq!(cache.len(), 0);
    }
}
