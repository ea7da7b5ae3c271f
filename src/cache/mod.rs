//! Cache Module
//!
//! In-memory byte-value caching with LRU eviction under a byte budget.

mod lru;
mod shared;
mod stats;
mod view;


// Re-export public types
pub use lru::{EvictionCallback, LruCache};
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsSnapshot};
pub use view::ByteView;
