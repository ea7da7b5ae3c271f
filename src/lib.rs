//! Cachemesh - A distributed in-memory key/value cache
//!
//! Named groups cache byte values under a per-group byte budget with LRU
//! eviction. Misses resolve through consistent-hash peer routing or a
//! user-supplied loader, with concurrent misses for the same key
//! coalesced into a single call.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod peers;
pub mod ring;
pub mod singleflight;

pub mod models;

pub use api::{create_router, AppState};
pub use cache::ByteView;
pub use config::Config;
pub use error::CacheError;
pub use group::{Group, Loader, LoaderFn, Registry};
pub use peers::HttpPool;
