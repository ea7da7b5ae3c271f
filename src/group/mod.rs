//! Group Module
//!
//! Named cache namespaces and the miss-handling read path:
//! local hit, then peer fetch, then local loader.

mod registry;

pub use registry::Registry;

use std::sync::atomic::Ordering;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::{ByteView, CacheStats, EvictionCallback, SharedCache, StatsSnapshot};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::Flight;

// == Loader ==
/// Produces the authoritative bytes for a key the cache does not hold.
///
/// Called at most once per coalesced miss. Returned bytes are copied into
/// an immutable view before storage, so the loader is free to retain its
/// buffer.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapter letting a plain closure serve as a [`Loader`].
pub struct LoaderFn<F>(pub F);

#[async_trait]
impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

// == Group ==
/// A named, independently bounded cache namespace.
///
/// Groups are created through [`Registry::new_group`] and live for the
/// life of the process. All fields are immutable after construction
/// except the peer selector, which is published exactly once.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    main_cache: SharedCache,
    flight: Flight<ByteView>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: CacheStats,
}

impl Group {
    pub(crate) fn new(name: &str, max_bytes: u64, loader: Arc<dyn Loader>) -> Self {
        let stats = CacheStats::new();
        let evictions = stats.eviction_counter();
        let on_evict: EvictionCallback = Box::new(move |key, _value| {
            evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key, "evicted entry");
        });

        Self {
            name: name.to_string(),
            loader,
            main_cache: SharedCache::new(max_bytes, Some(on_evict)),
            flight: Flight::new(),
            peers: OnceLock::new(),
            stats,
        }
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer selector.
    ///
    /// # Panics
    /// Panics if called more than once; wiring peers twice is a
    /// programming error.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once");
        }
    }

    // == Get ==
    /// The read path: local hit, otherwise a coalesced load.
    ///
    /// Rejects the empty key before touching the cache.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(view) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            self.stats.record_hit();
            return Ok(view);
        }

        self.stats.record_miss();
        self.load(key).await
    }

    // == Load ==
    /// Resolves a miss inside the singleflight: concurrent callers for
    /// the same key share one peer fetch or loader call.
    async fn load(&self, key: &str) -> Result<ByteView> {
        self.flight
            .run(key, || async {
                if let Some(picker) = self.peers.get() {
                    if let Some(peer) = picker.pick_peer(key) {
                        match self.get_from_peer(peer.as_ref(), key).await {
                            Ok(view) => return Ok(view),
                            Err(err) => {
                                // Peer failures are recoverable; the local
                                // loader is the fallback.
                                warn!(group = %self.name, key, %err, "peer fetch failed, loading locally");
                            }
                        }
                    }
                }
                self.get_locally(key).await
            })
            .await
    }

    /// Fetches from a remote peer. Transport bytes arrive owned, so they
    /// wrap into a view without another copy.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from(bytes))
    }

    /// Invokes the user loader and populates the main cache.
    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        self.stats.record_load();
        let bytes = self
            .loader
            .load(key)
            .await
            .map_err(|err| CacheError::Loader(err.to_string()))?;

        // The loader may retain its buffer; copy at the trust boundary.
        let view = ByteView::copy_from(&bytes);
        self.populate_cache(key, view.clone());
        Ok(view)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    // == Stats ==
    /// Copies the group's performance counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.main_cache.len()
    }

    /// Returns true if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.main_cache.len() == 0
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("entries", &self.main_cache.len())
            .finish()
    }
}
