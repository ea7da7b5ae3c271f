//! HTTP Pool Module
//!
//! Ring-backed peer selection and the HTTP client used to reach peers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::debug;

use super::{PeerGetter, PeerPicker};
use crate::error::{CacheError, Result};
use crate::ring::{HashRing, DEFAULT_REPLICAS};

/// Path prefix under which nodes serve each other.
pub const DEFAULT_BASE_PATH: &str = "/_cache/";

// == HTTP Pool ==
/// Peer selector over a consistent-hash ring of node base URLs.
///
/// `set_peers` rebuilds the ring and the per-peer clients atomically
/// under the pool lock; `pick_peer` resolves a key and returns the
/// matching client, or `None` when the ring picks this node itself.
pub struct HttpPool {
    /// This node's own base URL, e.g. `http://127.0.0.1:3000`
    self_url: String,
    base_path: String,
    state: Mutex<PoolState>,
}

#[derive(Default)]
struct PoolState {
    ring: Option<HashRing>,
    /// One client per peer base URL
    getters: HashMap<String, Arc<HttpGetter>>,
}

impl HttpPool {
    /// Creates a pool identifying this node by `self_url`.
    pub fn new(self_url: impl Into<String>) -> Self {
        Self {
            self_url: self_url.into(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            state: Mutex::new(PoolState::default()),
        }
    }

    // == Set Peers ==
    /// Replaces the peer set, rebuilding the ring and clients.
    ///
    /// The peer list should include this node's own URL so that keys it
    /// owns resolve to "local".
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        let mut getters = HashMap::new();
        let client = reqwest::Client::new();

        for peer in peers {
            let peer = peer.as_ref();
            ring.add([peer]);
            getters.insert(
                peer.to_string(),
                Arc::new(HttpGetter {
                    base_url: format!("{}{}", peer, self.base_path),
                    client: client.clone(),
                }),
            );
        }

        let mut state = self.state.lock();
        state.ring = Some(ring);
        state.getters = getters;
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.as_ref()?.get(key)?;
        if peer == self.self_url {
            return None;
        }

        debug!(%peer, key, "picked remote peer");
        state
            .getters
            .get(peer)
            .cloned()
            .map(|getter| getter as Arc<dyn PeerGetter>)
    }
}

// == HTTP Getter ==
/// HTTP client for one remote peer.
pub struct HttpGetter {
    /// Peer base URL including the cache path prefix
    base_url: String,
    client: reqwest::Client,
}

#[async_trait]
impl PeerGetter for HttpGetter {
    /// Fetches `{base_url}{group}/{key}` and returns the raw body bytes.
    async fn get(&self, group: &str, key: &str) -> Result<Bytes> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            utf8_percent_encode(group, NON_ALPHANUMERIC),
            utf8_percent_encode(key, NON_ALPHANUMERIC),
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| CacheError::Peer(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Peer(format!("peer returned {}", status)));
        }

        response
            .bytes()
            .await
            .map_err(|err| CacheError::Peer(format!("reading response body: {}", err)))
    }
}
