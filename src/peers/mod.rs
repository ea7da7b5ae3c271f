//! Peers Module
//!
//! The seam between a group and the rest of the cluster: pick a peer for
//! a key, and fetch bytes from it.

mod http_pool;

pub use http_pool::{HttpGetter, HttpPool, DEFAULT_BASE_PATH};

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

// == Peer Picker ==
/// Chooses where a key should be served.
///
/// `None` means the local node owns the key and should load it itself.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Client half of the peer protocol: fetch the raw value bytes for
/// `(group, key)` from one remote node.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes>;
}
