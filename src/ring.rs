//! Hash Ring Module
//!
//! Consistent hashing over virtual nodes, used to route keys to peers.

use std::collections::HashMap;

/// Hash function mapping raw bytes onto the ring.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Default number of virtual nodes per real node.
pub const DEFAULT_REPLICAS: usize = 50;

// == Hash Ring ==
/// Maps keys to node identifiers over a ring of virtual points.
///
/// Each real node contributes `replicas` points, hashed from the node id
/// with its decimal replica index prepended. Keys resolve to the owner of
/// the lowest point at or above their own hash, wrapping to the first
/// point past the top of the ring.
///
/// The ring is rebuilt wholesale on peer reconfiguration; it is not
/// mutated concurrently with lookups (the pool's lock covers both).
pub struct HashRing {
    replicas: usize,
    hash: HashFn,
    /// Sorted virtual points
    keys: Vec<u32>,
    /// Virtual point -> real node id
    nodes: HashMap<u32, String>,
}

impl HashRing {
    // == Constructors ==
    /// Creates a ring using CRC32/IEEE.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, Box::new(crc32fast::hash))
    }

    /// Creates a ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            replicas,
            hash,
            keys: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Adds real nodes, generating `replicas` virtual points for each.
    ///
    /// Points are re-sorted once per batch. If two points collide, the
    /// later node overwrites the earlier owner; with fifty-odd points per
    /// node the affected key mass is negligible.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let point = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.keys.push(point);
                self.nodes.insert(point, node.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    // == Get ==
    /// Resolves a key to the owning node, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        // Lowest point >= hash, wrapping to the start of the ring.
        let idx = self.keys.partition_point(|&point| point < hash);
        let point = self.keys[idx % self.keys.len()];
        self.nodes.get(&point).map(String::as_str)
    }

    /// Returns true if no nodes have been added.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("points", &self.keys.len())
            .finish()
    }
}
