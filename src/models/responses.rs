//! Response DTOs for the cache node API
//!
//! Defines the structure of outgoing JSON response bodies. The peer
//! protocol itself returns raw bytes and has no DTO.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for the stats endpoint (GET /stats/:group)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that had to be loaded
    pub misses: u64,
    /// Number of loader invocations
    pub loads: u64,
    /// Number of entries evicted under the byte budget
    pub evictions: u64,
    /// Current number of cached entries
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a response from a counter snapshot.
    pub fn new(snapshot: StatsSnapshot, entries: usize) -> Self {
        Self {
            hits: snapshot.hits,
            misses: snapshot.misses,
            loads: snapshot.loads,
            evictions: snapshot.evictions,
            entries,
            hit_rate: snapshot.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
