//! Configuration Module
//!
//! Handles loading and managing node configuration from environment
//! variables.

use std::env;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// This node's address as peers see it, e.g. `http://127.0.0.1:3000`
    pub self_url: String,
    /// Peer base URLs (including this node), comma separated
    pub peers: Vec<String>,
    /// Per-group cache byte budget; 0 means unbounded
    pub cache_bytes: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SELF_URL` - This node's base URL (default: http://127.0.0.1:<port>)
    /// - `PEERS` - Comma-separated peer base URLs (default: empty)
    /// - `CACHE_BYTES` - Cache byte budget per group (default: 1 MiB)
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        Self {
            server_port,
            self_url: env::var("SELF_URL")
                .unwrap_or_else(|_| format!("http://127.0.0.1:{}", server_port)),
            peers: env::var("PEERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024 * 1024),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            self_url: "http://127.0.0.1:3000".to_string(),
            peers: Vec::new(),
            cache_bytes: 1024 * 1024,
        }
    }
}
