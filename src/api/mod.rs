//! API Module
//!
//! HTTP surface of a cache node.
//!
//! # Endpoints
//! - `GET /_cache/:group/:key` - Peer protocol read (raw bytes)
//! - `GET /stats/:group` - Group performance counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
