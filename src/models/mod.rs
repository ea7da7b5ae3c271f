//! Models Module
//!
//! JSON DTOs for the node's observability endpoints.

mod responses;

pub use responses::{HealthResponse, StatsResponse};
