//! Error types for the cache node
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache node.
///
/// Variants carry owned strings and the type is `Clone` so a coalesced
/// load can hand the same error to every waiting caller.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Get was called with an empty key
    #[error("key is required")]
    EmptyKey,

    /// No group registered under the requested name
    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// The user-supplied loader failed; surfaced to the caller
    #[error("loader failed: {0}")]
    Loader(String),

    /// A remote peer fetch failed; recovered by loading locally
    #[error("peer fetch failed: {0}")]
    Peer(String),

    /// Malformed request data
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal node error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            CacheError::Loader(_) | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Peer(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache node.
pub type Result<T> = std::result::Result<T, CacheError>;
