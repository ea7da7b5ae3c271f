//! API Handlers
//!
//! HTTP request handlers for the peer protocol and the observability
//! endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{CacheError, Result};
use crate::group::Registry;
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Named-group table for this node
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

/// Handler for GET /_cache/:group/:key
///
/// The peer protocol read: resolves the group, runs its read path, and
/// returns the raw value bytes as an octet stream. Unknown groups are
/// 404; loader failures are 500; an empty or malformed path is 400.
pub async fn cache_get_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let group = state
        .registry
        .get_group(&group_name)
        .ok_or(CacheError::NoSuchGroup(group_name))?;

    let view = group.get(&key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.into_bytes(),
    ))
}

/// Handler for anything else under the peer base path.
pub async fn bad_cache_path_handler() -> CacheError {
    CacheError::BadRequest("expected /_cache/<group>/<key>".to_string())
}

/// Handler for GET /stats/:group
///
/// Returns the group's performance counters.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let group = state
        .registry
        .get_group(&group_name)
        .ok_or(CacheError::NoSuchGroup(group_name))?;

    Ok(Json(StatsResponse::new(group.stats(), group.len())))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::LoaderFn;

    fn state_with_scores() -> AppState {
        let registry = Arc::new(Registry::new());
        registry.new_group(
            "scores",
            1024,
            Arc::new(LoaderFn(|key: &str| match key {
                "a" => Ok(b"10".to_vec()),
                _ => Err(anyhow::anyhow!("{} not exist", key)),
            })),
        );
        AppState::new(registry)
    }

    #[tokio::test]
    async fn test_cache_get_known_key() {
        let state = state_with_scores();

        let result = cache_get_handler(
            State(state),
            Path(("scores".to_string(), "a".to_string())),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_cache_get_unknown_group() {
        let state = state_with_scores();

        let result = cache_get_handler(
            State(state),
            Path(("nope".to_string(), "a".to_string())),
        )
        .await;
        assert!(matches!(result, Err(CacheError::NoSuchGroup(_))));
    }

    #[tokio::test]
    async fn test_cache_get_loader_error() {
        let state = state_with_scores();

        let result = cache_get_handler(
            State(state),
            Path(("scores".to_string(), "missing".to_string())),
        )
        .await;
        assert!(matches!(result, Err(CacheError::Loader(_))));
    }

    #[tokio::test]
    async fn test_stats_unknown_group() {
        let state = state_with_scores();

        let result = stats_handler(State(state), Path("nope".to_string())).await;
        assert!(matches!(result, Err(CacheError::NoSuchGroup(_))));
    }

    #[tokio::test]
    async fn test_stats_counts_requests() {
        let state = state_with_scores();
        let group = state.registry.get_group("scores").unwrap();
        group.get("a").await.unwrap();
        group.get("a").await.unwrap();

        let Json(response) = stats_handler(State(state), Path("scores".to_string()))
            .await
            .unwrap();
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 1);
        assert_eq!(response.entries, 1);
    }

    #[tokio::test]
    async fn test_health() {
        let Json(response) = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
