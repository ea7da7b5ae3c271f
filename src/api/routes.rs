//! API Routes
//!
//! Configures the Axum router for the cache node.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    bad_cache_path_handler, cache_get_handler, health_handler, stats_handler, AppState,
};

/// Creates the node router.
///
/// # Endpoints
/// - `GET /_cache/:group/:key` - Peer protocol read (raw bytes)
/// - `GET /stats/:group` - Group performance counters
/// - `GET /health` - Health check endpoint
///
/// Anything else under `/_cache/` is a malformed peer request and
/// answers 400.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Anything under the peer prefix that is not exactly group/key falls
    // through to the 400 handler.
    let peer_routes = Router::new()
        .route("/:group/:key", get(cache_get_handler))
        .fallback(bad_cache_path_handler);

    Router::new()
        .nest("/_cache", peer_routes)
        .route("/stats/:group", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{LoaderFn, Registry};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let registry = Arc::new(Registry::new());
        registry.new_group(
            "scores",
            1024,
            Arc::new(LoaderFn(|key: &str| match key {
                "a" => Ok(b"10".to_vec()),
                _ => Err(anyhow::anyhow!("{} not exist", key)),
            })),
        );
        create_router(AppState::new(registry))
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_cache_read_success() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_cache/scores/a")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/octet-stream"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"10");
    }

    #[tokio::test]
    async fn test_unknown_group_is_404() {
        let app = create_test_app();
        assert_eq!(status_of(app, "/_cache/nope/a").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_loader_error_is_500() {
        let app = create_test_app();
        assert_eq!(
            status_of(app, "/_cache/scores/missing").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_malformed_cache_path_is_400() {
        let app = create_test_app();
        assert_eq!(
            status_of(app, "/_cache/only-a-group").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_escaped_key_roundtrips() {
        let app = create_test_app();

        // "a" percent-encoded is still "a"; exercise an encoded byte too.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_cache/scores/%61")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();
        assert_eq!(status_of(app, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();
        assert_eq!(status_of(app, "/stats/scores").await, StatusCode::OK);
    }
}
