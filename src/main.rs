//! Cachemesh - A distributed in-memory key/value cache node
//!
//! Stands up one node: a registry with a sample group, peer routing over
//! the configured cluster, and the HTTP surface peers and clients read
//! from.

mod api;
mod cache;
mod config;
mod error;
mod group;
pub mod models;
mod peers;
mod ring;
mod singleflight;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use group::{LoaderFn, Registry};
use peers::HttpPool;

/// Main entry point for a cachemesh node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the registry and the sample "scores" group
/// 4. Wire the consistent-hash peer pool if peers are configured
/// 5. Create Axum router and start the HTTP server
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Defaults to "info" level, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachemesh=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cachemesh node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, self_url={}, peers={:?}, cache_bytes={}",
        config.server_port, config.self_url, config.peers, config.cache_bytes
    );

    let registry = Arc::new(Registry::new());

    // Sample group backed by a static source table; a real deployment
    // registers groups whose loaders reach its own data sources.
    let source: HashMap<&'static str, &'static str> =
        HashMap::from([("a", "10"), ("b", "20"), ("c", "30")]);
    let group = registry.new_group(
        "scores",
        config.cache_bytes,
        Arc::new(LoaderFn(move |key: &str| {
            info!(key, "loading from source table");
            source
                .get(key)
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{} not exist", key))
        })),
    );

    if !config.peers.is_empty() {
        let pool = Arc::new(HttpPool::new(config.self_url.clone()));
        pool.set_peers(&config.peers);
        group.register_peers(pool);
        info!("Peer routing enabled across {} nodes", config.peers.len());
    }

    let app = create_router(AppState::new(registry));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind server port");
    info!("Node listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!("Node shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
