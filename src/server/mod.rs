//! HTTP server for ipa-explore
//!
//! Serves the explorer session over a JSON API. The dataset is fetched in
//! the background after the listener is up, so clients can observe the
//! `loading` state.

pub mod routes;
pub mod state;

use crate::area::source::IpaService;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::explorer::{load_dataset, Explorer};
use crate::geo::get_geocoder;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Start the HTTP server on the configured address
///
/// Runs until `shutdown` is cancelled.
pub async fn run(config: Config, shutdown: CancellationToken) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config, shutdown).await
}

/// Start the HTTP server with a specific address
pub async fn run_on(addr: &str, config: Config, shutdown: CancellationToken) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let source = IpaService::from_config(&config)?;
    let geocoder = get_geocoder(&config)?;
    let explorer = Explorer::new(config.search.nearby_count);
    let centroid_fallback = config.search.centroid_fallback;

    let state = Arc::new(AppState::new(config, explorer, geocoder, shutdown.clone()));
    let app = create_router(state.clone());

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Starting server on {}", addr);

    let loader = {
        let state = state.clone();
        let cancel = shutdown.child_token();
        tokio::spawn(async move {
            info!(url = %source.url(), "Fetching protected areas");
            let outcome = load_dataset(&source, centroid_fallback, &cancel).await;
            state.explorer.write().await.apply_load(outcome);
        })
    };

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)));

    loader.abort();
    info!("Server stopped");
    result
}
