//! Server shared state
//!
//! Holds configuration, the single explorer session and the geocoder.

use crate::area::AreaId;
use crate::config::Config;
use crate::explorer::Explorer;
use crate::geo::GeoBackend;
use crate::selection::{FocusHook, FocusToken, SelectionController};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Focus hook for the HTTP front end
///
/// Clients poll `/api/view` and react to the camera version, so the server
/// only records the request.
#[derive(Debug, Default)]
pub struct LogFocusHook;

impl FocusHook for LogFocusHook {
    fn focus_map(&self, area: AreaId, token: FocusToken) {
        info!(area, focus = %token, "Map focus requested");
    }
}

/// Shared state for the HTTP server
pub struct AppState<G> {
    /// Configuration
    pub config: Config,

    /// The explorer session shared by every client
    pub explorer: RwLock<Explorer>,

    /// Geocoding backend
    pub geocoder: G,

    /// Cancelled when the server shuts down
    pub shutdown: CancellationToken,

    started_at: DateTime<Utc>,
}

impl<G: GeoBackend> AppState<G> {
    /// Create new application state around an explorer session
    pub fn new(config: Config, explorer: Explorer, geocoder: G, shutdown: CancellationToken) -> Self {
        let explorer =
            explorer.with_selection(SelectionController::new().with_focus_hook(Arc::new(LogFocusHook)));

        Self {
            config,
            explorer: RwLock::new(explorer),
            geocoder,
            shutdown,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}
