use std::sync::Arc;

use inspectra_client::Backend;

use crate::config::ServerConfig;
use crate::sessions::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Open editing sessions.
    pub sessions: Arc<SessionStore>,
    /// Workflow and company API (HTTP or in-memory).
    pub backend: Arc<dyn Backend>,
    /// `"http"` or `"memory"`, reported by the health check.
    pub backend_kind: &'static str,
}
