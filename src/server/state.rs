use crate::config::Config;
use crate::upstream::{MediaServerClient, UpstreamClient};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application state shared across all handlers.
///
/// The upstream client is behind the [`UpstreamClient`] trait and injected
/// at construction, so tests can swap in a fake without touching handlers.
/// Nothing here is mutable: the proxy holds no per-session state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Authenticated client for the upstream media server
    pub upstream: Arc<dyn UpstreamClient>,
    /// Server start time, reported by the health endpoint
    pub started_at: Instant,
}

impl AppState {
    /// Create an AppState with the reqwest-backed upstream client
    pub fn new(config: Config) -> Self {
        let upstream = Arc::new(MediaServerClient::new(
            &config.upstream_url,
            &config.api_token,
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.read_timeout_secs),
        ));
        Self::with_upstream(config, upstream)
    }

    /// Create an AppState with an explicit upstream client
    pub fn with_upstream(config: Config, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
            started_at: Instant::now(),
        }
    }
}
