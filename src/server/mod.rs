pub mod handlers;
pub mod state;

use crate::config::Config;
use crate::metrics;
use axum::{routing::get, Router};
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Build the complete Axum router
pub fn build_router(config: Config) -> Router {
    build_router_with_state(AppState::new(config))
}

/// Build the router around an already-constructed state (used by tests to
/// inject a fake upstream client)
pub fn build_router_with_state(state: AppState) -> Router {
    let prometheus = metrics::prometheus_handle();
    let cors_enabled = state.config.cors_enabled;

    let mut app = Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(move || async move { prometheus.render() }))
        .route("/items/{item_id}", get(handlers::item::serve_item))
        .route("/stream/{video_id}", get(handlers::stream::serve_stream))
        .route(
            "/stream/{video_id}/{playlist_name}",
            get(handlers::playlist::serve_playlist),
        )
        .route(
            "/Videos/{video_id}/hls/{playlist_name}",
            get(handlers::playlist::serve_quality_playlist),
        )
        .route(
            "/Videos/{video_id}/hls/{playlist_id}/{segment_file}",
            get(handlers::segment::serve_segment),
        )
        .with_state(state);

    if cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.port);
    let app = build_router(config);

    // Bind TCP listener
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("🚀 Server listening on http://{}", addr);

    // Start serving
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
