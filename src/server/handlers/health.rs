use crate::server::state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}
