use crate::{error::Result, server::state::AppState, upstream::ItemMetadata};
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

/// Serve item metadata looked up from the upstream server
pub async fn serve_item(
    Path(item_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ItemMetadata>> {
    info!("Serving item metadata: {}", item_id);

    let item = state.upstream.fetch_item(&item_id).await?;
    Ok(Json(item))
}
