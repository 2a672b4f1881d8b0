use crate::{error::RecasterError, error::Result, hls::rewriter, metrics, server::state::AppState};
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// Serve a rewritten HLS playlist under `/stream/{video_id}/{name}`.
///
/// `master.m3u8` maps to the upstream master playlist; any other `.m3u8`
/// name is a quality playlist. Pass-through query parameters (DeviceId,
/// codec negotiation, PlaySessionId, ...) are forwarded verbatim — the
/// upstream transcoder needs them for bitrate/codec selection.
pub async fn serve_playlist(
    Path((video_id, playlist_name)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
    State(state): State<AppState>,
) -> Result<Response> {
    rewrite_and_serve(&state, &video_id, &playlist_name, &params, raw_query).await
}

/// Serve a quality playlist referenced by a rewritten master playlist
/// (`/Videos/{video_id}/hls/{name}.m3u8`)
pub async fn serve_quality_playlist(
    Path((video_id, playlist_name)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
    State(state): State<AppState>,
) -> Result<Response> {
    rewrite_and_serve(&state, &video_id, &playlist_name, &params, raw_query).await
}

async fn rewrite_and_serve(
    state: &AppState,
    video_id: &str,
    playlist_name: &str,
    params: &HashMap<String, String>,
    raw_query: Option<String>,
) -> Result<Response> {
    let start = Instant::now();

    if !playlist_name.ends_with(".m3u8") {
        return Err(RecasterError::MalformedAddress(format!(
            "{video_id}/{playlist_name}"
        )));
    }

    info!("Serving playlist {} for video {}", playlist_name, video_id);

    // The master playlist lives directly under the video; quality playlists
    // live in the upstream hls/ space.
    let upstream_path = if playlist_name == "master.m3u8" {
        format!("/Videos/{video_id}/master.m3u8")
    } else {
        format!("/Videos/{video_id}/hls/{playlist_name}")
    };

    let mut url = format!("{}{}", state.upstream.base_url(), upstream_path);
    if let Some(query) = &raw_query {
        url.push('?');
        url.push_str(query);
    }

    let content = match state.upstream.fetch_playlist(&url).await {
        Ok(content) => content,
        Err(e) => {
            metrics::record_upstream_error();
            metrics::record_duration("playlist", start);
            return Err(e);
        }
    };

    // Segment references need the session playlist id so the client's
    // follow-up requests carry the right transcode context.
    let playlist_id = params
        .get("PlaylistId")
        .map(String::as_str)
        .unwrap_or("main");

    let rewritten = rewriter::rewrite_playlist(&content, video_id, playlist_id);

    metrics::record_request("playlist", 200);
    metrics::record_duration("playlist", start);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/vnd.apple.mpegurl"),
            // Manifests change per session and must never be cached
            (header::CACHE_CONTROL, "no-cache"),
        ],
        rewritten,
    )
        .into_response())
}
