use crate::{error::Result, hls::address::SegmentAddress, metrics, server::state::AppState};
use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::info;

/// Relay a binary MPEG-TS segment from the upstream transcoder.
///
/// The path is the exact inverse of the manifest rewriter's output; the
/// request's query string is forwarded verbatim so the upstream sees the
/// same session/device negotiation parameters as the master-playlist fetch.
pub async fn serve_segment(
    Path((video_id, playlist_id, segment_file)): Path<(String, String, String)>,
    RawQuery(raw_query): RawQuery,
    State(state): State<AppState>,
) -> Result<Response> {
    let start = Instant::now();

    let address = SegmentAddress::from_parts(&video_id, &playlist_id, &segment_file)?;
    info!("Serving segment: {}", address);

    let mut url = format!("{}{}", state.upstream.base_url(), address.upstream_path());
    if let Some(query) = &raw_query {
        url.push('?');
        url.push_str(query);
    }

    let bytes = match state.upstream.fetch_segment(&url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            // Segment failures are common during seeking and transcoder
            // warm-up; only this request fails, never the session.
            metrics::record_upstream_error();
            metrics::record_duration("segment", start);
            return Err(e);
        }
    };

    info!("Segment {} fetched: {} bytes", address, bytes.len());
    metrics::record_request("segment", 200);
    metrics::record_duration("segment", start);

    let length = bytes.len().to_string();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "video/mp2t"),
            (header::CONTENT_LENGTH, length.as_str()),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from(bytes),
    )
        .into_response())
}
