use crate::{error::Result, metrics, server::state::AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::Response,
};
use std::time::Instant;
use tracing::info;

/// Relay a continuous media file with byte-range forwarding.
///
/// The client's `Range` header goes upstream unchanged and the upstream
/// status comes back unchanged (200 or 206 — collapsing to 200 breaks
/// player seeking). The body is piped through without buffering; when the
/// client disconnects, dropping the body stream aborts the upstream fetch.
pub async fn serve_stream(
    Path(video_id): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Response> {
    let start = Instant::now();
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    info!("Serving stream: {} (range: {:?})", video_id, range);

    let upstream = match state.upstream.fetch_stream(&video_id, range).await {
        Ok(upstream) => upstream,
        Err(e) => {
            metrics::record_upstream_error();
            metrics::record_duration("stream", start);
            return Err(e);
        }
    };

    metrics::record_request("stream", upstream.status.as_u16());
    metrics::record_duration("stream", start);

    let mut response = Response::new(Body::from_stream(upstream.body));
    *response.status_mut() = upstream.status;

    // Only this header subset is forwarded; everything else upstream sends
    // is internal and must not leak to the client.
    let forwarded = [
        (header::CONTENT_TYPE, upstream.content_type),
        (header::CONTENT_LENGTH, upstream.content_length),
        (header::CONTENT_RANGE, upstream.content_range),
        (header::ACCEPT_RANGES, upstream.accept_ranges),
    ];
    for (name, value) in forwarded {
        if let Some(value) = value
            && let Ok(value) = HeaderValue::from_str(&value)
        {
            response.headers_mut().insert(name, value);
        }
    }

    Ok(response)
}
