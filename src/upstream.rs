//! Authenticated client for the upstream media server.
//!
//! All outbound calls go through [`UpstreamClient`] so handlers never touch
//! the vendor API shape directly, and tests can point the concrete
//! [`MediaServerClient`] at a mock server. Every request carries the
//! `X-MediaBrowser-Token` credential header; no call is made without it.
//!
//! There is deliberately no retry policy here: a retried range request might
//! land at a different playback position, so failures surface immediately
//! and retries stay a player-side decision.

use crate::error::{RecasterError, Result};
use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Credential header expected by Jellyfin-compatible servers
pub const TOKEN_HEADER: &str = "X-MediaBrowser-Token";

/// Subset of upstream item metadata exposed by the proxy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemMetadata {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_time_ticks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

/// Status, relevant headers, and body stream of an upstream media fetch.
///
/// The body is never materialized: it is piped straight into the outgoing
/// response, bounding memory regardless of media file size. Dropping the
/// stream aborts the upstream transfer.
pub struct StreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
    pub content_range: Option<String>,
    pub accept_ranges: Option<String>,
    pub body: BoxStream<'static, std::result::Result<Bytes, reqwest::Error>>,
}

/// Capability interface over the upstream media server.
///
/// Kept deliberately narrow so any concrete client library (or a test fake)
/// can satisfy it.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Look up item metadata by id
    async fn fetch_item(&self, id: &str) -> Result<ItemMetadata>;

    /// Request the raw media resource, forwarding `Range` when present
    async fn fetch_stream(&self, video_id: &str, range: Option<&str>) -> Result<StreamResponse>;

    /// Fetch a raw manifest body from a fully-built upstream URL
    async fn fetch_playlist(&self, url: &str) -> Result<String>;

    /// Fetch a binary MPEG-TS segment from a fully-built upstream URL
    async fn fetch_segment(&self, url: &str) -> Result<Bytes>;

    /// Base URL of the upstream server (no trailing slash)
    fn base_url(&self) -> &str;
}

/// Reqwest-backed [`UpstreamClient`] for Jellyfin-compatible servers
pub struct MediaServerClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl MediaServerClient {
    /// Build a client with bounded connect/read timeouts.
    ///
    /// No total-request timeout is set: it would cut off long-running
    /// stream transfers. Read timeout covers stalls between chunks.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.get(url).header(TOKEN_HEADER, &self.api_token)
    }
}

#[async_trait]
impl UpstreamClient for MediaServerClient {
    async fn fetch_item(&self, id: &str) -> Result<ItemMetadata> {
        let url = format!("{}/Items/{}", self.base_url, id);
        info!("Fetching item metadata: {}", url);

        let response = self.get(&url).send().await?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        if status == StatusCode::NOT_FOUND {
            return Err(RecasterError::NotFound(format!("item {id}")));
        }
        if !status.is_success() {
            warn!("Item fetch for {} returned {}", id, status);
            return Err(RecasterError::UpstreamStatus { status });
        }

        Ok(response.json::<ItemMetadata>().await?)
    }

    async fn fetch_stream(&self, video_id: &str, range: Option<&str>) -> Result<StreamResponse> {
        let url = format!("{}/Videos/{}/stream", self.base_url, video_id);
        info!("Opening upstream stream: {} (range: {:?})", url, range);

        let mut request = self.get(&url);
        if let Some(range) = range {
            request = request.header(header::RANGE, range);
        }

        let response = request.send().await?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        if !status.is_success() {
            warn!("Stream fetch for {} returned {}", video_id, status);
            return Err(RecasterError::UpstreamStream { status });
        }

        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Ok(StreamResponse {
            status,
            content_type: header_value(header::CONTENT_TYPE),
            content_length: header_value(header::CONTENT_LENGTH),
            content_range: header_value(header::CONTENT_RANGE),
            accept_ranges: header_value(header::ACCEPT_RANGES),
            body: response.bytes_stream().boxed(),
        })
    }

    async fn fetch_playlist(&self, url: &str) -> Result<String> {
        info!("Fetching playlist: {}", url);

        let response = self.get(url).send().await?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        if status == StatusCode::NOT_FOUND {
            return Err(RecasterError::NotFound(format!("playlist {url}")));
        }
        if !status.is_success() {
            warn!("Playlist fetch returned {} for {}", status, url);
            return Err(RecasterError::UpstreamStatus { status });
        }

        Ok(response.text().await?)
    }

    async fn fetch_segment(&self, url: &str) -> Result<Bytes> {
        info!("Fetching segment: {}", url);

        // The transcoding endpoint expects a range header on segment
        // requests; bytes=0- asks for the whole segment.
        let response = self
            .get(url)
            .header(header::ACCEPT, "video/mp2t")
            .header(header::RANGE, "bytes=0-")
            .send()
            .await?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Segment fetch returned {} for {}: {}", status, url, body);
            return Err(RecasterError::SegmentFetch { status, body });
        }

        Ok(response.bytes().await?)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
