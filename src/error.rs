//! Error taxonomy and error-to-HTTP response conversion.
//!
//! Handlers return [`Result`] directly; [`RecasterError`] implements
//! `IntoResponse` with a JSON `{error, code}` envelope. Upstream statuses
//! that matter to players (range errors, missing segments) are mirrored
//! rather than collapsed to 500, so a client can tell "video missing" apart
//! from "transient proxy failure".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecasterError>;

#[derive(Debug, Error)]
pub enum RecasterError {
    /// Upstream item/playlist does not exist (upstream 404)
    #[error("not found: {0}")]
    NotFound(String),

    /// A segment/playlist path that cannot be parsed into an address.
    /// A client/proxy contract mismatch, not missing content.
    #[error("malformed segment address: {0}")]
    MalformedAddress(String),

    /// Network-level failure talking to the upstream server
    #[error("upstream request failed: {0}")]
    Upstream(reqwest::Error),

    /// Upstream connect or read timeout expired
    #[error("upstream timed out: {0}")]
    UpstreamTimeout(String),

    /// Upstream returned a non-2xx status for a metadata or playlist fetch
    #[error("upstream returned {status}")]
    UpstreamStatus { status: StatusCode },

    /// Upstream returned a non-2xx status for a stream fetch. The original
    /// status is preserved for the HTTP envelope (416 stays 416 — collapsing
    /// to 500 breaks player seek behavior).
    #[error("upstream stream fetch returned {status}")]
    UpstreamStream { status: StatusCode },

    /// A single HLS segment fetch failed. Carries the upstream body text:
    /// segment failures are common during seeking/transcoding warm-up and
    /// must be distinguishable from manifest failures.
    #[error("segment fetch returned {status}: {body}")]
    SegmentFetch { status: StatusCode, body: String },
}

impl From<reqwest::Error> for RecasterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecasterError::UpstreamTimeout(e.to_string())
        } else {
            RecasterError::Upstream(e)
        }
    }
}

impl RecasterError {
    fn status(&self) -> StatusCode {
        match self {
            RecasterError::NotFound(_) => StatusCode::NOT_FOUND,
            RecasterError::MalformedAddress(_) => StatusCode::BAD_REQUEST,
            RecasterError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RecasterError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RecasterError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            // Mirror the upstream status so players see the real condition
            RecasterError::UpstreamStream { status } => *status,
            RecasterError::SegmentFetch { status, .. } => *status,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RecasterError::NotFound(_) => "not_found",
            RecasterError::MalformedAddress(_) => "malformed_address",
            RecasterError::Upstream(_) => "upstream_error",
            RecasterError::UpstreamTimeout(_) => "upstream_timeout",
            RecasterError::UpstreamStatus { .. } => "upstream_status",
            RecasterError::UpstreamStream { .. } => "upstream_stream_error",
            RecasterError::SegmentFetch { .. } => "segment_fetch_error",
        }
    }
}

impl IntoResponse for RecasterError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}
