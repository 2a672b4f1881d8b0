//! Segment address scheme shared by the manifest rewriter and segment relay.
//!
//! The rewriter emits `/Videos/{video_id}/hls/{playlist_id}/{segment_file}`
//! reference lines; the relay parses the same shape back. Formatting and
//! parsing must stay a lossless round trip for every filename the rewriter
//! can produce (dotted names, numeric-only names), so both directions live
//! in this one type.

use crate::error::{RecasterError, Result};
use std::fmt;

/// Route prefix for proxied HLS resources, identical to the upstream
/// server's own addressing so segment URLs round-trip unchanged.
pub const HLS_PREFIX: &str = "/Videos";

/// Parsed `{video_id, playlist_id, segment_file}` triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentAddress {
    pub video_id: String,
    pub playlist_id: String,
    pub segment_file: String,
}

impl SegmentAddress {
    pub fn new(
        video_id: impl Into<String>,
        playlist_id: impl Into<String>,
        segment_file: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            playlist_id: playlist_id.into(),
            segment_file: segment_file.into(),
        }
    }

    /// Parse a full request path of the form
    /// `/Videos/{video_id}/hls/{playlist_id}/{segment_file}`.
    ///
    /// Rejects anything else as [`RecasterError::MalformedAddress`] — a 400,
    /// not a 404, since it signals a contract mismatch rather than missing
    /// content.
    pub fn parse(path: &str) -> Result<Self> {
        let malformed = || RecasterError::MalformedAddress(path.to_string());

        let rest = path.strip_prefix("/Videos/").ok_or_else(malformed)?;
        let mut parts = rest.split('/');

        let video_id = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let hls = parts.next().ok_or_else(malformed)?;
        if hls != "hls" {
            return Err(malformed());
        }
        let playlist_id = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let segment_file = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self::new(video_id, playlist_id, segment_file))
    }

    /// Parse from the two trailing path components captured by the router
    /// (`{playlist_id}/{segment_file}` under `/Videos/{video_id}/hls/`)
    pub fn from_parts(video_id: &str, playlist_id: &str, segment_file: &str) -> Result<Self> {
        if video_id.is_empty() || playlist_id.is_empty() || segment_file.is_empty() {
            return Err(RecasterError::MalformedAddress(format!(
                "{video_id}/{playlist_id}/{segment_file}"
            )));
        }
        Ok(Self::new(video_id, playlist_id, segment_file))
    }

    /// Path under the upstream server's base URL. Identical to the proxy
    /// route path — the scheme is shared, which is what makes the
    /// rewrite/parse pair a bijection.
    pub fn upstream_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SegmentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/hls/{}/{}",
            HLS_PREFIX, self.video_id, self.playlist_id, self.segment_file
        )
    }
}
