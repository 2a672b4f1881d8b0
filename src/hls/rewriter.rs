//! Line-oriented M3U8 rewriting.
//!
//! The upstream transcoder emits playlists whose segment and sub-playlist
//! references point at its own URL space. This module reclassifies every
//! line with an explicit tagged parser and rewrites only the reference
//! lines so they route back through the proxy. Tag lines, blank lines,
//! ordering, and line terminators pass through byte-for-byte — players are
//! strict about manifest structure, and a reserialization pass that
//! reorders or normalizes anything risks mis-numbered segments.

use crate::hls::address::SegmentAddress;

/// Classification of a single playlist line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Comment or `#EXT` tag line
    Tag,
    /// Empty or whitespace-only line
    Blank,
    /// Media segment reference; `file` is the final path component with any
    /// query string stripped
    Segment { file: &'a str },
    /// Sub-playlist reference inside a master playlist
    SubPlaylist { file: &'a str },
    /// Anything else passes through untouched
    Other,
}

/// Classify one line of an M3U8 document.
///
/// Reference lines are inspected by the extension of their final path
/// component (query string stripped first), so absolute URLs, relative
/// paths, and bare filenames all normalize the same way. A tag line
/// containing the literal text ".ts" stays a tag.
pub fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with('#') {
        return LineKind::Tag;
    }

    let path = line.split('?').next().unwrap_or(line).trim();
    let file = path.rsplit('/').next().unwrap_or(path);

    if file.ends_with(".m3u8") {
        LineKind::SubPlaylist { file }
    } else if file.ends_with(".ts") {
        LineKind::Segment { file }
    } else {
        LineKind::Other
    }
}

/// Rewrite a playlist so every reference routes through the proxy.
///
/// Segment lines become `/Videos/{video_id}/hls/{playlist_id}/{file}`;
/// sub-playlist lines become `/Videos/{video_id}/hls/{file}`. Everything
/// else, including the original line terminators and any trailing newline,
/// is preserved exactly. A playlist with zero reference lines comes back
/// unchanged.
pub fn rewrite_playlist(content: &str, video_id: &str, playlist_id: &str) -> String {
    let mut out = String::with_capacity(content.len());

    for chunk in content.split_inclusive('\n') {
        // Separate the line body from its terminator so the rewrite never
        // disturbs \n vs \r\n or the presence of a final newline.
        let (line, terminator) = match chunk.strip_suffix("\r\n") {
            Some(line) => (line, "\r\n"),
            None => match chunk.strip_suffix('\n') {
                Some(line) => (line, "\n"),
                None => (chunk, ""),
            },
        };

        match classify(line) {
            LineKind::Segment { file } => {
                let addr = SegmentAddress::new(video_id, playlist_id, file);
                out.push_str(&addr.to_string());
            }
            LineKind::SubPlaylist { file } => {
                out.push_str(&format!("/Videos/{video_id}/hls/{file}"));
            }
            LineKind::Tag | LineKind::Blank | LineKind::Other => {
                out.push_str(line);
            }
        }
        out.push_str(terminator);
    }

    out
}
