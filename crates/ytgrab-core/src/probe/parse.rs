//! Parsing of extractor JSON output.

use serde::Deserialize;

use crate::error::{DownloadError, UnavailableReason};

use super::{PlaylistEntry, StreamDescriptor, StreamKind, VideoProbe};

#[derive(Debug, Deserialize)]
struct RawProbe {
    id: String,
    title: String,
    uploader: Option<String>,
    upload_date: Option<String>,
    duration: Option<f64>,
    is_live: Option<bool>,
    availability: Option<String>,
    /// Present when the format expression selected separate streams (`a+b`).
    requested_formats: Option<Vec<RawFormat>>,
    // Single-format selections surface the chosen stream at the top level.
    format_id: Option<String>,
    ext: Option<String>,
    url: Option<String>,
    acodec: Option<String>,
    vcodec: Option<String>,
    filesize: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    ext: String,
    url: String,
    acodec: Option<String>,
    vcodec: Option<String>,
    filesize: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
    url: Option<String>,
    title: Option<String>,
}

fn kind_of(acodec: Option<&str>, vcodec: Option<&str>) -> StreamKind {
    let has_audio = acodec.map(|c| c != "none").unwrap_or(false);
    let has_video = vcodec.map(|c| c != "none").unwrap_or(false);
    match (has_video, has_audio) {
        (true, false) => StreamKind::Video,
        (false, true) => StreamKind::Audio,
        _ => StreamKind::Muxed,
    }
}

/// Maps the extractor's `availability` field onto the skip taxonomy.
/// Only values that make the video unfetchable for us are mapped.
fn unavailable_from_availability(availability: &str) -> Option<UnavailableReason> {
    match availability {
        "private" => Some(UnavailableReason::Private),
        "premium_only" | "subscriber_only" => Some(UnavailableReason::MembersOnly),
        "needs_auth" => Some(UnavailableReason::AgeRestricted),
        _ => None,
    }
}

/// Parses `yt-dlp -J` output into a `VideoProbe`.
///
/// Live streams and auth-gated videos are reported as `Unavailable` here even
/// though the probe itself succeeded; there is nothing we can download.
pub fn parse_video_probe(stdout: &[u8]) -> Result<VideoProbe, DownloadError> {
    let raw: RawProbe = serde_json::from_slice(stdout)
        .map_err(|e| DownloadError::Probe(format!("invalid JSON from extractor: {e}")))?;

    if raw.is_live == Some(true) {
        return Err(DownloadError::Unavailable(UnavailableReason::Live));
    }
    if let Some(reason) = raw
        .availability
        .as_deref()
        .and_then(unavailable_from_availability)
    {
        return Err(DownloadError::Unavailable(reason));
    }

    let streams: Vec<StreamDescriptor> = match raw.requested_formats {
        Some(formats) => formats
            .into_iter()
            .map(|f| StreamDescriptor {
                kind: kind_of(f.acodec.as_deref(), f.vcodec.as_deref()),
                format_id: f.format_id,
                ext: f.ext,
                url: f.url,
                filesize: f.filesize,
            })
            .collect(),
        None => {
            let url = raw
                .url
                .ok_or_else(|| DownloadError::Probe("no downloadable stream in extractor output".to_string()))?;
            vec![StreamDescriptor {
                kind: kind_of(raw.acodec.as_deref(), raw.vcodec.as_deref()),
                format_id: raw.format_id.unwrap_or_default(),
                ext: raw.ext.unwrap_or_else(|| "mp4".to_string()),
                url,
                filesize: raw.filesize,
            }]
        }
    };

    if streams.is_empty() {
        return Err(DownloadError::Probe(
            "extractor selected no formats".to_string(),
        ));
    }

    Ok(VideoProbe {
        id: raw.id,
        title: raw.title,
        uploader: raw.uploader,
        upload_date: raw.upload_date,
        duration_secs: raw.duration,
        streams,
    })
}

/// Parses `--flat-playlist --dump-json` output: one JSON object per line,
/// in playlist order. Entries without a URL get the canonical watch URL.
pub fn parse_playlist_listing(stdout: &[u8]) -> Result<Vec<PlaylistEntry>, DownloadError> {
    let text = String::from_utf8_lossy(stdout);
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let raw: RawEntry = serde_json::from_str(line)
            .map_err(|e| DownloadError::Probe(format!("invalid playlist entry: {e}")))?;
        let url = raw
            .url
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", raw.id));
        entries.push(PlaylistEntry {
            id: raw.id,
            url,
            title: raw.title,
        });
    }
    Ok(entries)
}
