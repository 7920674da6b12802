//! Video and playlist probing via the external extraction tool (yt-dlp).
//!
//! `-J` dumps a JSON description of one video with the selected format(s);
//! `--flat-playlist --dump-json` lists playlist entries one JSON object per
//! line. Stream selection stays inside the tool via format expressions.

mod classify;
mod parse;

pub use classify::classify_extractor_stderr;
pub use parse::{parse_playlist_listing, parse_video_probe};

use std::path::Path;

use tokio::process::Command;

use crate::error::DownloadError;
use crate::item::DownloadMode;

/// A single downloadable stream: enough to fetch and name the payload.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub format_id: String,
    /// Container extension as reported by the extractor (mp4, m4a, webm...).
    pub ext: String,
    /// Direct, already-resolved media URL.
    pub url: String,
    pub kind: StreamKind,
    /// Exact size if known; used to detect short transfers.
    pub filesize: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Video-only elementary stream.
    Video,
    /// Audio-only elementary stream.
    Audio,
    /// Self-contained (progressive) stream carrying both.
    Muxed,
}

/// Probe result for one video, with the mode's streams already selected:
/// one descriptor for single-stream modes, video+audio for adaptive.
#[derive(Debug, Clone)]
pub struct VideoProbe {
    pub id: String,
    pub title: String,
    pub uploader: Option<String>,
    /// `YYYYMMDD` as reported by the extractor.
    pub upload_date: Option<String>,
    pub duration_secs: Option<f64>,
    pub streams: Vec<StreamDescriptor>,
}

impl VideoProbe {
    /// Year portion of the upload date, for container metadata.
    pub fn upload_year(&self) -> Option<String> {
        self.upload_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .map(str::to_string)
    }
}

/// One entry of a playlist listing, in playlist order.
#[derive(Debug, Clone)]
pub struct PlaylistEntry {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
}

/// Format expression handed to the tool for each mode. The actual selection
/// heuristics (codec ranking, bitrate ordering) are the tool's business.
pub fn format_expr(mode: DownloadMode) -> &'static str {
    match mode {
        DownloadMode::Progressive => "best[vcodec!=none][acodec!=none]/best",
        DownloadMode::Adaptive => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/bestvideo+bestaudio",
        DownloadMode::AudioOnly => "bestaudio[ext=m4a]/bestaudio",
        DownloadMode::VideoOnly => "bestvideo[ext=mp4]/bestvideo",
    }
}

/// Resolves one video URL into stream descriptors for the given mode.
/// Unavailability (private, region-blocked, ...) comes back as
/// `Unavailable` so callers can skip instead of fail.
pub async fn probe_video(
    ytdlp: &Path,
    url: &str,
    mode: DownloadMode,
) -> Result<VideoProbe, DownloadError> {
    let output = Command::new(ytdlp)
        .args([
            "-J",
            "--no-warnings",
            "--no-playlist",
            "-f",
            format_expr(mode),
            url,
        ])
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(classify_extractor_stderr(&stderr));
    }
    parse_video_probe(&output.stdout)
}

/// Lists a playlist's entries in order. The listing is flat: entry metadata
/// is minimal and each entry is probed again when its worker runs.
pub async fn probe_playlist(ytdlp: &Path, url: &str) -> Result<Vec<PlaylistEntry>, DownloadError> {
    let output = Command::new(ytdlp)
        .args(["--flat-playlist", "--dump-json", "--no-warnings", url])
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(classify_extractor_stderr(&stderr));
    }
    parse_playlist_listing(&output.stdout)
}

/// True if the URL carries a playlist query parameter (`list=`).
pub fn is_playlist_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| u.query_pairs().any(|(k, _)| k == "list"))
        .unwrap_or(false)
}
