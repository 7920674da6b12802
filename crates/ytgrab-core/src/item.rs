//! Work items and per-item outcomes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::UnavailableReason;

/// How streams are chosen and combined for one video. Selection heuristics
/// stay inside the extraction tool; this only picks the format expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadMode {
    /// Single self-contained stream (audio+video), platform-capped quality.
    #[default]
    Progressive,
    /// Best video-only + best audio-only streams, muxed by the transcoder.
    Adaptive,
    /// Best audio stream only.
    AudioOnly,
    /// Best video stream only (no audio).
    VideoOnly,
}

/// One download task: a video URL plus parameters. Immutable once enqueued;
/// the batch works from a snapshot taken at call time.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub url: String,
    pub mode: DownloadMode,
}

/// Terminal result of one item's worker. Every failure is terminal for the
/// item; nothing here aborts sibling workers.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// Final artifact placed in the destination directory.
    Completed(PathBuf),
    /// Video cannot be fetched (private, region-blocked, ...).
    Skipped(UnavailableReason),
    /// The worker failed partway; intermediates were cleaned up best-effort.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serde_names() {
        let toml = "mode = \"audio_only\"";
        #[derive(Deserialize)]
        struct Wrap {
            mode: DownloadMode,
        }
        let w: Wrap = toml::from_str(toml).unwrap();
        assert_eq!(w.mode, DownloadMode::AudioOnly);
    }

    #[test]
    fn mode_default_is_progressive() {
        assert_eq!(DownloadMode::default(), DownloadMode::Progressive);
    }
}
