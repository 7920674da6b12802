//! `ytgrab probe <url>` – show what the extractor would pick.

use anyhow::Result;
use ytgrab_core::config::YtgrabConfig;
use ytgrab_core::item::DownloadMode;
use ytgrab_core::probe::{self, StreamKind};

pub async fn run_probe(cfg: &YtgrabConfig, url: &str, mode: DownloadMode) -> Result<()> {
    let probe = probe::probe_video(&cfg.ytdlp(), url, mode).await?;

    println!("{} ({})", probe.title, probe.id);
    if let Some(uploader) = &probe.uploader {
        println!("by {uploader}");
    }
    if let Some(duration) = probe.duration_secs {
        println!("duration {:.0}s", duration);
    }

    println!("{:<12} {:<6} {:<8} {}", "FORMAT", "EXT", "KIND", "SIZE");
    for s in &probe.streams {
        let kind = match s.kind {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Muxed => "muxed",
        };
        let size = s
            .filesize
            .map(|b| format!("{b}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<12} {:<6} {:<8} {}", s.format_id, s.ext, kind, size);
    }
    Ok(())
}
