//! `ytgrab video <url>` – download one video.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use ytgrab_core::config::YtgrabConfig;
use ytgrab_core::item::{DownloadMode, ItemOutcome, WorkItem};
use ytgrab_core::worker::{self, WorkerContext};
use ytgrab_core::probe;

use crate::cli::resolve_destination;

pub async fn run_video(
    cfg: &YtgrabConfig,
    url: &str,
    mode: DownloadMode,
    destination: Option<PathBuf>,
) -> Result<()> {
    if probe::is_playlist_url(url) {
        tracing::warn!("URL carries a playlist parameter; `ytgrab playlist` fetches every entry");
    }

    let dest = resolve_destination(cfg, destination)?;
    let ctx = Arc::new(WorkerContext::prepare(cfg, dest)?);

    let item = WorkItem {
        url: url.to_string(),
        mode,
    };
    let outcome = worker::download_one(Arc::clone(&ctx), 0, item).await;
    ctx.cleanup();

    match outcome {
        ItemOutcome::Completed(path) => {
            println!("Downloaded to {}", path.display());
            Ok(())
        }
        ItemOutcome::Skipped(reason) => {
            println!("Skipped: video unavailable ({reason})");
            Ok(())
        }
        ItemOutcome::Failed(err) => anyhow::bail!("download failed: {err}"),
    }
}
