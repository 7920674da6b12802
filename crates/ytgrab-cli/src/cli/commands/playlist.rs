//! `ytgrab playlist <url>` – download a playlist with bounded fan-out.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use ytgrab_core::config::YtgrabConfig;
use ytgrab_core::item::{DownloadMode, ItemOutcome, WorkItem};
use ytgrab_core::probe;
use ytgrab_core::scheduler::{self, BatchEvent, RangeSpec};
use ytgrab_core::worker::{self, WorkerContext};

use crate::cli::resolve_destination;

pub async fn run_playlist(
    cfg: &YtgrabConfig,
    url: &str,
    range: RangeSpec,
    jobs: Option<usize>,
    mode: DownloadMode,
    destination: Option<PathBuf>,
) -> Result<()> {
    let entries = probe::probe_playlist(&cfg.ytdlp(), url).await?;
    if entries.is_empty() {
        println!("Playlist has no entries.");
        return Ok(());
    }
    tracing::info!("playlist listed {} entries", entries.len());

    // Validate the selection before preparing anything.
    let selected = range.resolve(entries.len())?;

    let items: Vec<WorkItem> = entries
        .iter()
        .map(|e| WorkItem {
            url: e.url.clone(),
            mode,
        })
        .collect();

    let dest = resolve_destination(cfg, destination)?;
    let ctx = Arc::new(WorkerContext::prepare(cfg, dest)?);
    let max_concurrency = jobs.unwrap_or(cfg.max_concurrency);

    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<BatchEvent>(16);
    let printer = tokio::spawn(async move {
        while let Some(ev) = event_rx.recv().await {
            match ev {
                BatchEvent::Dispatched { index, url } => {
                    println!("[{index}] fetching {url}");
                }
                BatchEvent::Finished { index, outcome } => match outcome {
                    ItemOutcome::Completed(path) => {
                        println!("[{index}] done: {}", path.display());
                    }
                    ItemOutcome::Skipped(reason) => println!("[{index}] skipped ({reason})"),
                    ItemOutcome::Failed(err) => println!("[{index}] failed: {err}"),
                },
            }
        }
    });

    let report = scheduler::run_batch(&items, range, max_concurrency, Some(event_tx), {
        let ctx = Arc::clone(&ctx);
        move |index, item| {
            let ctx = Arc::clone(&ctx);
            async move { worker::download_one(ctx, index, item).await }
        }
    })
    .await?;

    let _ = printer.await;
    ctx.cleanup();

    println!(
        "{} completed, {} skipped, {} failed ({} selected of {} entries)",
        report.completed(),
        report.skipped(),
        report.failed(),
        selected.count(),
        entries.len()
    );
    Ok(())
}
