//! Per-item download pipeline: probe, transfer, optional mux, finalize.
//!
//! All per-item failures terminate in an `ItemOutcome`; nothing here
//! propagates into sibling workers or the batch call.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::YtgrabConfig;
use crate::error::DownloadError;
use crate::item::{DownloadMode, ItemOutcome, WorkItem};
use crate::mux::{self, MuxMetadata};
use crate::naming;
use crate::probe::{self, StreamKind, VideoProbe};
use crate::{finalize, transfer};

/// Intermediates live here, under the destination, so the final move is a
/// same-filesystem rename.
const PARTIAL_DIR: &str = "partial";

/// Shared, read-only context for all workers of one batch.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub ytdlp: PathBuf,
    pub ffmpeg: PathBuf,
    pub destination: PathBuf,
    pub work_dir: PathBuf,
}

impl WorkerContext {
    /// Resolves tool paths and creates the staging directory. Fails up front
    /// if the destination does not exist, before anything is dispatched.
    pub fn prepare(cfg: &YtgrabConfig, destination: PathBuf) -> Result<Self, DownloadError> {
        if !destination.is_dir() {
            return Err(DownloadError::DestinationNotFound(destination));
        }
        let work_dir = destination.join(PARTIAL_DIR);
        fs::create_dir_all(&work_dir)?;
        Ok(Self {
            ytdlp: cfg.ytdlp(),
            ffmpeg: cfg.ffmpeg(),
            destination,
            work_dir,
        })
    }

    /// Removes the staging directory if no intermediates are left behind.
    pub fn cleanup(&self) {
        let _ = fs::remove_dir(&self.work_dir);
    }
}

/// Downloads one item into the destination. Never returns an error: every
/// failure is terminal for this item only and is reported in the outcome.
pub async fn download_one(ctx: Arc<WorkerContext>, index: usize, item: WorkItem) -> ItemOutcome {
    match run_pipeline(&ctx, index, &item).await {
        Ok(path) => {
            tracing::info!(index, "downloaded {}", path.display());
            ItemOutcome::Completed(path)
        }
        Err(DownloadError::Unavailable(reason)) => {
            tracing::warn!(index, url = %item.url, "video unavailable ({}), skipping", reason);
            ItemOutcome::Skipped(reason)
        }
        Err(e) => {
            tracing::error!(index, url = %item.url, "item failed: {}", e);
            ItemOutcome::Failed(e.to_string())
        }
    }
}

async fn run_pipeline(
    ctx: &WorkerContext,
    index: usize,
    item: &WorkItem,
) -> Result<PathBuf, DownloadError> {
    let probe = probe::probe_video(&ctx.ytdlp, &item.url, item.mode).await?;
    let stem = naming::sanitize_title(&probe.title);

    match item.mode {
        DownloadMode::Adaptive => download_adaptive(ctx, index, &probe, &stem).await,
        _ => download_single_stream(ctx, index, &probe, &stem).await,
    }
}

/// Progressive/audio-only/video-only: one stream, no transcoding.
async fn download_single_stream(
    ctx: &WorkerContext,
    index: usize,
    probe: &VideoProbe,
    stem: &str,
) -> Result<PathBuf, DownloadError> {
    let stream = probe
        .streams
        .first()
        .ok_or_else(|| DownloadError::Probe("extractor returned no streams".to_string()))?;

    let staged = stream_input_path(&ctx.work_dir, "stream", index, &stream.ext);
    let fetched = fetch_blocking(stream.url.clone(), staged.clone(), stream.filesize).await;
    if fetched.is_err() {
        remove_intermediate(&staged);
    }
    fetched?;

    finalize::move_into_destination(&staged, &ctx.destination, stem, &stream.ext)
}

/// Adaptive: fetch best video and best audio concurrently, mux them with the
/// external transcoder, then clean up the intermediates.
async fn download_adaptive(
    ctx: &WorkerContext,
    index: usize,
    probe: &VideoProbe,
    stem: &str,
) -> Result<PathBuf, DownloadError> {
    let video = probe
        .streams
        .iter()
        .find(|s| s.kind == StreamKind::Video)
        .ok_or_else(|| DownloadError::Probe("no video-only stream selected".to_string()))?;
    let audio = probe
        .streams
        .iter()
        .find(|s| s.kind == StreamKind::Audio)
        .ok_or_else(|| DownloadError::Probe("no audio-only stream selected".to_string()))?;

    let video_in = stream_input_path(&ctx.work_dir, "video", index, &video.ext);
    let audio_in = stream_input_path(&ctx.work_dir, "audio", index, &audio.ext);

    // Both sub-fetches run to completion before we look at either result.
    let (video_res, audio_res) = tokio::join!(
        fetch_blocking(video.url.clone(), video_in.clone(), video.filesize),
        fetch_blocking(audio.url.clone(), audio_in.clone(), audio.filesize),
    );
    let fetch_result = video_res.and(audio_res);

    let merged = ctx.work_dir.join(format!("merged_{index}.mp4"));
    let mux_result = match fetch_result {
        Ok(()) => {
            let meta = MuxMetadata {
                author: probe.uploader.clone(),
                year: probe.upload_year(),
            };
            mux::mux_audio_video(&ctx.ffmpeg, &video_in, &audio_in, &merged, &meta).await
        }
        Err(e) => Err(e),
    };

    remove_intermediate(&video_in);
    remove_intermediate(&audio_in);
    if mux_result.is_err() {
        remove_intermediate(&merged);
    }
    mux_result?;

    finalize::move_into_destination(&merged, &ctx.destination, stem, "mp4")
}

/// Per-item-indexed intermediate name; the index keeps concurrently active
/// workers from ever sharing a filename in the common staging directory.
fn stream_input_path(work_dir: &Path, label: &str, index: usize, ext: &str) -> PathBuf {
    work_dir.join(format!("{label}_input_{index}.{ext}"))
}

async fn fetch_blocking(
    url: String,
    dest: PathBuf,
    expected_len: Option<u64>,
) -> Result<(), DownloadError> {
    tokio::task::spawn_blocking(move || transfer::fetch_stream(&url, &dest, expected_len))
        .await
        .map_err(io::Error::other)?
        .map(|_| ())
}

fn remove_intermediate(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!("could not remove intermediate {}: {}", path.display(), e);
        }
    }
}
