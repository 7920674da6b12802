//! CLI for the ytgrab downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use ytgrab_core::config::{self, YtgrabConfig};
use ytgrab_core::item::DownloadMode;
use ytgrab_core::scheduler::RangeSpec;

use commands::{run_checksum, run_config, run_playlist, run_probe, run_video};

/// Top-level CLI for the ytgrab downloader.
#[derive(Debug, Parser)]
#[command(name = "ytgrab")]
#[command(about = "ytgrab: concurrent YouTube video and playlist downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Stream mode flags shared by the download commands. At most one may be
/// set; none means the configured default (usually progressive).
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct ModeFlags {
    /// Download the best audio stream only.
    #[arg(long)]
    pub audio_only: bool,

    /// Download the best video stream only (no audio).
    #[arg(long, conflicts_with = "audio_only")]
    pub video_only: bool,

    /// Fetch separate best video/audio streams and merge them with ffmpeg.
    #[arg(long, conflicts_with_all = ["audio_only", "video_only"])]
    pub max_quality: bool,
}

impl ModeFlags {
    fn resolve(&self, default: DownloadMode) -> DownloadMode {
        if self.audio_only {
            DownloadMode::AudioOnly
        } else if self.video_only {
            DownloadMode::VideoOnly
        } else if self.max_quality {
            DownloadMode::Adaptive
        } else {
            default
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a single video.
    Video {
        /// Video URL.
        url: String,

        #[command(flatten)]
        mode: ModeFlags,

        /// Destination directory (default: configured directory, else CWD).
        #[arg(long, value_name = "DIR")]
        destination: Option<PathBuf>,
    },

    /// Download a playlist with bounded concurrency.
    Playlist {
        /// Playlist URL.
        url: String,

        /// First playlist index to download (0-based).
        #[arg(long, default_value = "0")]
        start: usize,

        /// Exclusive end index (default: playlist length).
        #[arg(long)]
        stop: Option<usize>,

        /// Distance between selected indices.
        #[arg(long, default_value = "1")]
        step: usize,

        /// Download up to N items concurrently (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        #[command(flatten)]
        mode: ModeFlags,

        /// Destination directory (default: configured directory, else CWD).
        #[arg(long, value_name = "DIR")]
        destination: Option<PathBuf>,
    },

    /// Show the streams the extractor would pick for a URL.
    Probe {
        /// Video URL.
        url: String,

        #[command(flatten)]
        mode: ModeFlags,
    },

    /// Compute SHA-256 of a downloaded file.
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Show or update the stored configuration.
    Config {
        /// Set the default destination directory.
        #[arg(long, value_name = "DIR")]
        destination: Option<PathBuf>,

        /// Set the default concurrency limit for playlist batches.
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Video {
                url,
                mode,
                destination,
            } => {
                let mode = mode.resolve(cfg.default_mode);
                run_video(&cfg, &url, mode, destination).await?;
            }
            CliCommand::Playlist {
                url,
                start,
                stop,
                step,
                jobs,
                mode,
                destination,
            } => {
                let mode = mode.resolve(cfg.default_mode);
                let range = RangeSpec { start, stop, step };
                run_playlist(&cfg, &url, range, jobs, mode, destination).await?;
            }
            CliCommand::Probe { url, mode } => {
                let mode = mode.resolve(cfg.default_mode);
                run_probe(&cfg, &url, mode).await?;
            }
            CliCommand::Checksum { path } => run_checksum(Path::new(&path)).await?,
            CliCommand::Config {
                destination,
                concurrency,
            } => run_config(cfg, destination, concurrency).await?,
        }

        Ok(())
    }
}

/// Destination precedence: CLI flag, then config, then current directory.
fn resolve_destination(cfg: &YtgrabConfig, flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = &cfg.destination_dir {
        return Ok(dir.clone());
    }
    Ok(std::env::current_dir()?)
}

#[cfg(test)]
mod tests;
