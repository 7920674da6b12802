//! `ytgrab config` – show or update stored preferences.

use anyhow::Result;
use std::path::PathBuf;
use ytgrab_core::config::{self, YtgrabConfig};

pub async fn run_config(
    mut cfg: YtgrabConfig,
    destination: Option<PathBuf>,
    concurrency: Option<usize>,
) -> Result<()> {
    let mut changed = false;
    if let Some(dir) = destination {
        cfg.destination_dir = Some(dir);
        changed = true;
    }
    if let Some(n) = concurrency {
        anyhow::ensure!(n >= 1, "concurrency must be >= 1");
        cfg.max_concurrency = n;
        changed = true;
    }
    if changed {
        config::save(&cfg)?;
        println!("Saved {}", config::config_path()?.display());
    }

    let dest = cfg
        .destination_dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "(current directory)".to_string());
    println!("destination_dir = {dest}");
    println!("max_concurrency = {}", cfg.max_concurrency);
    println!("default_mode    = {:?}", cfg.default_mode);
    println!("ytdlp           = {}", cfg.ytdlp().display());
    println!("ffmpeg          = {}", cfg.ffmpeg().display());
    Ok(())
}
