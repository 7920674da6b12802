use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::item::DownloadMode;

/// Global configuration loaded from `~/.config/ytgrab/config.toml`.
///
/// Holds the user preferences the GUI era kept in an ad-hoc JSON blob:
/// destination directory, default mode flags, and the concurrency limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtgrabConfig {
    /// Directory finished downloads are moved into. None = current directory.
    #[serde(default)]
    pub destination_dir: Option<PathBuf>,
    /// Upper bound on simultaneously active downloads in a playlist batch.
    pub max_concurrency: usize,
    /// Mode used when the CLI does not override it.
    #[serde(default)]
    pub default_mode: DownloadMode,
    /// Path to the extraction tool. None = `yt-dlp` on PATH.
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,
    /// Path to the transcoder. None = `ffmpeg` on PATH.
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for YtgrabConfig {
    fn default() -> Self {
        Self {
            destination_dir: None,
            max_concurrency: 5,
            default_mode: DownloadMode::default(),
            ytdlp_path: None,
            ffmpeg_path: None,
        }
    }
}

impl YtgrabConfig {
    /// Resolved extractor binary.
    pub fn ytdlp(&self) -> PathBuf {
        self.ytdlp_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("yt-dlp"))
    }

    /// Resolved transcoder binary.
    pub fn ffmpeg(&self) -> PathBuf {
        self.ffmpeg_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffmpeg"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ytgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<YtgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = YtgrabConfig::default();
        save(&default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: YtgrabConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Persist the config atomically: write a sibling temp file, then rename it
/// over the real one so concurrent readers never see a torn write.
pub fn save(cfg: &YtgrabConfig) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(cfg)?;
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, toml)?;
    fs::rename(&tmp, &path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = YtgrabConfig::default();
        assert_eq!(cfg.max_concurrency, 5);
        assert_eq!(cfg.default_mode, DownloadMode::Progressive);
        assert!(cfg.destination_dir.is_none());
        assert_eq!(cfg.ytdlp(), PathBuf::from("yt-dlp"));
        assert_eq!(cfg.ffmpeg(), PathBuf::from("ffmpeg"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = YtgrabConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: YtgrabConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.max_concurrency, cfg.max_concurrency);
        assert_eq!(parsed.default_mode, cfg.default_mode);
        assert_eq!(parsed.destination_dir, cfg.destination_dir);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            destination_dir = "/home/user/Music"
            max_concurrency = 8
            default_mode = "adaptive"
            ytdlp_path = "/opt/yt-dlp"
        "#;
        let cfg: YtgrabConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            cfg.destination_dir.as_deref(),
            Some(std::path::Path::new("/home/user/Music"))
        );
        assert_eq!(cfg.max_concurrency, 8);
        assert_eq!(cfg.default_mode, DownloadMode::Adaptive);
        assert_eq!(cfg.ytdlp(), PathBuf::from("/opt/yt-dlp"));
        assert!(cfg.ffmpeg_path.is_none());
    }

    #[test]
    fn config_toml_minimal() {
        let toml = "max_concurrency = 2";
        let cfg: YtgrabConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_concurrency, 2);
        assert_eq!(cfg.default_mode, DownloadMode::Progressive);
        assert!(cfg.ytdlp_path.is_none());
    }
}
