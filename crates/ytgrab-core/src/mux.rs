//! External transcoder invocation (ffmpeg).
//!
//! Combines separately-fetched audio/video elementary streams into one
//! container without re-encoding the video. Arguments are passed as a
//! vector, never through a shell.

use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;

use crate::error::DownloadError;

/// Metadata tags carried into the muxed container.
#[derive(Debug, Clone, Default)]
pub struct MuxMetadata {
    pub author: Option<String>,
    pub year: Option<String>,
}

/// Muxes `video_in` + `audio_in` into `output` (video copied, audio encoded
/// to AAC for mp4 compatibility). Non-zero exit is surfaced as
/// `ExternalTool`; the output file is only trusted on success.
pub async fn mux_audio_video(
    ffmpeg: &Path,
    video_in: &Path,
    audio_in: &Path,
    output: &Path,
    meta: &MuxMetadata,
) -> Result<(), DownloadError> {
    let args = build_mux_args(video_in, audio_in, output, meta);
    tracing::debug!("running {} with {} args", ffmpeg.display(), args.len());

    let out = Command::new(ffmpeg).args(&args).output().await?;
    if !out.status.success() {
        return Err(DownloadError::ExternalTool {
            tool: "ffmpeg",
            status: out.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(())
}

fn build_mux_args(
    video_in: &Path,
    audio_in: &Path,
    output: &Path,
    meta: &MuxMetadata,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        video_in.into(),
        "-i".into(),
        audio_in.into(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
    ];
    if let Some(author) = &meta.author {
        args.push("-metadata".into());
        args.push(format!("artist={author}").into());
    }
    if let Some(year) = &meta.year {
        args.push("-metadata".into());
        args.push(format!("date={year}").into());
    }
    args.push(output.into());
    args
}
