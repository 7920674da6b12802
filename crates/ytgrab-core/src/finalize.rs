//! Moving finished artifacts into the destination directory.
//!
//! The destination is append-only: a same-named file is disambiguated with a
//! ` (n)` suffix, never overwritten. The free name is reserved with
//! `create_new` so two workers racing on the same title cannot pick the same
//! target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::DownloadError;

/// Moves `artifact` into `dest_dir` as `stem.ext`, disambiguating with a
/// numeric suffix if a same-named file already exists. Returns the final path.
///
/// Distinguishes the two ways a move can find nothing to do: a missing
/// destination directory (`DestinationNotFound`) and a missing intermediate
/// (`ArtifactMissing`, meaning an upstream step failed silently).
///
/// Uses a rename, so `dest_dir` must be on the same filesystem as the
/// artifact; workers stage intermediates under the destination for exactly
/// this reason.
pub fn move_into_destination(
    artifact: &Path,
    dest_dir: &Path,
    stem: &str,
    ext: &str,
) -> Result<PathBuf, DownloadError> {
    if !artifact.is_file() {
        return Err(DownloadError::ArtifactMissing(artifact.to_path_buf()));
    }
    if !dest_dir.is_dir() {
        return Err(DownloadError::DestinationNotFound(dest_dir.to_path_buf()));
    }

    let target = reserve_destination(dest_dir, stem, ext)?;
    if let Err(e) = fs::rename(artifact, &target) {
        let _ = fs::remove_file(&target);
        return Err(e.into());
    }
    tracing::debug!("moved {} -> {}", artifact.display(), target.display());
    Ok(target)
}

/// Picks a path under `dir` for `stem.ext` that does not collide with an
/// existing file and reserves it by creating it exclusively; the caller's
/// rename then replaces the placeholder.
fn reserve_destination(dir: &Path, stem: &str, ext: &str) -> io::Result<PathBuf> {
    let mut n = 0u32;
    loop {
        let name = if n == 0 {
            format!("{stem}.{ext}")
        } else {
            format!("{stem} ({n}).{ext}")
        };
        let candidate = dir.join(name);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}
