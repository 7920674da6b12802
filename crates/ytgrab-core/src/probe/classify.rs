//! Map extractor stderr onto the unavailability taxonomy.
//!
//! The tool reports unfetchable videos as `ERROR:` lines with recognizable
//! phrasing; anything we cannot place becomes a generic probe error carrying
//! the last error line.

use crate::error::{DownloadError, UnavailableReason};

/// Classifies a failed extractor run from its stderr.
///
/// Unavailability (skip-and-continue) is distinguished from genuine tool
/// failures (reported as `Probe`).
pub fn classify_extractor_stderr(stderr: &str) -> DownloadError {
    let lower = stderr.to_lowercase();

    if lower.contains("private video") {
        return DownloadError::Unavailable(UnavailableReason::Private);
    }
    if lower.contains("members-only") || lower.contains("join this channel") {
        return DownloadError::Unavailable(UnavailableReason::MembersOnly);
    }
    if lower.contains("not available in your country")
        || (lower.contains("geo") && lower.contains("restrict"))
    {
        return DownloadError::Unavailable(UnavailableReason::RegionBlocked);
    }
    if lower.contains("confirm your age") || lower.contains("age-restricted") {
        return DownloadError::Unavailable(UnavailableReason::AgeRestricted);
    }
    if lower.contains("live event") || lower.contains("premieres in") {
        return DownloadError::Unavailable(UnavailableReason::Live);
    }
    if lower.contains("video unavailable")
        || lower.contains("has been removed")
        || lower.contains("no longer available")
    {
        return DownloadError::Unavailable(UnavailableReason::Removed);
    }

    DownloadError::Probe(last_error_line(stderr))
}

/// Last `ERROR:` line with the prefix stripped, or the trimmed tail of
/// stderr when the tool printed no structured error.
fn last_error_line(stderr: &str) -> String {
    let line = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.to_lowercase().starts_with("error"));

    match line {
        Some(l) => l
            .strip_prefix("ERROR: ")
            .or_else(|| l.strip_prefix("ERROR:"))
            .unwrap_or(l)
            .to_string(),
        None => {
            let trimmed = stderr.trim();
            let mut end = trimmed.len().min(300);
            while end > 0 && !trimmed.is_char_boundary(end) {
                end -= 1;
            }
            trimmed[..end].to_string()
        }
    }
}
