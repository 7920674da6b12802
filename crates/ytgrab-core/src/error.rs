//! Error taxonomy for batch validation, probing, transfers, and finalization.
//!
//! Per-item errors (`Unavailable`, `ExternalTool`, ...) are contained by the
//! worker and turned into per-item outcomes; only pre-dispatch validation
//! (`InvalidRange`) and CLI-level setup errors propagate to the caller.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a video cannot be fetched. Per-item: the worker skips it and the
/// batch continues; never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    Private,
    RegionBlocked,
    AgeRestricted,
    MembersOnly,
    Live,
    Removed,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnavailableReason::Private => "private",
            UnavailableReason::RegionBlocked => "region-blocked",
            UnavailableReason::AgeRestricted => "age-restricted",
            UnavailableReason::MembersOnly => "members-only",
            UnavailableReason::Live => "live",
            UnavailableReason::Removed => "removed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Malformed start/stop/step. Raised before any worker is dispatched.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// The video cannot be fetched; the item is skipped, the batch continues.
    #[error("video unavailable ({0})")]
    Unavailable(UnavailableReason),

    /// The extraction tool failed for a reason other than unavailability,
    /// or produced output we could not use.
    #[error("extractor: {0}")]
    Probe(String),

    /// Curl reported an error (timeout, connection, ...).
    #[error(transparent)]
    Curl(#[from] curl::Error),

    /// Stream response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),

    /// Transfer ended with fewer bytes than the descriptor advertised.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },

    /// An external tool exited with a non-zero status.
    #[error("{tool} exited with status {status}: {stderr}")]
    ExternalTool {
        tool: &'static str,
        status: i32,
        stderr: String,
    },

    /// Destination directory missing at move time.
    #[error("destination directory does not exist: {0}")]
    DestinationNotFound(PathBuf),

    /// The intermediate file vanished before the move, meaning an upstream
    /// step failed without reporting it.
    #[error("intermediate artifact missing: {0}")]
    ArtifactMissing(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
