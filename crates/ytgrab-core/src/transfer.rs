//! Single-stream HTTP GET transfer for resolved stream URLs.
//!
//! Writes the response body sequentially to the given path. Runs on the
//! current thread; call from `spawn_blocking` when used from async code.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::DownloadError;

/// Some CDN endpoints refuse requests without a browser-looking UA.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Downloads `url` with a single GET, writing sequentially to `dest`.
/// Returns the number of bytes written.
///
/// There is no overall deadline: a dispatched transfer runs to completion or
/// error. Stalled connections are cut by the low-speed guard instead.
pub fn fetch_stream(
    url: &str,
    dest: &Path,
    expected_len: Option<u64>,
) -> Result<u64, DownloadError> {
    let file = File::create(dest)?;
    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if let Err(e) = writer.write_all(data) {
                tracing::warn!("stream write failed: {}", e);
                return Ok(0); // abort transfer
            }
            written += data.len() as u64;
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::Http(code));
    }

    writer.flush()?;

    if let Some(expected) = expected_len {
        if written != expected {
            return Err(DownloadError::PartialTransfer {
                expected,
                received: written,
            });
        }
    }
    Ok(written)
}
