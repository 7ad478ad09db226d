//! The libcurl GET itself.

use super::classify::{classify_curl_error, is_unsuccessful_status};
use super::{FetchOptions, FetchOutcome};
use crate::corpus::PageWriter;
use crate::error::FetchFailure;
use std::io;
use std::time::{Duration, Instant};

/// GET `url` and stream the body into `page`. Consumes the page writer: it is
/// finished on success and abandoned (left truncated) on failure.
pub(super) fn get_into(url: &str, mut page: PageWriter, opts: &FetchOptions) -> FetchOutcome {
    let mut easy = curl::easy::Easy::new();
    if let Err(e) = configure(&mut easy, url, opts) {
        page.abandon();
        return FetchOutcome::Failure(classify_curl_error(&e, Duration::ZERO));
    }

    let mut write_error: Option<io::Error> = None;
    let started = Instant::now();
    let performed = perform(&mut easy, &mut page, &mut write_error);

    if let Err(e) = performed {
        let partial = page.abandon();
        tracing::debug!(url, partial_bytes = partial, "left truncated page in place");
        if e.is_write_error() {
            if let Some(io_err) = write_error {
                return FetchOutcome::Failure(FetchFailure::Write {
                    detail: io_err.to_string(),
                });
            }
        }
        return FetchOutcome::Failure(classify_curl_error(&e, started.elapsed()));
    }

    let http_status = easy.response_code().unwrap_or(0);
    if is_unsuccessful_status(http_status) {
        tracing::warn!(url, status = http_status, "non-success status; body saved as-is");
    }

    match page.finish() {
        Ok(bytes_written) => FetchOutcome::Success {
            bytes_written,
            http_status,
        },
        Err(e) => FetchOutcome::Failure(FetchFailure::Write {
            detail: e.to_string(),
        }),
    }
}

fn configure(
    easy: &mut curl::easy::Easy,
    url: &str,
    opts: &FetchOptions,
) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    // Timeouts must not rely on SIGALRM when many workers run in threads.
    easy.signal(false)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua)?;
    }
    Ok(())
}

fn perform(
    easy: &mut curl::easy::Easy,
    page: &mut PageWriter,
    write_error: &mut Option<io::Error>,
) -> Result<(), curl::Error> {
    let mut transfer = easy.transfer();
    transfer.write_function(|data| match page.write_all(data) {
        Ok(()) => Ok(data.len()),
        Err(e) => {
            *write_error = Some(e);
            // Short count makes curl abort with CURLE_WRITE_ERROR.
            Ok(0)
        }
    })?;
    transfer.perform()
}
