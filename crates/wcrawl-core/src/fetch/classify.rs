//! Map curl errors into per-page fetch failures.

use crate::error::FetchFailure;
use std::time::Duration;

/// Classify a curl error raised `elapsed` into the transfer. Connect and
/// total timeouts both surface as `CURLE_OPERATION_TIMEDOUT` and become
/// `Timeout`, which records the time actually spent so a connect timeout is
/// not reported as the total limit. Anything else is a transport failure
/// carrying curl's description.
pub fn classify_curl_error(e: &curl::Error, elapsed: Duration) -> FetchFailure {
    if e.is_operation_timedout() {
        return FetchFailure::Timeout {
            after_ms: elapsed.as_millis() as u64,
        };
    }
    FetchFailure::Transport {
        detail: describe(e),
    }
}

fn describe(e: &curl::Error) -> String {
    match e.extra_description() {
        Some(extra) if !extra.is_empty() => format!("{} ({})", e.description(), extra),
        _ => e.description().to_string(),
    }
}

/// True for HTTP statuses outside 2xx. Such pages are still saved.
pub fn is_unsuccessful_status(code: u32) -> bool {
    !(200..300).contains(&code)
}
