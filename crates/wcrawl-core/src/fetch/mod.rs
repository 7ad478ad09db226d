//! Fetch worker: one HTTP GET per URL entry, streamed straight into its page file.
//!
//! A worker opens its output file first, then performs a single libcurl GET
//! and writes the body as it arrives. Any completed transfer counts as a
//! success regardless of HTTP status. Failures stay local to the entry: they
//! are returned as a `FetchResult`, never raised.

mod classify;
mod transfer;

pub use classify::{classify_curl_error, is_unsuccessful_status};

use crate::config::WcrawlConfig;
use crate::corpus::CorpusDir;
use crate::error::FetchFailure;
use crate::url_list::UrlEntry;
use std::fmt;
use std::time::{Duration, Instant};

/// Per-fetch curl settings shared by every worker of a run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Hard limit on the whole transfer (connect + body).
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: None,
        }
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &WcrawlConfig) -> Self {
        Self {
            timeout: cfg.fetch_timeout(),
            connect_timeout: cfg.connect_timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Lifecycle of one worker. Only `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Pending,
    Fetching,
    Succeeded,
    Failed,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Pending => "pending",
            WorkerState::Fetching => "fetching",
            WorkerState::Succeeded => "succeeded",
            WorkerState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success { bytes_written: u64, http_status: u32 },
    Failure(FetchFailure),
}

impl FetchOutcome {
    /// Terminal worker state for this outcome.
    pub fn state(&self) -> WorkerState {
        match self {
            FetchOutcome::Success { .. } => WorkerState::Succeeded,
            FetchOutcome::Failure(_) => WorkerState::Failed,
        }
    }
}

/// The single report a worker produces for its entry.
#[derive(Debug, Clone)]
pub struct FetchResult {
    index: usize,
    url: String,
    outcome: FetchOutcome,
    elapsed: Duration,
}

impl FetchResult {
    pub fn new(entry: &UrlEntry, outcome: FetchOutcome, elapsed: Duration) -> Self {
        Self {
            index: entry.index(),
            url: entry.raw().to_string(),
            outcome,
            elapsed,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.outcome {
            FetchOutcome::Failure(f) => Some(f),
            FetchOutcome::Success { .. } => None,
        }
    }
}

/// Fetch `entry` into its page file under `corpus`.
pub fn fetch_page(entry: &UrlEntry, corpus: &CorpusDir, opts: &FetchOptions) -> FetchResult {
    let started = Instant::now();
    let path = corpus.path_for(entry.index());

    let outcome = match corpus.create_page(entry.index()) {
        Ok(page) => transfer::get_into(entry.raw(), page, opts),
        Err(e) => FetchOutcome::Failure(FetchFailure::FileOpen {
            path,
            detail: e.to_string(),
        }),
    };

    let elapsed = started.elapsed();
    match &outcome {
        FetchOutcome::Success {
            bytes_written,
            http_status,
        } => {
            tracing::info!(
                index = entry.index(),
                bytes = bytes_written,
                status = http_status,
                elapsed_ms = elapsed.as_millis() as u64,
                "fetched {}",
                entry.raw()
            );
        }
        FetchOutcome::Failure(f) => {
            tracing::warn!(index = entry.index(), "fetch of {} failed: {}", entry.raw(), f);
        }
    }
    FetchResult::new(entry, outcome, elapsed)
}
