//! End-of-run aggregation of fetch results.

use crate::error::FetchFailure;
use crate::fetch::{FetchOutcome, FetchResult};
use serde::Serialize;
use std::time::Duration;

/// One failed entry, as listed in the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub index: usize,
    pub url: String,
    pub reason: FetchFailure,
}

/// Aggregate report produced once every worker has finished.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Failed entries sorted by index.
    pub failures: Vec<FailureRecord>,
    /// Bytes written by successful fetches.
    pub bytes_written: u64,
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl RunSummary {
    /// Fold one result into the summary. Called only from the dispatcher thread.
    pub(crate) fn record(&mut self, result: FetchResult) {
        match result.outcome() {
            FetchOutcome::Success { bytes_written, .. } => {
                self.succeeded += 1;
                self.bytes_written += bytes_written;
            }
            FetchOutcome::Failure(reason) => {
                self.failed += 1;
                self.failures.push(FailureRecord {
                    index: result.index(),
                    url: result.url().to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }

    pub(crate) fn finish(&mut self, elapsed: Duration) {
        self.failures.sort_by_key(|f| f.index);
        self.elapsed = elapsed;
    }

    /// Number of results recorded.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
