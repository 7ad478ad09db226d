//! Dispatcher: runs one fetch per URL entry on a bounded worker pool.
//!
//! Entries go into a shared queue in list order; at most `max_concurrent`
//! worker threads pull from it. Each worker sends its `FetchResult` over an
//! mpsc channel, and only the dispatcher thread folds results into the
//! `RunSummary`. Workers are scoped threads, so `run` cannot return while any
//! of them is still alive.

mod summary;

pub use summary::{FailureRecord, RunSummary};

use crate::config::WcrawlConfig;
use crate::corpus::{CorpusDir, PageNaming};
use crate::error::{DispatchError, FetchFailure};
use crate::fetch::{self, FetchOptions, FetchOutcome, FetchResult, WorkerState};
use crate::url_list::{UrlEntry, UrlList};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::{mpsc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    corpus: CorpusDir,
    fetch: FetchOptions,
    max_concurrent: usize,
}

impl Dispatcher {
    pub fn new(corpus: CorpusDir, fetch: FetchOptions, max_concurrent: usize) -> Self {
        Self {
            corpus,
            fetch,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Build a dispatcher writing into `corpus_root` with the configured naming,
    /// timeouts and concurrency ceiling.
    pub fn from_config(cfg: &WcrawlConfig, corpus_root: &Path) -> Self {
        let naming = PageNaming::new(cfg.page_prefix.clone(), cfg.page_suffix.clone());
        Self::new(
            CorpusDir::with_naming(corpus_root, naming),
            FetchOptions::from_config(cfg),
            cfg.max_concurrent,
        )
    }

    pub fn corpus(&self) -> &CorpusDir {
        &self.corpus
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Fetch every entry and wait for all of them.
    pub fn run(&self, list: UrlList) -> Result<RunSummary, DispatchError> {
        self.run_observed(list, |_| {})
    }

    /// Like `run`, calling `on_result` on the dispatcher thread as each result arrives.
    pub fn run_observed<F>(&self, list: UrlList, on_result: F) -> Result<RunSummary, DispatchError>
    where
        F: FnMut(&FetchResult),
    {
        let corpus = &self.corpus;
        let opts = &self.fetch;
        self.run_with(list, |entry| fetch::fetch_page(entry, corpus, opts), on_result)
    }

    /// Run `worker` once per entry on the bounded pool.
    pub fn run_with<W, F>(
        &self,
        list: UrlList,
        worker: W,
        mut on_result: F,
    ) -> Result<RunSummary, DispatchError>
    where
        W: Fn(&UrlEntry) -> FetchResult + Sync,
        F: FnMut(&FetchResult),
    {
        self.corpus
            .ensure()
            .map_err(|source| DispatchError::CorpusUnavailable {
                path: self.corpus.root().to_path_buf(),
                source,
            })?;

        let started = Instant::now();
        let expected = list.len();
        let queue: Mutex<VecDeque<UrlEntry>> = Mutex::new(list.into_entries().into());
        let num_workers = self.max_concurrent.min(expected).max(1);
        tracing::info!(
            entries = expected,
            workers = num_workers,
            corpus = %self.corpus.root().display(),
            "dispatch started"
        );

        let mut summary = RunSummary::default();
        thread::scope(|scope| -> Result<(), DispatchError> {
            let (tx, rx) = mpsc::channel::<FetchResult>();
            let mut spawned = 0usize;
            let mut last_spawn_error = None;

            for slot in 1..=num_workers {
                let tx = tx.clone();
                let queue = &queue;
                let worker = &worker;
                let spawn = thread::Builder::new()
                    .name(format!("fetch-{}", slot))
                    .spawn_scoped(scope, move || {
                        while let Some(entry) = next_entry(queue) {
                            let result = run_guarded(worker, &entry);
                            if tx.send(result).is_err() {
                                break;
                            }
                        }
                    });
                match spawn {
                    Ok(_) => spawned += 1,
                    Err(e) => {
                        tracing::warn!(slot, "could not spawn fetch worker: {}", e);
                        last_spawn_error = Some(e);
                    }
                }
            }
            drop(tx);

            if spawned == 0 {
                if let Some(source) = last_spawn_error {
                    return Err(DispatchError::Spawn { source });
                }
            } else if spawned < num_workers {
                tracing::warn!(spawned, requested = num_workers, "running with a smaller pool");
            }

            // Ends once every worker has drained the queue and dropped its sender.
            for result in rx {
                on_result(&result);
                summary.record(result);
            }
            Ok(())
        })?;

        summary.finish(started.elapsed());
        if summary.total() != expected {
            return Err(DispatchError::LostResults {
                expected,
                received: summary.total(),
            });
        }

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            bytes = summary.bytes_written,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "dispatch finished"
        );
        Ok(summary)
    }
}

fn next_entry(queue: &Mutex<VecDeque<UrlEntry>>) -> Option<UrlEntry> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}

/// Run one entry, turning a panic into a `Panicked` failure so every entry
/// still yields exactly one result.
fn run_guarded<W>(worker: &W, entry: &UrlEntry) -> FetchResult
where
    W: Fn(&UrlEntry) -> FetchResult,
{
    tracing::debug!(index = entry.index(), state = %WorkerState::Fetching, url = entry.raw());
    let started = Instant::now();
    let result = match panic::catch_unwind(AssertUnwindSafe(|| worker(entry))) {
        Ok(result) => result,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            tracing::error!(index = entry.index(), "fetch worker panicked: {}", detail);
            FetchResult::new(
                entry,
                FetchOutcome::Failure(FetchFailure::Panicked { detail }),
                started.elapsed(),
            )
        }
    };
    tracing::debug!(index = entry.index(), state = %result.outcome().state());
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
