//! Error taxonomy shared by the loader, dispatcher, fetch workers and scanner.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal, pre-dispatch errors. No page is fetched when one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The URL source could not be opened or read.
    #[error("cannot read URL source {origin}: {source}")]
    SourceUnreadable {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    /// Every line was rejected (or the source was empty).
    #[error("no valid URLs found in {origin}")]
    EmptyResult { origin: String },
    /// A setting is out of range (e.g. zero concurrency).
    #[error("invalid setting: {0}")]
    Invalid(String),
    /// The config file exists but could not be read or parsed.
    #[error("config file {path}: {detail}")]
    ConfigFile { path: PathBuf, detail: String },
}

/// Infrastructure failure of the dispatcher itself.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("cannot prepare corpus directory {path}: {source}")]
    CorpusUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn any fetch worker: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
    #[error("dispatched {expected} entries but only {received} results arrived")]
    LostResults { expected: usize, received: usize },
}

/// Why a single page fetch failed. Never escalated beyond its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchFailure {
    #[error("cannot create {}: {detail}", path.display())]
    FileOpen { path: PathBuf, detail: String },
    #[error("transport error: {detail}")]
    Transport { detail: String },
    #[error("timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },
    #[error("write failed: {detail}")]
    Write { detail: String },
    #[error("worker panicked: {detail}")]
    Panicked { detail: String },
}

/// Scanner failures that stop the scan. Per-file problems are reported in the
/// scan report instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read corpus directory {path}: {source}")]
    DirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
