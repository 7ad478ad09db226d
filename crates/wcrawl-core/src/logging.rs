//! Tracing setup: an append-only log file under the XDG state directory,
//! with stderr as the fallback sink.
//!
//! Fetch workers log from their own threads, so both sinks include thread
//! names (`fetch-1`, `fetch-2`, ...). `RUST_LOG` overrides the default filter.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "wcrawl.log";

const DEFAULT_FILTER: &str = "info,wcrawl_core=debug,wcrawl=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/wcrawl/wcrawl.log`, creating the directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("wcrawl")?;
    dirs.place_state_file(LOG_FILE_NAME)
        .context("create wcrawl state directory")
}

/// Log to the state file. Returns Err when the file cannot be opened or a
/// subscriber is already installed; callers fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "wcrawl logging initialized");
    Ok(())
}

/// Log to stderr only.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_thread_names(true)
        .try_init();
}
