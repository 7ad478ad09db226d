//! `wcrawl fetch` – load the URL list and fetch every page into the corpus directory.

use anyhow::{Context, Result};
use std::path::Path;
use wcrawl_core::config::WcrawlConfig;
use wcrawl_core::dispatcher::{Dispatcher, RunSummary};
use wcrawl_core::fetch::{is_unsuccessful_status, FetchOutcome, FetchResult};
use wcrawl_core::url_list;

/// Fetch every URL in `urls` into `out`. Per-page failures are reported, not
/// returned as errors; only an unusable list or corpus directory fails the command.
pub fn run_fetch(cfg: &WcrawlConfig, urls: &Path, out: &Path, json: bool) -> Result<RunSummary> {
    let list = url_list::load(urls, cfg.max_urls)?;
    for diag in list.diagnostics() {
        eprintln!("warning: {}", diag);
    }
    if list.suppressed_diagnostics() > 0 {
        eprintln!(
            "warning: {} more rejected line(s) not shown",
            list.suppressed_diagnostics()
        );
    }

    let dispatcher = Dispatcher::from_config(cfg, out);
    if !json {
        println!(
            "Fetching {} page(s) into {} ({} at a time)",
            list.len(),
            out.display(),
            dispatcher.max_concurrent()
        );
    }

    let naming = dispatcher.corpus().naming().clone();
    let summary = dispatcher.run_observed(list, |result| {
        let name = naming.file_name(result.index());
        match result.outcome() {
            FetchOutcome::Failure(_) => eprintln!("error: {}", describe_result(result, &name)),
            FetchOutcome::Success { .. } if !json => println!("  {}", describe_result(result, &name)),
            FetchOutcome::Success { .. } => {}
        }
    })?;

    if json {
        let rendered = serde_json::to_string_pretty(&summary).context("serialize summary")?;
        println!("{}", rendered);
    } else {
        print!("{}", format_summary(&summary, out));
    }
    Ok(summary)
}

/// One line per finished page.
pub(crate) fn describe_result(result: &FetchResult, file_name: &str) -> String {
    match result.outcome() {
        FetchOutcome::Success {
            bytes_written,
            http_status,
        } => {
            let note = if is_unsuccessful_status(*http_status) {
                " (saved anyway)"
            } else {
                ""
            };
            format!(
                "{} <- {} [{} bytes, HTTP {}{}]",
                file_name,
                result.url(),
                bytes_written,
                http_status,
                note
            )
        }
        FetchOutcome::Failure(reason) => {
            format!("page {} ({}): {}", result.index(), result.url(), reason)
        }
    }
}

pub(crate) fn format_summary(summary: &RunSummary, out: &Path) -> String {
    let mut s = format!(
        "Fetched {} of {} page(s) into {} ({} bytes in {:.1}s)\n",
        summary.succeeded,
        summary.total(),
        out.display(),
        summary.bytes_written,
        summary.elapsed.as_secs_f64()
    );
    if !summary.failures.is_empty() {
        s.push_str(&format!("{} failed:\n", summary.failed));
        for f in &summary.failures {
            s.push_str(&format!("  #{} {}: {}\n", f.index, f.url, f.reason));
        }
    }
    s
}
