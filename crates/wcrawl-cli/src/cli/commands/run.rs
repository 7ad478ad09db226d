//! `wcrawl run` – fetch the list, then scan what this run fetched.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wcrawl_core::config::WcrawlConfig;
use wcrawl_core::corpus::{CorpusDir, PageNaming};
use wcrawl_core::scan;

use super::run_fetch;
use super::scan::{print_report, vocabulary};

pub fn run_pipeline(cfg: &WcrawlConfig, urls: &Path, out: &Path, words: &[String]) -> Result<()> {
    let vocab = vocabulary(cfg, words)?;
    let summary = run_fetch(cfg, urls, out, false)?;
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "fetch phase done, scanning {}",
        out.display()
    );

    let naming = PageNaming::new(cfg.page_prefix.clone(), cfg.page_suffix.clone());
    let corpus = CorpusDir::with_naming(out, naming);
    let pages = run_pages(&corpus, summary.total(), &cfg.scan_exclude)?;

    println!();
    let report = scan::scan_files(&pages, &vocab);
    print_report(&report, out);
    Ok(())
}

/// Page files written by a run of `count` entries. Pages with a higher index
/// are left over from an earlier, longer list and are not scanned.
pub(crate) fn run_pages(corpus: &CorpusDir, count: usize, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let pages = corpus
        .pages()
        .with_context(|| format!("list {}", corpus.root().display()))?;
    Ok(pages
        .into_iter()
        .filter(|(index, path)| {
            *index <= count
                && !path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| exclude.iter().any(|x| x == n))
        })
        .map(|(_, path)| path)
        .collect())
}
