//! `wcrawl scan` – count vocabulary terms across a corpus directory.

use anyhow::{bail, Result};
use std::path::Path;
use wcrawl_core::config::WcrawlConfig;
use wcrawl_core::scan::{self, ScanReport, Vocabulary};

pub fn run_scan(
    cfg: &WcrawlConfig,
    dir: &Path,
    words: &[String],
    exclude: &[String],
) -> Result<ScanReport> {
    let vocab = vocabulary(cfg, words)?;

    let mut skip = cfg.scan_exclude.clone();
    skip.extend(exclude.iter().cloned());

    let report = scan::scan_dir(dir, &vocab, &skip)?;
    print_report(&report, dir);
    Ok(report)
}

/// Words from the command line win over the configured vocabulary.
pub(crate) fn vocabulary(cfg: &WcrawlConfig, words: &[String]) -> Result<Vocabulary> {
    let vocab = if words.is_empty() {
        Vocabulary::new(cfg.vocabulary.iter())
    } else {
        Vocabulary::new(words.iter())
    };
    if vocab.is_empty() {
        bail!("no words to count; pass --word or set `vocabulary` in the config");
    }
    Ok(vocab)
}

pub(crate) fn print_report(report: &ScanReport, dir: &Path) {
    for s in &report.skipped {
        eprintln!("warning: skipped {}: {}", s.path.display(), s.reason);
    }
    println!(
        "Scanned {} file(s) in {}",
        report.files_scanned,
        dir.display()
    );
    print!("{}", report.counts);
}
