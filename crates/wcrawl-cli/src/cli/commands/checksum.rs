//! `wcrawl checksum` – SHA-256 of every page file in a corpus directory.

use anyhow::Result;
use std::path::Path;
use wcrawl_core::checksum;
use wcrawl_core::config::WcrawlConfig;
use wcrawl_core::corpus::{CorpusDir, PageNaming};

pub fn run_checksum(cfg: &WcrawlConfig, dir: &Path) -> Result<()> {
    let naming = PageNaming::new(cfg.page_prefix.clone(), cfg.page_suffix.clone());
    let digests = checksum::corpus_digests(&CorpusDir::with_naming(dir, naming))?;
    if digests.is_empty() {
        println!("No page files in {}.", dir.display());
    }
    for d in digests {
        println!("{}  {}", d.sha256, d.path.display());
    }
    Ok(())
}
