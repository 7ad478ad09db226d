//! SHA-256 digests of saved pages.
//!
//! Computed on demand, off the fetch path. Comparing the digests of two
//! corpus directories fetched from the same list shows whether the remote
//! pages were static between runs.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::corpus::CorpusDir;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest of one page file in a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDigest {
    pub index: usize,
    pub path: PathBuf,
    pub sha256: String,
}

/// Digests of every page file in `corpus`, in index order.
pub fn corpus_digests(corpus: &CorpusDir) -> Result<Vec<PageDigest>> {
    let pages = corpus
        .pages()
        .with_context(|| format!("list {}", corpus.root().display()))?;
    pages
        .into_iter()
        .map(|(index, path)| {
            let sha256 = sha256_path(&path)?;
            Ok(PageDigest { index, path, sha256 })
        })
        .collect()
}
