//! Word-frequency scan over a downloaded corpus directory.
//!
//! Runs after the dispatcher has returned, so every file in the directory is
//! either complete or a truncated page from a failed fetch. Each regular file
//! is tokenized into runs of ASCII letters and every token is compared with a
//! fixed vocabulary. A token counts for a term when it equals the term exactly
//! or equals the term fully lowercased: `Linux` and `linux` both count for
//! "Linux", `LINUX` does not.

mod tokenize;

pub use tokenize::for_each_word;

use crate::error::ScanError;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Ordered set of terms to count.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    lowercase: Vec<String>,
}

impl Vocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        let lowercase = terms.iter().map(|t| t.to_lowercase()).collect();
        Self { terms, lowercase }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Positions of every term `token` counts for.
    fn matches<'a>(&'a self, token: &'a str) -> impl Iterator<Item = usize> + 'a {
        (0..self.terms.len()).filter(move |&i| token == self.terms[i] || token == self.lowercase[i])
    }
}

/// Per-term counts in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCounts {
    counts: Vec<(String, u64)>,
}

impl WordCounts {
    pub fn new(vocab: &Vocabulary) -> Self {
        Self {
            counts: vocab.terms().iter().map(|t| (t.clone(), 0)).collect(),
        }
    }

    pub fn get(&self, term: &str) -> Option<u64> {
        self.counts.iter().find(|(t, _)| t == term).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }

    fn bump(&mut self, i: usize) {
        self.counts[i].1 += 1;
    }
}

impl fmt::Display for WordCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (term, count) in self.iter() {
            writeln!(f, "{}: {}", term, count)?;
        }
        Ok(())
    }
}

/// A file the scanner could not read; the scan continued without it.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub counts: WordCounts,
    pub files_scanned: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Add the occurrences found in `reader` to `counts`.
pub fn count_reader<R: BufRead>(
    reader: R,
    vocab: &Vocabulary,
    counts: &mut WordCounts,
) -> io::Result<()> {
    for_each_word(reader, |word| {
        for i in vocab.matches(word) {
            counts.bump(i);
        }
    })
}

/// Scan every regular file directly inside `dir`, except names in `exclude`.
pub fn scan_dir(dir: &Path, vocab: &Vocabulary, exclude: &[String]) -> Result<ScanReport, ScanError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ScanError::DirUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                skipped.push(SkippedFile {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let name = entry.file_name();
        if exclude.iter().any(|x| name.to_str() == Some(x.as_str())) {
            tracing::debug!(file = ?name, "excluded from scan");
            continue;
        }
        match entry.file_type() {
            Ok(t) if t.is_file() => files.push(entry.path()),
            Ok(_) => tracing::debug!(file = ?name, "not a regular file; ignored"),
            Err(e) => skipped.push(SkippedFile {
                path: entry.path(),
                reason: e.to_string(),
            }),
        }
    }
    files.sort();

    let mut report = scan_files(&files, vocab);
    skipped.append(&mut report.skipped);
    report.skipped = skipped;
    tracing::info!(
        files = report.files_scanned,
        skipped = report.skipped.len(),
        "scanned corpus {}",
        dir.display()
    );
    Ok(report)
}

/// Scan exactly the given files, in the given order. A file that cannot be
/// read is listed in `skipped` and the rest are still counted.
pub fn scan_files<P: AsRef<Path>>(files: &[P], vocab: &Vocabulary) -> ScanReport {
    let mut counts = WordCounts::new(vocab);
    let mut files_scanned = 0usize;
    let mut skipped = Vec::new();
    for path in files {
        let path = path.as_ref();
        let scanned = File::open(path)
            .and_then(|f| count_reader(BufReader::new(f), vocab, &mut counts));
        match scanned {
            Ok(()) => files_scanned += 1,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }
    ScanReport {
        counts,
        files_scanned,
        skipped,
    }
}
