//! URL list loading and validation.
//!
//! Reads a newline-delimited source, keeps the lines that look like
//! `http://` / `https://` URLs and assigns each one a 1-based index in source
//! order. The index later names the output file, so it is fixed here, before
//! any worker runs.

mod entry;

pub use entry::{LineDiagnostic, RejectReason, UrlEntry};

use crate::error::ConfigError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Longest line accepted as a URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Bytes of one source line held in memory; the rest of a longer line is discarded.
pub const MAX_LINE_BYTES: usize = 16 * 1024;

/// Diagnostics kept per load. Later rejections are only counted.
pub const MAX_DIAGNOSTICS: usize = 1000;

/// Characters of a rejected line kept in its diagnostic.
const DIAGNOSTIC_TEXT_CHARS: usize = 200;

const ACCEPTED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Validated, non-empty, ordered list of URLs plus the load diagnostics.
#[derive(Debug, Clone)]
pub struct UrlList {
    entries: Vec<UrlEntry>,
    diagnostics: Vec<LineDiagnostic>,
    over_limit: usize,
    suppressed: usize,
}

impl UrlList {
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a list returned by the loader.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics for rejected or skipped lines, in source order. At most
    /// `MAX_DIAGNOSTICS` are kept.
    pub fn diagnostics(&self) -> &[LineDiagnostic] {
        &self.diagnostics
    }

    /// Rejected lines beyond `MAX_DIAGNOSTICS` that have no diagnostic.
    pub fn suppressed_diagnostics(&self) -> usize {
        self.suppressed
    }

    /// Lines dropped because the list was already full.
    pub fn skipped_over_limit(&self) -> usize {
        self.over_limit
    }

    pub fn into_entries(self) -> Vec<UrlEntry> {
        self.entries
    }
}

/// True when `line` (already trimmed) starts with an accepted scheme.
pub fn has_accepted_scheme(line: &str) -> bool {
    ACCEPTED_SCHEMES.iter().any(|s| line.starts_with(s))
}

/// Load at most `max_urls` URLs from the file at `path`.
pub fn load(path: &Path, max_urls: usize) -> Result<UrlList, ConfigError> {
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| ConfigError::SourceUnreadable {
        origin: origin.clone(),
        source,
    })?;
    load_named(BufReader::new(file), max_urls, &origin)
}

/// Load at most `max_urls` URLs from any buffered reader.
pub fn load_from_reader<R: BufRead>(reader: R, max_urls: usize) -> Result<UrlList, ConfigError> {
    load_named(reader, max_urls, "<reader>")
}

fn load_named<R: BufRead>(
    mut reader: R,
    max_urls: usize,
    origin: &str,
) -> Result<UrlList, ConfigError> {
    let mut entries: Vec<UrlEntry> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut over_limit = 0usize;
    let mut suppressed = 0usize;
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        let read = read_line_capped(&mut reader, &mut buf, MAX_LINE_BYTES).map_err(|source| {
            ConfigError::SourceUnreadable {
                origin: origin.to_string(),
                source,
            }
        })?;
        let Some(cut_short) = read else {
            break;
        };
        line_no += 1;

        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim();
        if line.is_empty() && !cut_short {
            continue;
        }

        let reason = if !has_accepted_scheme(line) {
            Some(RejectReason::InvalidScheme)
        } else if cut_short || line.len() > MAX_URL_LENGTH {
            Some(RejectReason::TooLong)
        } else if entries.len() >= max_urls {
            Some(RejectReason::OverLimit)
        } else {
            None
        };

        match reason {
            None => {
                let index = entries.len() + 1;
                tracing::debug!(index, url = line, "accepted URL");
                entries.push(UrlEntry::new(line.to_string(), index));
            }
            Some(reason) => {
                if reason == RejectReason::OverLimit {
                    over_limit += 1;
                }
                if diagnostics.len() >= MAX_DIAGNOSTICS {
                    suppressed += 1;
                    continue;
                }
                let diag = LineDiagnostic::new(line_no, clip(line), reason);
                tracing::warn!(line = line_no, reason = %reason, "skipped URL: {}", diag.text);
                diagnostics.push(diag);
            }
        }
    }

    if suppressed > 0 {
        tracing::warn!(suppressed, "further rejected lines in {} were not listed", origin);
    }
    if entries.is_empty() {
        tracing::error!("no valid URLs found in {}", origin);
        return Err(ConfigError::EmptyResult {
            origin: origin.to_string(),
        });
    }

    tracing::info!(
        accepted = entries.len(),
        rejected = diagnostics.len() + suppressed,
        "loaded URL list from {}",
        origin
    );
    Ok(UrlList {
        entries,
        diagnostics,
        over_limit,
        suppressed,
    })
}

/// Read one line into `buf`, keeping at most `cap` bytes and discarding the
/// rest. Returns `None` at EOF, otherwise whether the line was cut short.
fn read_line_capped<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    cap: usize,
) -> io::Result<Option<bool>> {
    buf.clear();
    let n = reader.by_ref().take(cap as u64).read_until(b'\n', buf)?;
    if n == 0 {
        return Ok(None);
    }
    if n < cap || buf.last() == Some(&b'\n') {
        return Ok(Some(false));
    }

    let mut cut_short = false;
    loop {
        let (used, done) = {
            let chunk = reader.fill_buf()?;
            if chunk.is_empty() {
                break;
            }
            match chunk.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    cut_short |= chunk[..i].iter().any(|b| !b.is_ascii_whitespace());
                    (i + 1, true)
                }
                None => {
                    cut_short |= chunk.iter().any(|b| !b.is_ascii_whitespace());
                    (chunk.len(), false)
                }
            }
        };
        reader.consume(used);
        if done {
            break;
        }
    }
    Ok(Some(cut_short))
}

fn clip(line: &str) -> String {
    match line.char_indices().nth(DIAGNOSTIC_TEXT_CHARS) {
        Some((at, _)) => format!("{}...", &line[..at]),
        None => line.to_string(),
    }
}
