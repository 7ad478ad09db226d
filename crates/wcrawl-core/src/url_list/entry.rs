//! URL entries and per-line load diagnostics.

use serde::Serialize;
use std::fmt;

/// One validated URL and its 1-based position in the source.
///
/// Only the loader constructs entries, so indices are unique and dense
/// within a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    raw: String,
    index: usize,
}

impl UrlEntry {
    pub(crate) fn new(raw: String, index: usize) -> Self {
        debug_assert!(index >= 1);
        Self { raw, index }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Why a non-blank source line did not become an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Does not start with `http://` or `https://`.
    InvalidScheme,
    /// Longer than `MAX_URL_LENGTH`.
    TooLong,
    /// Valid, but the list already holds `max_urls` entries.
    OverLimit,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InvalidScheme => write!(f, "invalid URL"),
            RejectReason::TooLong => write!(f, "URL too long"),
            RejectReason::OverLimit => write!(f, "over URL limit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiagnostic {
    /// 1-based line number in the source.
    pub line_no: usize,
    /// The trimmed line text.
    pub text: String,
    pub reason: RejectReason,
}

impl LineDiagnostic {
    pub(crate) fn new(line_no: usize, text: String, reason: RejectReason) -> Self {
        Self {
            line_no,
            text,
            reason,
        }
    }
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: skipped {}: {}", self.line_no, self.reason, self.text)
    }
}
