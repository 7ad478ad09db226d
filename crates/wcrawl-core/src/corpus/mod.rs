//! Corpus directory: where fetch workers write pages and the scanner reads them.
//!
//! Every page file is named from its entry index (`page<index>.html` by
//! default). Indices are unique within a run, so workers never share a file
//! and no lock is needed for writes.

mod writer;

pub use writer::PageWriter;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "page";
pub const DEFAULT_SUFFIX: &str = ".html";

/// Maps an entry index to a file name and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNaming {
    prefix: String,
    suffix: String,
}

impl Default for PageNaming {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_SUFFIX)
    }
}

impl PageNaming {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// `file_name(3)` → `"page3.html"` with the default naming.
    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}{}", self.prefix, index, self.suffix)
    }

    /// Inverse of `file_name`; `None` for names that are not page files.
    pub fn parse_index(&self, name: &str) -> Option<usize> {
        let digits = name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().filter(|i| *i >= 1)
    }
}

#[derive(Debug, Clone)]
pub struct CorpusDir {
    root: PathBuf,
    naming: PageNaming,
}

impl CorpusDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_naming(root, PageNaming::default())
    }

    pub fn with_naming(root: impl Into<PathBuf>, naming: PageNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn naming(&self) -> &PageNaming {
        &self.naming
    }

    /// Create the directory (and parents) if missing.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.root.join(self.naming.file_name(index))
    }

    /// Open a fresh, truncated page file for `index`.
    pub fn create_page(&self, index: usize) -> io::Result<PageWriter> {
        PageWriter::create(&self.path_for(index))
    }

    /// Existing page files, sorted by index. Other files are ignored.
    pub fn pages(&self) -> io::Result<Vec<(usize, PathBuf)>> {
        let mut pages = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(index) = name.to_str().and_then(|n| self.naming.parse_index(n)) else {
                continue;
            };
            pages.push((index, entry.path()));
        }
        pages.sort_by_key(|(i, _)| *i);
        Ok(pages)
    }
}
