//! Sequential page writer for one output file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const WRITE_BUFFER: usize = 64 * 1024;

/// Buffered writer for a single page file. Owned by exactly one fetch worker.
///
/// Dropping without `finish` leaves whatever was written so far on disk
/// (a truncated page), which is the documented outcome of a failed fetch.
pub struct PageWriter {
    inner: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl PageWriter {
    /// Create (or truncate) the file at `path`.
    pub(crate) fn create(path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            inner: BufWriter::with_capacity(WRITE_BUFFER, file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Append `data` to the page.
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes accepted so far (may still sit in the buffer).
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and fsync, then close the file. Returns the total bytes written.
    pub fn finish(mut self) -> io::Result<u64> {
        self.inner.flush()?;
        self.inner.get_ref().sync_all()?;
        Ok(self.written)
    }

    /// Best-effort flush of a page whose fetch failed; returns bytes written.
    pub fn abandon(mut self) -> u64 {
        if let Err(e) = self.inner.flush() {
            tracing::debug!(path = %self.path.display(), "flush of truncated page failed: {}", e);
        }
        self.written
    }
}
