use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::error::{HoogleError, Result};

/// The append-only writer the database is streamed into.
///
/// Every write failure is returned as [`HoogleError::Write`] naming the output path.
#[derive(Debug)]
pub struct OutputSink<W: Write> {
    writer: W,
    path: PathBuf,
    written: usize,
}

impl OutputSink<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| HoogleError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: Write> OutputSink<W> {
    /// Wrap an arbitrary writer; `path` is only used in error messages.
    pub fn new(writer: W, path: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            path: path.into(),
            written: 0,
        }
    }

    /// Append a block of text as is.
    pub fn write(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|source| self.error(source))?;
        self.written += text.len();
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered output and return the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().map_err(|source| self.error(source))?;
        Ok(self.writer)
    }

    fn error(&self, source: io::Error) -> HoogleError {
        HoogleError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
