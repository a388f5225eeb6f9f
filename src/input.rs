use crate::error::{SelpgError, SelpgResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads the input one delimiter-terminated chunk at a time.
pub struct ChunkReader<R: BufRead> {
    inner: R,
    buf: Vec<u8>,
}

impl ChunkReader<Box<dyn BufRead>> {
    /// Open the named file read-only, or fall back to standard input.
    pub fn open(path: Option<&Path>) -> SelpgResult<Self> {
        let inner: Box<dyn BufRead> = match path {
            Some(path) => {
                let file = File::open(path).map_err(|source| SelpgError::InputOpen {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::debug!("reading from {}", path.display());
                Box::new(BufReader::new(file))
            }
            None => {
                log::debug!("reading from stdin");
                Box::new(BufReader::new(io::stdin()))
            }
        };
        Ok(ChunkReader::new(inner))
    }
}

impl<R: BufRead> ChunkReader<R> {
    pub fn new(inner: R) -> Self {
        ChunkReader {
            inner,
            buf: Vec::new(),
        }
    }

    /// Return the bytes up to and including the next `delim`.
    ///
    /// Returns `None` at end of input. Bytes after the last delimiter are
    /// never returned.
    pub fn next_chunk(&mut self, delim: u8) -> io::Result<Option<&[u8]>> {
        self.buf.clear();
        self.inner.read_until(delim, &mut self.buf)?;

        match self.buf.last() {
            Some(&last) if last == delim => Ok(Some(&self.buf)),
            Some(_) => {
                log::debug!("dropping {} trailing undelimited bytes", self.buf.len());
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
