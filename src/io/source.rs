//! Compressed sources.
//!
//! A [`Source`] is what a decoder session gets bound to: standard input in
//! pass-through mode, a named file in batch mode, or an in-memory buffer in
//! benchmark mode. Files expose their size and permission bits and are
//! released through [`Source::close`], which reports the close status.

use std::fs::{File, Metadata};
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use crate::io::file_io::close_file;

/// Read buffer for file sources.
const SRC_BUF_SIZE: usize = 64 * 1024;

/// A compressed byte stream bound to a decoder session.
#[derive(Debug)]
pub enum Source {
    /// Process standard input. No size, no mode.
    Stdin(io::Stdin),
    /// A named file opened for reading.
    File(BufReader<File>),
    /// A shared in-memory buffer, re-read on every benchmark iteration.
    Memory(Cursor<Arc<[u8]>>),
}

impl Source {
    /// Binds to process standard input.
    pub fn stdin() -> Self {
        crate::displaylevel!(4, "Using stdin for input\n");
        Source::Stdin(io::stdin())
    }

    /// Opens `path` for reading. Directories are rejected.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: is a directory", path.display()),
            ));
        }
        Ok(Source::File(BufReader::with_capacity(SRC_BUF_SIZE, file)))
    }

    /// A fresh reader over `buf`, positioned at its start.
    pub fn memory(buf: Arc<[u8]>) -> Self {
        Source::Memory(Cursor::new(buf))
    }

    /// File metadata; `None` for stdin and memory sources.
    pub fn metadata(&self) -> io::Result<Option<Metadata>> {
        match self {
            Source::File(r) => r.get_ref().metadata().map(Some),
            Source::Stdin(_) | Source::Memory(_) => Ok(None),
        }
    }

    /// Total size in bytes when known.
    pub fn size(&self) -> io::Result<Option<u64>> {
        match self {
            Source::Memory(c) => Ok(Some(c.get_ref().len() as u64)),
            _ => Ok(self.metadata()?.map(|m| m.len())),
        }
    }

    /// Releases the source. Only file sources can fail to close.
    pub fn close(self) -> io::Result<()> {
        match self {
            Source::File(r) => close_file(r.into_inner()),
            Source::Stdin(_) | Source::Memory(_) => Ok(()),
        }
    }
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Stdin(s) => s.read(buf),
            Source::File(r) => r.read(buf),
            Source::Memory(c) => c.read(buf),
        }
    }
}
