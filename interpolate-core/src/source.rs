//! Byte sources for templates and variable files.
//!
//! A [`Source`] is anything that can hand over its full contents plus an
//! identifier used in error messages (usually the path).

use std::io;
use std::path::PathBuf;

/// A named, readable byte source.
pub trait Source {
    /// Identifier reported in errors and logs.
    fn id(&self) -> String;

    /// Read the complete contents.
    fn read(&self) -> io::Result<Vec<u8>>;
}

impl<T: Source + ?Sized> Source for &T {
    fn id(&self) -> String {
        (**self).id()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        (**self).read()
    }
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn id(&self) -> String {
        (**self).id()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        (**self).read()
    }
}

/// A file on disk, read in full on each [`Source::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for FileSource {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// In-memory contents with a caller-chosen name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesSource {
    name: String,
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl Source for BytesSource {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
