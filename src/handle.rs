//! Runtime dispatch between read and write mode.
//!
//! [`Writer`] and [`Archive`] only offer the operations valid for their mode,
//! so a mismatch is a compile error. [`ArchiveHandle`] is for callers that
//! only learn the mode at runtime; there a mismatch is reported as
//! [`Error::WrongMode`].

use std::io::{Read, Seek, Write};

use crate::{Archive, Error, Result, Writer};

/// The mode an archive was constructed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bound to a seekable source; queries only.
    Read,
    /// Bound to a sink; appends only.
    Write,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// An archive in either mode, fixed at construction.
pub enum ArchiveHandle<R, W> {
    /// Write mode.
    Write(Writer<W>),
    /// Read mode.
    Read(Archive<R>),
}

impl<R: Read + Seek, W: Write> ArchiveHandle<R, W> {
    /// Enters write mode and writes the header.
    pub fn create(sink: W) -> Result<Self> {
        Ok(Self::Write(Writer::create(sink)?))
    }

    /// Enters read mode and verifies the header.
    pub fn open(source: R) -> Result<Self> {
        Ok(Self::Read(Archive::open(source)?))
    }

    /// Returns the mode this handle was constructed in.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Write(_) => Mode::Write,
            Self::Read(_) => Mode::Read,
        }
    }

    /// Appends a record. Write mode only.
    pub fn add_file(&mut self, name: &str, content: impl Read) -> Result<()> {
        match self {
            Self::Write(writer) => writer.add_file(name, content),
            Self::Read(_) => Err(Error::WrongMode {
                operation: "add a file",
                mode: Mode::Read,
            }),
        }
    }

    /// Returns the number of records.
    ///
    /// O(1) in write mode; a full scan in read mode unless indexed.
    pub fn file_count(&mut self) -> Result<usize> {
        match self {
            Self::Write(writer) => Ok(writer.file_count()),
            Self::Read(archive) => archive.file_count(),
        }
    }

    /// Returns the content of the first record named `name`. Read mode only.
    pub fn get_bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        match self {
            Self::Read(archive) => archive.get_bytes(name),
            Self::Write(_) => Err(Error::WrongMode {
                operation: "read an entry",
                mode: Mode::Write,
            }),
        }
    }

    /// Returns the content of the first record named `name` as text. Read mode only.
    pub fn get_as_string(&mut self, name: &str) -> Result<String> {
        match self {
            Self::Read(archive) => archive.get_as_string(name),
            Self::Write(_) => Err(Error::WrongMode {
                operation: "read an entry",
                mode: Mode::Write,
            }),
        }
    }
}
