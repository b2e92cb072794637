//! Error types for CAR archive operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when working with CAR archives, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Categories
//!
//! Variants are grouped into a small number of categories that callers
//! usually care about more than the exact variant:
//!
//! | Category | Predicate | Variants |
//! |----------|-----------|----------|
//! | Format | [`Error::is_format_error`] | [`InvalidFormat`][Error::InvalidFormat], [`UnsupportedVersion`][Error::UnsupportedVersion], [`Truncated`][Error::Truncated] |
//! | Mode | [`Error::is_mode_error`] | [`WrongMode`][Error::WrongMode] |
//! | Compression | [`Error::is_compression_error`] | [`Compression`][Error::Compression], [`SizeMismatch`][Error::SizeMismatch] |
//! | Lookup | [`Error::is_not_found`] | [`EntryNotFound`][Error::EntryNotFound] |
//! | I/O | - | [`Io`][Error::Io] |
//!
//! ## Matching on Categories
//!
//! ```rust
//! use car_archive::{Archive, Error};
//! use std::io::Cursor;
//!
//! let result = Archive::open(Cursor::new(b"CArv1".to_vec()));
//! match result {
//!     Err(e) if e.is_format_error() => println!("not a CAR archive: {}", e),
//!     Err(e) => println!("other failure: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use std::io;

use crate::handle::Mode;

/// The main error type for CAR archive operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred on the underlying stream.
    ///
    /// This is returned for failures that are not a violation of the byte
    /// layout, such as a disk write failure or a permission problem.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream does not start with the CAR signature.
    ///
    /// Also returned when the stream is shorter than the fixed header.
    #[error("Invalid CAR format: {0}")]
    InvalidFormat(String),

    /// The stream carries the CAR signature but an unknown format version.
    #[error("Unsupported CAR version: {found:?}")]
    UnsupportedVersion {
        /// The version bytes found in the header, lossily decoded.
        found: String,
    },

    /// A record ends before the bytes its length fields promise.
    ///
    /// Reaching the end of the stream exactly at a record boundary is a clean
    /// end and never produces this error.
    #[error("Truncated record at offset {offset:#x}: {reason}")]
    Truncated {
        /// The byte offset of the record that could not be read.
        offset: u64,
        /// What part of the record was missing.
        reason: String,
    },

    /// A write operation was attempted on a read-mode archive, or vice versa.
    ///
    /// This is a usage mistake rather than a data problem. It can only occur
    /// through [`ArchiveHandle`](crate::ArchiveHandle); [`Writer`](crate::Writer)
    /// and [`Archive`](crate::Archive) expose only the operations valid for
    /// their mode.
    #[error("Cannot {operation} on a {mode}-mode archive")]
    WrongMode {
        /// The operation that was attempted.
        operation: &'static str,
        /// The mode the archive was constructed in.
        mode: Mode,
    },

    /// The deflate codec reported a failure.
    #[error("Compression error: {0}")]
    Compression(String),

    /// A payload decompressed to a different length than its record declares.
    #[error("Decompressed size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// The uncompressed size stored in the record.
        expected: u64,
        /// The number of bytes the payload actually produced.
        ///
        /// When the payload is larger than declared this is `expected + 1`,
        /// since decoding stops as soon as the overflow is detected.
        actual: u64,
    },

    /// No record with the requested name exists in the archive.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A name was added twice while duplicates are rejected.
    ///
    /// See [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    #[error("Duplicate entry name: {name}")]
    DuplicateEntry {
        /// The name that was already present.
        name: String,
    },

    /// An entry was requested as text but its content is not valid UTF-8.
    #[error("Entry '{name}' is not valid UTF-8")]
    NotUtf8 {
        /// The entry name.
        name: String,
    },

    /// A configured resource limit was exceeded.
    ///
    /// Limits protect against archives whose length fields would force very
    /// large allocations. See [`ResourceLimits`](crate::ResourceLimits).
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}

/// A specialized Result type for CAR archive operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the stream violates the CAR byte layout.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidFormat(_) | Error::UnsupportedVersion { .. } | Error::Truncated { .. }
        )
    }

    /// Returns true if the error is a read/write mode mismatch.
    pub fn is_mode_error(&self) -> bool {
        matches!(self, Error::WrongMode { .. })
    }

    /// Returns true if compressing or decompressing a payload failed.
    pub fn is_compression_error(&self) -> bool {
        matches!(self, Error::Compression(_) | Error::SizeMismatch { .. })
    }

    /// Returns true if a requested entry does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntryNotFound { .. })
    }

    /// Builds a [`Truncated`](Error::Truncated) error.
    pub(crate) fn truncated(offset: u64, reason: impl Into<String>) -> Self {
        Error::Truncated {
            offset,
            reason: reason.into(),
        }
    }

    /// Converts an I/O error raised while decoding a record.
    ///
    /// Unexpected EOF is a layout violation and becomes
    /// [`Truncated`](Error::Truncated); anything else stays an I/O error.
    pub(crate) fn from_record_io(e: io::Error, offset: u64, what: &str) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::truncated(offset, format!("unexpected end of stream in {}", what))
        } else {
            Error::Io(e)
        }
    }
}
