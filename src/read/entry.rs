//! Archive entry metadata.

use crate::format::record::RecordHeader;

/// An entry in a CAR archive.
///
/// Entries describe a record's location and sizes; reading the content goes
/// through [`Archive::read_entry`](super::Archive::read_entry).
///
/// This struct is marked `#[non_exhaustive]` to allow adding new fields
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Entry {
    /// The entry name, lossily decoded as UTF-8.
    pub name: String,
    /// Position of the record in stream order, starting at 0.
    pub index: usize,
    /// Stream offset of the record.
    pub offset: u64,
    /// Stream offset of the compressed payload.
    pub payload_offset: u64,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// The exact name bytes stored in the record.
    pub(crate) raw_name: Vec<u8>,
}

impl Entry {
    pub(crate) fn from_header(header: RecordHeader, index: usize) -> Self {
        Self {
            name: String::from_utf8_lossy(&header.name).into_owned(),
            index,
            offset: header.offset,
            payload_offset: header.payload_offset,
            size: header.uncompressed_size,
            compressed_size: header.compressed_size,
            raw_name: header.name,
        }
    }

    pub(crate) fn record_header(&self) -> RecordHeader {
        RecordHeader {
            name: self.raw_name.clone(),
            uncompressed_size: self.size,
            compressed_size: self.compressed_size,
            offset: self.offset,
            payload_offset: self.payload_offset,
        }
    }

    /// Returns the exact name bytes stored in the archive.
    ///
    /// Differs from [`name`](Self::name) only for names that are not valid UTF-8.
    pub fn raw_name(&self) -> &[u8] {
        &self.raw_name
    }

    /// Returns true if this entry's stored name is exactly `name`.
    pub fn has_name(&self, name: &str) -> bool {
        self.raw_name == name.as_bytes()
    }

    /// Returns the compression ratio (compressed / uncompressed).
    pub fn compression_ratio(&self) -> f64 {
        if self.size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.size as f64
        }
    }
}
