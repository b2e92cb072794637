//! Archive reading API for CAR archives.
//!
//! An [`Archive`] is bound to a seekable source for its whole lifetime. It
//! keeps no cursor state of its own: every query rewinds the source,
//! re-verifies the header, and walks the records from the start, unless an
//! index was built with [`ReadOptions::build_index`].
//!
//! # Example
//!
//! ```rust
//! use car_archive::{Archive, Writer};
//! use std::io::Cursor;
//!
//! let mut bytes = Vec::new();
//! let mut writer = Writer::create(&mut bytes)?;
//! writer.add_bytes("hello", b"hello, world")?;
//! writer.finish()?;
//!
//! let mut archive = Archive::open(Cursor::new(&bytes))?;
//! assert_eq!(archive.file_count()?, 1);
//! assert_eq!(archive.get_as_string("hello")?, "hello, world");
//! # Ok::<(), car_archive::Error>(())
//! ```

mod entry;
mod index;
mod options;

pub use entry::Entry;
pub use index::EntryIndex;
pub use options::ReadOptions;

use std::io::{Read, Seek, SeekFrom};
use std::ops::ControlFlow;

use crate::format::header;
use crate::format::record;
use crate::{Error, Result, codec};

/// A CAR archive reader.
///
/// Queries take `&mut self` because they move the source's cursor; the
/// borrow checker therefore rules out two scans racing on one source.
pub struct Archive<R> {
    reader: R,
    options: ReadOptions,
    index: Option<EntryIndex>,
}

impl<R> std::fmt::Debug for Archive<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("options", &self.options)
            .field("indexed", &self.index.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Read + Seek> Archive<R> {
    /// Opens an archive with default options.
    ///
    /// # Errors
    ///
    /// Returns a format error if the source does not start with a valid
    /// CAR header.
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with_options(reader, ReadOptions::default())
    }

    /// Opens an archive with the given options.
    ///
    /// The header is verified immediately. When `options.build_index` is set,
    /// all records are scanned once here as well.
    pub fn open_with_options(mut reader: R, options: ReadOptions) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        header::verify_header(&mut reader)?;

        let mut archive = Self {
            reader,
            options,
            index: None,
        };
        if archive.options.build_index {
            archive.build_index()?;
        }
        Ok(archive)
    }

    /// Returns the number of records in the archive.
    ///
    /// Without an index this walks every record, skipping payloads by seeking.
    pub fn file_count(&mut self) -> Result<usize> {
        if let Some(index) = &self.index {
            return Ok(index.len());
        }

        let mut count = 0;
        self.scan::<()>(|_| {
            count += 1;
            ControlFlow::Continue(())
        })?;
        Ok(count)
    }

    /// Lists every record in stream order, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceLimitExceeded`] if the archive holds more
    /// than `max_entries` records.
    pub fn entries(&mut self) -> Result<Vec<Entry>> {
        if let Some(index) = &self.index {
            return Ok(index.entries().to_vec());
        }

        let limits = self.options.limits;
        let mut entries = Vec::new();
        let exceeded = self.scan(|entry| {
            if let Err(err) = limits.check_entries(entries.len() + 1) {
                return ControlFlow::Break(err);
            }
            entries.push(entry);
            ControlFlow::Continue(())
        })?;
        match exceeded {
            Some(err) => Err(err),
            None => Ok(entries),
        }
    }

    /// Finds the first record named `name`.
    pub fn find(&mut self, name: &str) -> Result<Option<Entry>> {
        if let Some(index) = &self.index {
            return Ok(index.get(name).cloned());
        }
        self.scan(|entry| {
            if entry.has_name(name) {
                ControlFlow::Break(entry)
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Returns true if a record named `name` exists.
    pub fn contains(&mut self, name: &str) -> Result<bool> {
        Ok(self.find(name)?.is_some())
    }

    /// Returns the decompressed content of the first record named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if no record has that name, or a
    /// compression error if the payload does not decompress to its
    /// declared size.
    pub fn get_bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = self.find(name)?.ok_or_else(|| Error::EntryNotFound {
            name: name.to_string(),
        })?;
        log::debug!(
            "Found '{}' at offset {:#x} ({} -> {} bytes)",
            name,
            entry.offset,
            entry.compressed_size,
            entry.size
        );
        self.read_entry(&entry)
    }

    /// Returns the content of the first record named `name` as text.
    ///
    /// # Errors
    ///
    /// Same as [`get_bytes`](Self::get_bytes), plus [`Error::NotUtf8`] if the
    /// content is not valid UTF-8.
    pub fn get_as_string(&mut self, name: &str) -> Result<String> {
        let bytes = self.get_bytes(name)?;
        String::from_utf8(bytes).map_err(|_| Error::NotUtf8 {
            name: name.to_string(),
        })
    }

    /// Reads and decompresses the content of a listed entry.
    ///
    /// `entry` must come from this archive.
    pub fn read_entry(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        self.options.limits.check_entry_size(entry.size)?;
        let payload = record::read_payload(&mut self.reader, &entry.record_header())?;
        codec::decompress(&payload, entry.size)
    }

    /// Reads and decompresses every record in stream order.
    ///
    /// Payloads are read sequentially; decompression runs in parallel when
    /// the `parallel` feature is enabled.
    pub fn read_all(&mut self) -> Result<Vec<(Entry, Vec<u8>)>> {
        let entries = self.entries()?;
        let mut compressed = Vec::with_capacity(entries.len());
        for entry in entries {
            self.options.limits.check_entry_size(entry.size)?;
            let payload = record::read_payload(&mut self.reader, &entry.record_header())?;
            compressed.push((entry, payload));
        }
        decompress_all(compressed)
    }

    /// Scans the archive and answers later queries from an in-memory index.
    ///
    /// Lookups keep first-match-wins semantics for duplicate names.
    pub fn build_index(&mut self) -> Result<&EntryIndex> {
        self.index = None;
        let entries = self.entries()?;
        log::debug!("Indexed {} records", entries.len());
        Ok(&*self.index.insert(EntryIndex::from_entries(entries)))
    }

    /// Returns the index, if one was built.
    pub fn index(&self) -> Option<&EntryIndex> {
        self.index.as_ref()
    }

    /// Returns the options this archive was opened with.
    pub fn read_options(&self) -> &ReadOptions {
        &self.options
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Releases the underlying source.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Rewinds to the start, re-verifies the header, and returns the stream length.
    fn rewind(&mut self) -> Result<u64> {
        let stream_len = self.reader.seek(SeekFrom::End(0))?;
        self.reader.seek(SeekFrom::Start(0))?;
        header::verify_header(&mut self.reader)?;
        Ok(stream_len)
    }

    /// Walks record headers from the start until `visit` breaks or the stream ends.
    fn scan<T>(&mut self, mut visit: impl FnMut(Entry) -> ControlFlow<T>) -> Result<Option<T>> {
        let stream_len = self.rewind()?;
        let limits = self.options.limits;

        let mut position = 0;
        while let Some(header) = record::read_record_header(&mut self.reader, stream_len, &limits)?
        {
            log::trace!(
                "Record {} at offset {:#x}: {} bytes packed",
                position,
                header.offset,
                header.compressed_size
            );
            record::skip_payload(&mut self.reader, &header)?;
            if let ControlFlow::Break(value) = visit(Entry::from_header(header, position)) {
                return Ok(Some(value));
            }
            position += 1;
        }
        Ok(None)
    }
}

#[cfg(feature = "parallel")]
fn decompress_all(records: Vec<(Entry, Vec<u8>)>) -> Result<Vec<(Entry, Vec<u8>)>> {
    use rayon::prelude::*;

    records
        .into_par_iter()
        .map(|(entry, payload)| {
            let data = codec::decompress(&payload, entry.size)?;
            Ok((entry, data))
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decompress_all(records: Vec<(Entry, Vec<u8>)>) -> Result<Vec<(Entry, Vec<u8>)>> {
    records
        .into_iter()
        .map(|(entry, payload)| {
            let data = codec::decompress(&payload, entry.size)?;
            Ok((entry, data))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Writer;
    use std::io::Cursor;

    fn archive_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut writer = Writer::create(&mut bytes).unwrap();
        for (name, data) in entries {
            writer.add_bytes(name, data).unwrap();
        }
        writer.finish().unwrap();
        bytes
    }

    #[test]
    fn test_open_verifies_header() {
        let err = Archive::open(Cursor::new(b"CArv1".to_vec())).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_open_rewinds_source() {
        let bytes = archive_bytes(&[("a", b"1")]);
        let mut cursor = Cursor::new(bytes);
        cursor.set_position(7);
        let mut archive = Archive::open(cursor).unwrap();
        assert_eq!(archive.file_count().unwrap(), 1);
    }

    #[test]
    fn test_entries_in_stream_order() {
        let bytes = archive_bytes(&[("one", b"1"), ("two", b"22"), ("one", b"333")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        let entries = archive.entries().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["one", "two", "one"]);
        assert_eq!(entries[1].size, 2);
        assert_eq!(entries[2].index, 2);
    }

    #[test]
    fn test_find_and_contains() {
        let bytes = archive_bytes(&[("a", b"x"), ("b", b"y")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.find("b").unwrap().unwrap().index, 1);
        assert!(archive.contains("a").unwrap());
        assert!(!archive.contains("c").unwrap());
    }

    #[test]
    fn test_repeated_queries_rescan() {
        let bytes = archive_bytes(&[("a", b"alpha"), ("b", b"beta")]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        for _ in 0..3 {
            assert_eq!(archive.get_as_string("b").unwrap(), "beta");
            assert_eq!(archive.file_count().unwrap(), 2);
            assert_eq!(archive.get_as_string("a").unwrap(), "alpha");
        }
    }

    #[test]
    fn test_index_matches_scan() {
        let bytes = archive_bytes(&[("a", b"first"), ("b", b"other"), ("a", b"second")]);
        let mut archive =
            Archive::open_with_options(Cursor::new(bytes), ReadOptions::new().build_index(true))
                .unwrap();
        let index = archive.index().unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.shadowed_count(), 1);
        assert_eq!(archive.file_count().unwrap(), 3);
        assert_eq!(archive.get_as_string("a").unwrap(), "first");
        assert!(archive.get_bytes("zzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_not_utf8() {
        let bytes = archive_bytes(&[("bin", &[0xFF, 0xFE, 0x00])]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.get_bytes("bin").unwrap(), [0xFF, 0xFE, 0x00]);
        assert!(matches!(
            archive.get_as_string("bin").unwrap_err(),
            Error::NotUtf8 { .. }
        ));
    }

    #[test]
    fn test_read_all() {
        let bytes = archive_bytes(&[("a", b"alpha"), ("b", b""), ("c", &[9u8; 4096])]);
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        let all = archive.read_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].0.name, "a");
        assert_eq!(all[0].1, b"alpha");
        assert!(all[1].1.is_empty());
        assert_eq!(all[2].1, vec![9u8; 4096]);
    }

    #[test]
    fn test_entry_limit_applies_to_listing_only() {
        let bytes = archive_bytes(&[("a", b"1"), ("b", b"2"), ("c", b"3")]);
        let options = ReadOptions::new().limits(crate::ResourceLimits::new().max_entries(2));
        let mut archive = Archive::open_with_options(Cursor::new(bytes), options).unwrap();

        assert_eq!(archive.file_count().unwrap(), 3);
        assert_eq!(archive.get_as_string("c").unwrap(), "3");
        assert!(matches!(
            archive.entries().unwrap_err(),
            Error::ResourceLimitExceeded(_)
        ));
        assert!(archive.read_all().is_err());
        assert!(archive.build_index().is_err());
        assert!(archive.index().is_none());
    }

    #[test]
    fn test_entry_limit_at_boundary() {
        let bytes = archive_bytes(&[("a", b"1"), ("b", b"2")]);
        let options = ReadOptions::new().limits(crate::ResourceLimits::new().max_entries(2));
        let mut archive = Archive::open_with_options(Cursor::new(bytes), options).unwrap();
        assert_eq!(archive.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_entry_size_limit() {
        let bytes = archive_bytes(&[("big", &[0u8; 2048])]);
        let options = ReadOptions::new().limits(crate::ResourceLimits::new().max_entry_size(1024));
        let mut archive = Archive::open_with_options(Cursor::new(bytes), options).unwrap();
        assert_eq!(archive.file_count().unwrap(), 1);
        assert!(matches!(
            archive.get_bytes("big").unwrap_err(),
            Error::ResourceLimitExceeded(_)
        ));
    }

    #[test]
    fn test_into_inner_returns_source() {
        let bytes = archive_bytes(&[]);
        let archive = Archive::open(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(archive.into_inner().into_inner(), bytes);
    }
}
