//! Archive writing API for CAR archives.
//!
//! A [`Writer`] writes the header as soon as it is created and then appends
//! one record per added file. Records are never rewritten, and nothing has
//! to be patched when writing ends, so the sink only needs [`Write`].
//!
//! # Example
//!
//! ```rust
//! use car_archive::Writer;
//!
//! let mut bytes = Vec::new();
//! let mut writer = Writer::create(&mut bytes)?;
//! writer.add_bytes("f1.txt", b"first")?;
//! writer.add_file("f2.txt", &b"second"[..])?;
//! assert_eq!(writer.file_count(), 2);
//!
//! let result = writer.finish()?;
//! println!("Wrote {} entries", result.entries_written);
//! # Ok::<(), car_archive::Error>(())
//! ```

mod options;

pub use options::{DuplicatePolicy, WriteOptions, WriteResult};

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::format::record::PreparedRecord;
use crate::format::{HEADER_SIZE, header};
use crate::{Error, Result};

/// A CAR archive writer.
///
/// Pass `&mut W` to keep ownership of the sink with the caller; the writer
/// never closes it.
pub struct Writer<W> {
    sink: W,
    options: WriteOptions,
    names: HashSet<Vec<u8>>,
    result: WriteResult,
}

impl<W> std::fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("options", &self.options)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl Writer<BufWriter<File>> {
    /// Creates a new archive file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(Error::Io)?;
        Self::create(BufWriter::new(file))
    }
}

impl<W: Write> Writer<W> {
    /// Creates a writer and immediately writes the archive header.
    pub fn create(mut sink: W) -> Result<Self> {
        header::write_header(&mut sink)?;
        Ok(Self {
            sink,
            options: WriteOptions::default(),
            names: HashSet::new(),
            result: WriteResult {
                bytes_written: HEADER_SIZE as u64,
                ..WriteResult::default()
            },
        })
    }

    /// Sets the write options.
    pub fn options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Reads `content` to its end and appends it as a record named `name`.
    ///
    /// The name is checked against the duplicate policy and the resource
    /// limits before `content` is read. Reading stops one byte past
    /// `max_entry_size`.
    pub fn add_file<R: Read>(&mut self, name: &str, content: R) -> Result<()> {
        self.check_name(name, 1)?;
        let max_size = self.options.limits.max_entry_size;
        let mut data = Vec::new();
        content.take(max_size.saturating_add(1)).read_to_end(&mut data)?;
        self.options.limits.check_entry_size(data.len() as u64)?;
        let record = PreparedRecord::new(name.as_bytes(), &data)?;
        self.write_record(&record)
    }

    /// Appends `data` as a record named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceLimitExceeded`] if the name, the data, or the
    /// entry count would exceed the configured limits. Nothing is written
    /// in that case.
    pub fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.check_name(name, 1)?;
        self.options.limits.check_entry_size(data.len() as u64)?;
        let record = PreparedRecord::new(name.as_bytes(), data)?;
        self.write_record(&record)
    }

    /// Appends several records, compressing them in parallel.
    ///
    /// Records are written in input order. Limit and duplicate checks for
    /// the whole batch run before anything is compressed or written.
    /// Returns the number of records written.
    pub fn add_batch(&mut self, entries: &[(&str, &[u8])]) -> Result<usize> {
        let mut batch_names = HashSet::new();
        for (name, data) in entries {
            self.check_name(name, entries.len())?;
            self.options.limits.check_entry_size(data.len() as u64)?;
            if self.options.duplicates == DuplicatePolicy::Reject
                && !batch_names.insert(name.as_bytes())
            {
                return Err(Error::DuplicateEntry {
                    name: name.to_string(),
                });
            }
        }

        let records = prepare_records(entries)?;
        for record in &records {
            self.write_record(record)?;
        }
        Ok(records.len())
    }

    /// Returns the number of records added so far.
    pub fn file_count(&self) -> usize {
        self.result.entries_written
    }

    /// Returns statistics for the records added so far.
    pub fn result(&self) -> &WriteResult {
        &self.result
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Flushes the sink and returns the write statistics.
    pub fn finish(mut self) -> Result<WriteResult> {
        self.sink.flush()?;
        Ok(self.result)
    }

    /// Flushes the sink and releases it.
    pub fn into_inner(mut self) -> Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }

    /// Checks `name` and room for `adding` more records.
    fn check_name(&self, name: &str, adding: usize) -> Result<()> {
        let limits = &self.options.limits;
        limits.check_name_len(name.len() as u64)?;
        limits.check_entries(self.file_count().saturating_add(adding))?;
        if self.options.duplicates == DuplicatePolicy::Reject
            && self.names.contains(name.as_bytes())
        {
            return Err(Error::DuplicateEntry {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn write_record(&mut self, record: &PreparedRecord) -> Result<()> {
        record.write_to(&mut self.sink)?;

        if !self.names.insert(record.name().to_vec()) {
            log::warn!(
                "Duplicate entry '{}' is shadowed by an earlier record",
                String::from_utf8_lossy(record.name())
            );
        }
        log::debug!(
            "Added '{}' ({} -> {} bytes)",
            String::from_utf8_lossy(record.name()),
            record.uncompressed_size(),
            record.compressed_size()
        );

        self.result.entries_written += 1;
        self.result.total_size += record.uncompressed_size();
        self.result.compressed_size += record.compressed_size();
        self.result.bytes_written += record.encoded_len();
        Ok(())
    }
}

#[cfg(feature = "parallel")]
fn prepare_records(entries: &[(&str, &[u8])]) -> Result<Vec<PreparedRecord>> {
    use rayon::prelude::*;

    entries
        .par_iter()
        .map(|(name, data)| PreparedRecord::new(name.as_bytes(), data))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn prepare_records(entries: &[(&str, &[u8])]) -> Result<Vec<PreparedRecord>> {
    entries
        .iter()
        .map(|(name, data)| PreparedRecord::new(name.as_bytes(), data))
        .collect()
}
