//! Resource limits for archive entries.
//!
//! Record length fields come straight from the stream. Readers check these
//! limits before any buffer is sized from them. Writers check the same
//! limits before a record is written, so an archive written with the
//! default limits is always readable with the default limits.

use crate::{Error, Result};

/// Resource limits applied to names, entry sizes, and entry counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum number of records listed or indexed in one pass.
    ///
    /// Counting and lookups hold no per-record state and ignore this limit.
    pub max_entries: usize,
    /// Maximum length of a single entry name in bytes.
    pub max_name_len: u64,
    /// Maximum uncompressed size of a single entry.
    pub max_entry_size: u64,
}

impl Default for ResourceLimits {
    /// Creates resource limits with the following default values:
    ///
    /// | Limit | Default Value |
    /// |-------|---------------|
    /// | `max_entries` | 1,000,000 |
    /// | `max_name_len` | 64 KiB |
    /// | `max_entry_size` | 4 GiB |
    fn default() -> Self {
        Self {
            max_entries: 1_000_000,
            max_name_len: 64 << 10,
            max_entry_size: 4 << 30,
        }
    }
}

impl ResourceLimits {
    /// Creates new resource limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates limits that never trigger.
    pub fn unlimited() -> Self {
        Self {
            max_entries: usize::MAX,
            max_name_len: u64::MAX,
            max_entry_size: u64::MAX,
        }
    }

    /// Sets the maximum number of entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the maximum name length.
    pub fn max_name_len(mut self, max: u64) -> Self {
        self.max_name_len = max;
        self
    }

    /// Sets the maximum uncompressed entry size.
    pub fn max_entry_size(mut self, max: u64) -> Self {
        self.max_entry_size = max;
        self
    }

    pub(crate) fn check_entries(&self, count: usize) -> Result<()> {
        if count > self.max_entries {
            return Err(Error::ResourceLimitExceeded(format!(
                "archive has more than {} entries",
                self.max_entries
            )));
        }
        Ok(())
    }

    pub(crate) fn check_name_len(&self, len: u64) -> Result<()> {
        if len > self.max_name_len {
            return Err(Error::ResourceLimitExceeded(format!(
                "entry name length {} exceeds limit {}",
                len, self.max_name_len
            )));
        }
        Ok(())
    }

    pub(crate) fn check_entry_size(&self, size: u64) -> Result<()> {
        if size > self.max_entry_size {
            return Err(Error::ResourceLimitExceeded(format!(
                "entry size {} exceeds limit {}",
                size, self.max_entry_size
            )));
        }
        Ok(())
    }
}
