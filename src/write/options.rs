//! Write options and result types.

use crate::ResourceLimits;

/// How a [`Writer`](super::Writer) treats a name that was already added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Accept the duplicate and log a warning.
    ///
    /// Readers resolve a name to its first record, so the new content is
    /// stored but never returned by a lookup.
    #[default]
    Allow,
    /// Refuse the duplicate with [`Error::DuplicateEntry`](crate::Error::DuplicateEntry).
    ///
    /// Nothing is written for the refused entry.
    Reject,
}

/// Options for creating archives.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Duplicate name handling.
    pub duplicates: DuplicatePolicy,
    /// Limits every added entry must stay within.
    ///
    /// Keep these equal to the reader's [`ReadOptions`](crate::ReadOptions)
    /// limits so that everything written can be read back.
    pub limits: ResourceLimits,
}

impl WriteOptions {
    /// Creates new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate name policy.
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Sets the resource limits.
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Shorthand for `duplicates(DuplicatePolicy::Reject)`.
    pub fn reject_duplicates(self) -> Self {
        self.duplicates(DuplicatePolicy::Reject)
    }
}

/// Statistics about what a [`Writer`](super::Writer) has written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Number of records written.
    pub entries_written: usize,
    /// Total uncompressed bytes.
    pub total_size: u64,
    /// Total compressed payload bytes.
    pub compressed_size: u64,
    /// Total bytes emitted, header and record framing included.
    pub bytes_written: u64,
}

impl WriteResult {
    /// Returns the compression ratio (compressed / uncompressed).
    pub fn compression_ratio(&self) -> f64 {
        if self.total_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.total_size as f64
        }
    }

    /// Returns the space savings percentage.
    pub fn space_savings(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            1.0 - self.compression_ratio()
        }
    }
}
