//! Options for reading archives.

use crate::limits::ResourceLimits;

/// Options controlling how an [`Archive`](super::Archive) is read.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Limits applied to untrusted length fields.
    pub limits: ResourceLimits,
    /// Scan the archive once on open and answer queries from the index.
    ///
    /// Without an index, every query re-verifies the header and walks the
    /// records from the start.
    pub build_index: bool,
}

impl ReadOptions {
    /// Creates default read options (default limits, no index).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource limits.
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Enables or disables building an index on open.
    pub fn build_index(mut self, build: bool) -> Self {
        self.build_index = build;
        self
    }
}
