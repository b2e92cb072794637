//! In-memory name index for read-mode archives.

use std::collections::HashMap;

use super::Entry;

/// Maps names to the records that hold them.
///
/// Duplicate names resolve to the first record in stream order; later
/// records with the same name stay listed but are never returned by
/// [`get`](Self::get).
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    entries: Vec<Entry>,
    by_name: HashMap<Vec<u8>, usize>,
}

impl EntryIndex {
    /// Builds an index from entries given in stream order.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            by_name.entry(entry.raw_name.clone()).or_insert(position);
        }
        Self { entries, by_name }
    }

    /// Looks up the first entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.by_name
            .get(name.as_bytes())
            .map(|&position| &self.entries[position])
    }

    /// Returns all entries in stream order, duplicates included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of records hidden behind an earlier one with the same name.
    pub fn shadowed_count(&self) -> usize {
        self.entries.len() - self.by_name.len()
    }
}
