//! Snapshot Stream
//!
//! In-memory clean stream: committed entries already sorted under the
//! buffer's comparator. Stands in for the storage engine's read-only iterator
//! wherever one is needed (tests, the shell, benchmarks).

use bytes::Bytes;

use crate::comparator::Comparator;
use crate::cursor::Cursor;
use crate::error::Result;

/// Read-only cursor over an owned, ordered list of entries
#[derive(Debug, Clone)]
pub struct SnapshotCursor {
    entries: Vec<(Bytes, Bytes)>,
    pos: usize,
}

impl SnapshotCursor {
    /// Build a snapshot from unordered entries
    ///
    /// Entries are sorted under `order`; for duplicate keys the last one wins.
    pub fn new<K, V, I>(order: Comparator, entries: I) -> Self
    where
        K: Into<Bytes>,
        V: Into<Bytes>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries: Vec<(Bytes, Bytes)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        // Stable sort keeps insertion order among equal keys
        entries.sort_by(|a, b| order.compare(&a.0, &b.0));

        let mut deduped: Vec<(Bytes, Bytes)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match deduped.last_mut() {
                Some(last) if last.0 == key => last.1 = value,
                _ => deduped.push((key, value)),
            }
        }
        Self::from_sorted(deduped)
    }

    /// Wrap entries the caller guarantees are already ordered
    ///
    /// No sorting or validation takes place.
    pub fn from_sorted(entries: Vec<(Bytes, Bytes)>) -> Self {
        Self { entries, pos: 0 }
    }

    /// Number of entries not yet consumed
    pub fn remaining(&self) -> usize {
        self.entries.len().saturating_sub(self.pos)
    }
}

impl Cursor for SnapshotCursor {
    fn valid(&self) -> bool {
        self.pos < self.entries.len()
    }

    fn key(&self) -> &[u8] {
        self.entries.get(self.pos).map(|(k, _)| k.as_ref()).unwrap_or_default()
    }

    fn value(&self) -> &[u8] {
        self.entries.get(self.pos).map(|(_, v)| v.as_ref()).unwrap_or_default()
    }

    fn next(&mut self) -> Result<bool> {
        if self.valid() {
            self.pos += 1;
        }
        Ok(self.valid())
    }

    fn close(&mut self) {
        self.pos = self.entries.len();
    }
}
