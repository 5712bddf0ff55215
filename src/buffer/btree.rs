//! B-tree buffer implementation
//!
//! `BTreeMap`-backed buffer. Keys carry the comparator so the map's native
//! range query is the successor seek.

use std::collections::btree_map::{self, BTreeMap};
use std::ops::Bound;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::comparator::Comparator;
use crate::cursor::Cursor;
use crate::error::{Result, TxnBufError};

use super::{seek_bounds, MemBuffer, OrderedKey};

/// Ordered-tree write buffer
pub struct BTreeBuffer {
    order: Comparator,

    /// Entries; an empty value is a tombstone
    tree: BTreeMap<OrderedKey, Bytes>,

    /// Approximate size in bytes (keys + live values)
    size: usize,
}

impl BTreeBuffer {
    /// Create a new empty buffer with the given key order
    pub fn new(order: Comparator) -> Self {
        Self {
            order,
            tree: BTreeMap::new(),
            size: 0,
        }
    }

    /// Cursor at the first live entry `>= seed`
    pub fn iter_from(&self, seed: Option<&[u8]>) -> BTreeCursor<'_> {
        BTreeCursor::new(&self.tree, seek_bounds(self.order, seed), true)
    }

    /// Cursor at the first entry `>= seed`, tombstones included
    pub fn raw_iter_from(&self, seed: Option<&[u8]>) -> BTreeCursor<'_> {
        BTreeCursor::new(&self.tree, seek_bounds(self.order, seed), false)
    }

    fn probe(&self, key: &[u8]) -> OrderedKey {
        OrderedKey::new(key, self.order)
    }
}

impl Default for BTreeBuffer {
    fn default() -> Self {
        Self::new(Comparator::Ascending)
    }
}

impl MemBuffer for BTreeBuffer {
    fn get(&self, key: &[u8]) -> Result<&[u8]> {
        match self.tree.get(&self.probe(key)) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(TxnBufError::KeyNotExist),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if value.is_empty() {
            return self.delete(key);
        }

        trace!(key_len = key.len(), value_len = value.len(), "btree set");
        let probe = self.probe(key);
        match self.tree.get_mut(&probe) {
            Some(existing) => {
                self.size = self.size - existing.len() + value.len();
                *existing = Bytes::copy_from_slice(value);
            }
            None => {
                self.size += key.len() + value.len();
                self.tree.insert(probe, Bytes::copy_from_slice(value));
            }
        }
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        let probe = self.probe(key);
        match self.tree.get_mut(&probe) {
            Some(existing) if !existing.is_empty() => {
                trace!(key_len = key.len(), "btree tombstone");
                self.size -= existing.len();
                *existing = Bytes::new();
                Ok(())
            }
            _ => Err(TxnBufError::KeyNotExist),
        }
    }

    fn release(&mut self) {
        debug!(entries = self.tree.len(), size = self.size, "releasing btree buffer");
        self.tree.clear();
        self.size = 0;
    }

    fn cursor(&self, seed: Option<&[u8]>) -> Box<dyn Cursor + '_> {
        Box::new(self.iter_from(seed))
    }

    fn raw_cursor(&self, seed: Option<&[u8]>) -> Box<dyn Cursor + '_> {
        Box::new(self.raw_iter_from(seed))
    }

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn size(&self) -> usize {
        self.size
    }

    fn order(&self) -> Comparator {
        self.order
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Forward cursor over a `BTreeBuffer`
pub struct BTreeCursor<'a> {
    range: Option<btree_map::Range<'a, OrderedKey, Bytes>>,
    current: Option<(&'a OrderedKey, &'a Bytes)>,
    skip_tombstones: bool,
}

impl<'a> BTreeCursor<'a> {
    fn new(
        tree: &'a BTreeMap<OrderedKey, Bytes>,
        bounds: (Bound<OrderedKey>, Bound<OrderedKey>),
        skip_tombstones: bool,
    ) -> Self {
        let mut cursor = Self {
            range: Some(tree.range(bounds)),
            current: None,
            skip_tombstones,
        };
        cursor.advance();
        trace!(valid = cursor.valid(), "btree cursor positioned");
        cursor
    }

    fn advance(&mut self) {
        self.current = None;
        let skip = self.skip_tombstones;
        if let Some(range) = self.range.as_mut() {
            self.current = range.find(|(_, value)| !(skip && value.is_empty()));
        }
    }
}

impl Cursor for BTreeCursor<'_> {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> &[u8] {
        self.current.map(|(k, _)| k.as_bytes()).unwrap_or_default()
    }

    fn value(&self) -> &[u8] {
        self.current.map(|(_, v)| &v[..]).unwrap_or_default()
    }

    fn next(&mut self) -> Result<bool> {
        if self.current.is_some() {
            self.advance();
        }
        Ok(self.valid())
    }

    fn close(&mut self) {
        self.range = None;
        self.current = None;
    }
}
