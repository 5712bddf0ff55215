//! Buffer Module
//!
//! In-memory ordered write buffer holding one transaction's uncommitted
//! mutations.
//!
//! ## Responsibilities
//! - Point reads and writes in memory
//! - Tombstones for deleted keys (zero-length values)
//! - Successor-seek cursors in comparator order
//! - Full reset on commit or rollback (`release`)
//!
//! ## Backends
//! Two interchangeable structures implement [`MemBuffer`]:
//! - [`BTreeBuffer`]: `BTreeMap` keyed by comparator-ordered keys
//! - [`SkipLogBuffer`]: append-only value log indexed by a skip list
//!
//! Pick one at construction time with [`new_buffer`].
//!
//! ## Tombstones
//! Writing an empty value is the delete path. Deleting a key that was never
//! set, or is already a tombstone, fails with `KeyNotExist` so that redundant
//! deletes surface to the caller immediately.

mod btree;
mod skiplog;

use std::cmp::Ordering;
use std::ops::Bound;

use bytes::Bytes;

use crate::comparator::Comparator;
use crate::config::{BackendKind, Config};
use crate::cursor::Cursor;
use crate::error::Result;

pub use btree::{BTreeBuffer, BTreeCursor};
pub use skiplog::{SkipLogBuffer, SkipLogCursor};

/// Capability shared by every buffer backend
pub trait MemBuffer {
    /// Get the live value for a key
    ///
    /// Fails with `KeyNotExist` if the key was never set or holds a tombstone.
    fn get(&self, key: &[u8]) -> Result<&[u8]>;

    /// Insert or overwrite a key. An empty value tombstones the key and
    /// follows `delete` semantics.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Tombstone a key. Fails with `KeyNotExist` if the key is absent or
    /// already tombstoned.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Drop every entry; the buffer is reusable as if newly created
    fn release(&mut self);

    /// Cursor at the first live entry `>= seed`, or at the start if `seed` is `None`
    fn cursor(&self, seed: Option<&[u8]>) -> Box<dyn Cursor + '_>;

    /// Like `cursor`, but tombstoned entries are yielded (with empty values)
    fn raw_cursor(&self, seed: Option<&[u8]>) -> Box<dyn Cursor + '_>;

    /// Number of stored entries, tombstones included
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate bytes held: all keys plus live values
    fn size(&self) -> usize;

    /// The buffer's fixed key order
    fn order(&self) -> Comparator;
}

/// Create a buffer for the configured backend and order
pub fn new_buffer(config: &Config) -> Box<dyn MemBuffer> {
    match config.backend {
        BackendKind::BTree => Box::new(BTreeBuffer::new(config.order)),
        BackendKind::SkipLog => {
            Box::new(SkipLogBuffer::with_capacity(config.order, config.log_capacity))
        }
    }
}

// =============================================================================
// Ordered Keys
// =============================================================================

/// Key wrapper whose `Ord` follows the buffer's comparator
#[derive(Debug, Clone)]
pub(crate) struct OrderedKey {
    bytes: Bytes,
    order: Comparator,
}

impl OrderedKey {
    pub(crate) fn new(key: &[u8], order: Comparator) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(key),
            order,
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq for OrderedKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedKey {}

impl PartialOrd for OrderedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.compare(&self.bytes, &other.bytes)
    }
}

/// Range bounds for a successor seek: everything `>= seed`, or everything
pub(crate) fn seek_bounds(
    order: Comparator,
    seed: Option<&[u8]>,
) -> (Bound<OrderedKey>, Bound<OrderedKey>) {
    match seed {
        Some(seed) => (Bound::Included(OrderedKey::new(seed, order)), Bound::Unbounded),
        None => (Bound::Unbounded, Bound::Unbounded),
    }
}
