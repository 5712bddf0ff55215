//! Skip-log buffer implementation
//!
//! Values are appended to a single byte log; a skip list maps each key to the
//! span of its latest value. Overwrites append and repoint, so the log only
//! grows until `release`.
//!
//! ```text
//! index (SkipMap)               log (Vec<u8>)
//! ┌─────────┬──────────┐       ┌──────┬──────┬────────┬─────┐
//! │ "k1"    │ (0, 4)   │──────▶│ v1.. │ v2.. │ v1'... │ ... │
//! │ "k2"    │ (4, 4)   │──┐    └──────┴──────┴────────┴─────┘
//! │ "k3"    │ (8, 0)   │  └──────────▲ (len 0 = tombstone)
//! └─────────┴──────────┘
//! ```

use std::ops::Bound;

use crossbeam_skiplist::map::{Entry, Range};
use crossbeam_skiplist::SkipMap;
use tracing::{debug, trace};

use crate::comparator::Comparator;
use crate::cursor::Cursor;
use crate::error::{Result, TxnBufError};

use super::{seek_bounds, MemBuffer, OrderedKey};

/// Location of a value inside the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValueSpan {
    offset: usize,
    len: usize,
}

impl ValueSpan {
    fn is_tombstone(&self) -> bool {
        self.len == 0
    }
}

/// Log-structured write buffer
pub struct SkipLogBuffer {
    order: Comparator,

    /// Append-only value storage
    log: Vec<u8>,

    /// Key -> latest value span
    index: SkipMap<OrderedKey, ValueSpan>,

    /// Approximate size in bytes (keys + live values)
    size: usize,
}

impl SkipLogBuffer {
    /// Create a new empty buffer with the given key order
    pub fn new(order: Comparator) -> Self {
        Self::with_capacity(order, 0)
    }

    /// Create a new empty buffer, pre-allocating `capacity` bytes of log
    pub fn with_capacity(order: Comparator, capacity: usize) -> Self {
        Self {
            order,
            log: Vec::with_capacity(capacity),
            index: SkipMap::new(),
            size: 0,
        }
    }

    /// Bytes appended to the log since the last release, dead values included
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Cursor at the first live entry `>= seed`
    pub fn iter_from(&self, seed: Option<&[u8]>) -> SkipLogCursor<'_> {
        SkipLogCursor::new(self, seed, true)
    }

    /// Cursor at the first entry `>= seed`, tombstones included
    pub fn raw_iter_from(&self, seed: Option<&[u8]>) -> SkipLogCursor<'_> {
        SkipLogCursor::new(self, seed, false)
    }

    fn span_of(&self, key: &OrderedKey) -> Option<ValueSpan> {
        self.index.get(key).map(|entry| *entry.value())
    }

    fn slice(&self, span: ValueSpan) -> &[u8] {
        &self.log[span.offset..span.offset + span.len]
    }
}

impl MemBuffer for SkipLogBuffer {
    fn get(&self, key: &[u8]) -> Result<&[u8]> {
        match self.span_of(&OrderedKey::new(key, self.order)) {
            Some(span) if !span.is_tombstone() => Ok(self.slice(span)),
            _ => Err(TxnBufError::KeyNotExist),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if value.is_empty() {
            return self.delete(key);
        }

        trace!(key_len = key.len(), value_len = value.len(), "skiplog set");
        let probe = OrderedKey::new(key, self.order);
        match self.span_of(&probe) {
            Some(old) => self.size = self.size - old.len + value.len(),
            None => self.size += key.len() + value.len(),
        }

        let span = ValueSpan {
            offset: self.log.len(),
            len: value.len(),
        };
        self.log.extend_from_slice(value);
        self.index.insert(probe, span);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        let probe = OrderedKey::new(key, self.order);
        match self.span_of(&probe) {
            Some(old) if !old.is_tombstone() => {
                trace!(key_len = key.len(), "skiplog tombstone");
                self.size -= old.len;
                let tombstone = ValueSpan {
                    offset: self.log.len(),
                    len: 0,
                };
                self.index.insert(probe, tombstone);
                Ok(())
            }
            _ => Err(TxnBufError::KeyNotExist),
        }
    }

    fn release(&mut self) {
        debug!(
            entries = self.index.len(),
            size = self.size,
            log_len = self.log.len(),
            "releasing skiplog buffer"
        );
        self.index = SkipMap::new();
        self.log.clear();
        self.size = 0;
    }

    fn cursor(&self, seed: Option<&[u8]>) -> Box<dyn Cursor + '_> {
        Box::new(self.iter_from(seed))
    }

    fn raw_cursor(&self, seed: Option<&[u8]>) -> Box<dyn Cursor + '_> {
        Box::new(self.raw_iter_from(seed))
    }

    fn len(&self) -> usize {
        self.index.len()
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

type IndexRange<'a> =
    Range<'a, OrderedKey, (Bound<OrderedKey>, Bound<OrderedKey>), OrderedKey, ValueSpan>;

/// Forward cursor over a `SkipLogBuffer`
///
/// Holds a range scan over the skip list until closed or exhausted.
pub struct SkipLogCursor<'a> {
    log: &'a [u8],
    range: Option<IndexRange<'a>>,
    current: Option<Entry<'a, OrderedKey, ValueSpan>>,
    skip_tombstones: bool,
}

impl<'a> SkipLogCursor<'a> {
    fn new(buffer: &'a SkipLogBuffer, seed: Option<&[u8]>, skip_tombstones: bool) -> Self {
        let range = buffer.index.range(seek_bounds(buffer.order, seed));
        let mut cursor = Self {
            log: &buffer.log,
            range: Some(range),
            current: None,
            skip_tombstones,
        };
        cursor.advance();
        trace!(valid = cursor.valid(), "skiplog cursor positioned");
        cursor
    }

    fn advance(&mut self) {
        self.current = None;
        let skip = self.skip_tombstones;
        if let Some(range) = self.range.as_mut() {
            self.current = range.find(|entry| !(skip && entry.value().is_tombstone()));
        }
        if self.current.is_none() {
            // Exhausted: drop the scan handle early
            self.range = None;
        }
    }
}

impl Cursor for SkipLogCursor<'_> {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> &[u8] {
        self.current
            .as_ref()
            .map(|entry| entry.key().as_bytes())
            .unwrap_or_default()
    }

    fn value(&self) -> &[u8] {
        match self.current.as_ref() {
            Some(entry) => {
                let span = *entry.value();
                &self.log[span.offset..span.offset + span.len]
            }
            None => &[],
        }
    }

    fn next(&mut self) -> Result<bool> {
        if self.current.is_some() {
            self.advance();
        }
        Ok(self.valid())
    }

    fn close(&mut self) {
        self.current = None;
        self.range = None;
    }
}
