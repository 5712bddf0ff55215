//! Union Iterator
//!
//! Overlays a buffer cursor (dirty stream) on a snapshot cursor (clean
//! stream). Both must already be ordered under the same comparator; no
//! sorting happens here.
//!
//! ## Merge rules
//! - Smaller key (under the comparator) is emitted first.
//! - Equal keys: the dirty entry wins and the clean entry is skipped.
//! - A dirty tombstone (empty value) is never emitted and masks the clean
//!   entry with the same key.
//!
//! Feed the dirty side from [`MemBuffer::raw_cursor`](crate::buffer::MemBuffer::raw_cursor)
//! so tombstones reach the merge; a filtering cursor would let deleted
//! clean entries show through.

use std::cmp::Ordering;

use tracing::trace;

use crate::comparator::Comparator;
use crate::cursor::Cursor;
use crate::error::Result;

/// Which side holds the current entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Dirty,
    Clean,
}

/// Merged, deduplicated view of a dirty and a clean stream
pub struct UnionIter<D, C> {
    dirty: D,
    clean: C,
    order: Comparator,
    current: Option<Side>,
}

impl<D: Cursor, C: Cursor> UnionIter<D, C> {
    /// Create a union positioned at its first visible entry
    pub fn new(dirty: D, clean: C, order: Comparator) -> Result<Self> {
        let mut iter = Self {
            dirty,
            clean,
            order,
            current: None,
        };
        iter.update_current()?;
        trace!(valid = iter.valid(), %order, "union iterator positioned");
        Ok(iter)
    }

    /// Give back the underlying cursors
    pub fn into_inner(self) -> (D, C) {
        (self.dirty, self.clean)
    }

    /// Pick the side that owns the next visible entry, consuming tombstones
    /// and clean entries shadowed by dirty ones along the way.
    fn update_current(&mut self) -> Result<()> {
        self.current = None;
        loop {
            match (self.dirty.valid(), self.clean.valid()) {
                (false, false) => return Ok(()),
                (false, true) => {
                    self.current = Some(Side::Clean);
                    return Ok(());
                }
                (true, false) => {
                    if self.dirty.value().is_empty() {
                        self.dirty.next()?;
                        continue;
                    }
                    self.current = Some(Side::Dirty);
                    return Ok(());
                }
                (true, true) => {
                    let tombstone = self.dirty.value().is_empty();
                    match self.order.compare(self.dirty.key(), self.clean.key()) {
                        Ordering::Less => {
                            if tombstone {
                                self.dirty.next()?;
                                continue;
                            }
                            self.current = Some(Side::Dirty);
                            return Ok(());
                        }
                        Ordering::Greater => {
                            self.current = Some(Side::Clean);
                            return Ok(());
                        }
                        Ordering::Equal => {
                            // Dirty shadows clean
                            self.clean.next()?;
                            if tombstone {
                                self.dirty.next()?;
                                continue;
                            }
                            self.current = Some(Side::Dirty);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

impl<D: Cursor, C: Cursor> Cursor for UnionIter<D, C> {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> &[u8] {
        match self.current {
            Some(Side::Dirty) => self.dirty.key(),
            Some(Side::Clean) => self.clean.key(),
            None => &[],
        }
    }

    fn value(&self) -> &[u8] {
        match self.current {
            Some(Side::Dirty) => self.dirty.value(),
            Some(Side::Clean) => self.clean.value(),
            None => &[],
        }
    }

    fn next(&mut self) -> Result<bool> {
        match self.current {
            Some(Side::Dirty) => {
                self.dirty.next()?;
            }
            Some(Side::Clean) => {
                self.clean.next()?;
            }
            None => return Ok(false),
        }
        self.update_current()?;
        Ok(self.valid())
    }

    fn close(&mut self) {
        self.dirty.close();
        self.clean.close();
        self.current = None;
    }
}
