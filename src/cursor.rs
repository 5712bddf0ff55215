//! Cursor abstraction
//!
//! Forward-only positioned view over an ordered key-value stream. Buffer
//! cursors, snapshot streams and the union iterator all speak this contract,
//! which is what lets the union iterator overlay one on top of the other.

use crate::error::Result;

/// Forward-only cursor over ordered entries
///
/// States: positioned-valid, or exhausted (terminal). `key()` and `value()`
/// return empty slices once exhausted.
pub trait Cursor {
    /// Whether the cursor is positioned on an entry
    fn valid(&self) -> bool;

    /// Key of the current entry
    fn key(&self) -> &[u8];

    /// Value of the current entry
    fn value(&self) -> &[u8];

    /// Advance to the next entry, returning the new validity state
    ///
    /// Calling `next` on an exhausted cursor is a no-op returning `Ok(false)`.
    fn next(&mut self) -> Result<bool>;

    /// Release resources held by the cursor. Safe to call repeatedly;
    /// the cursor is exhausted afterwards.
    fn close(&mut self);
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn valid(&self) -> bool {
        (**self).valid()
    }

    fn key(&self) -> &[u8] {
        (**self).key()
    }

    fn value(&self) -> &[u8] {
        (**self).value()
    }

    fn next(&mut self) -> Result<bool> {
        (**self).next()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Drain a cursor into owned `(key, value)` pairs
pub fn collect<C: Cursor + ?Sized>(cursor: &mut C) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut out = Vec::new();
    while cursor.valid() {
        out.push((cursor.key().to_vec(), cursor.value().to_vec()));
        cursor.next()?;
    }
    Ok(out)
}
