//! Structure Module
//!
//! Typed string / hash / list values layered on a [`MemBuffer`]. Every
//! logical value is flattened into byte keys (see [`keys`]) so the buffer
//! only ever sees ordered `(key, value)` pairs.
//!
//! ## Requirements
//! - The buffer must use ascending order; field and element scans are
//!   prefix seeks that rely on byte order.
//! - Stored values must be non-empty, since an empty value is a tombstone.

mod hash;
mod list;
pub mod keys;

use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

use crate::buffer::MemBuffer;
use crate::cursor::Cursor;
use crate::error::{Result, TxnBufError};

pub use keys::TypeFlag;

/// Structured view over a write buffer
///
/// All keys are written under `prefix`, so several structures can share a
/// buffer without colliding.
pub struct TxStructure<'a> {
    buffer: &'a mut dyn MemBuffer,
    prefix: Vec<u8>,
}

impl<'a> TxStructure<'a> {
    /// Wrap a buffer; fails if the buffer is not in ascending order
    pub fn new(buffer: &'a mut dyn MemBuffer, prefix: impl Into<Vec<u8>>) -> Result<Self> {
        if !buffer.order().is_ascending() {
            return Err(TxnBufError::PreconditionViolation(
                "structured values require an ascending buffer".to_string(),
            ));
        }
        Ok(Self {
            buffer,
            prefix: prefix.into(),
        })
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    // =========================================================================
    // String
    // =========================================================================

    /// Set a string value
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        ensure_value(value)?;
        let ek = self.string_key(key);
        trace!(key = %String::from_utf8_lossy(key), "structure set");
        self.buffer.set(&ek, value)
    }

    /// Get a string value, `None` if unset
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let ek = self.string_key(key);
        self.get_raw(&ek)
    }

    /// Add `step` to an integer stored as a decimal string (missing = 0)
    pub fn inc(&mut self, key: &[u8], step: i64) -> Result<i64> {
        let ek = self.string_key(key);
        let current = match self.get_raw(&ek)? {
            Some(raw) => parse_i64(&raw)?,
            None => 0,
        };
        let next = current.checked_add(step).ok_or_else(|| {
            TxnBufError::PreconditionViolation(format!("increment overflows: {} + {}", current, step))
        })?;
        self.buffer.set(&ek, next.to_string().as_bytes())?;
        Ok(next)
    }

    /// Get an integer stored with `inc`, 0 if unset
    pub fn get_int64(&self, key: &[u8]) -> Result<i64> {
        match self.get(key)? {
            Some(raw) => parse_i64(&raw),
            None => Ok(0),
        }
    }

    /// Remove a string value; removing an unset key is not an error
    pub fn clear(&mut self, key: &[u8]) -> Result<()> {
        let ek = self.string_key(key);
        self.delete_raw(&ek)
    }

    // =========================================================================
    // Raw helpers
    // =========================================================================

    fn string_key(&self, key: &[u8]) -> Vec<u8> {
        self.prefixed(&keys::encode_string_data_key(key))
    }

    fn prefixed(&self, encoded: &[u8]) -> Vec<u8> {
        let mut ek = Vec::with_capacity(self.prefix.len() + encoded.len());
        ek.extend_from_slice(&self.prefix);
        ek.extend_from_slice(encoded);
        ek
    }

    fn get_raw(&self, ek: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.buffer.get(ek) {
            Ok(value) => Ok(Some(value.to_vec())),
            Err(TxnBufError::KeyNotExist) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn delete_raw(&mut self, ek: &[u8]) -> Result<()> {
        match self.buffer.delete(ek) {
            Ok(()) | Err(TxnBufError::KeyNotExist) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn load_meta<M: DeserializeOwned + Default>(&self, ek: &[u8]) -> Result<M> {
        match self.get_raw(ek)? {
            Some(raw) => Ok(bincode::deserialize(&raw)?),
            None => Ok(M::default()),
        }
    }

    fn store_meta<M: Serialize>(&mut self, ek: &[u8], meta: &M) -> Result<()> {
        let raw = bincode::serialize(meta)?;
        self.buffer.set(ek, &raw)
    }

    /// Live `(key, value)` pairs whose key starts with `prefix`, in order
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut out = Vec::new();
        let mut cursor = self.buffer.cursor(Some(prefix));
        while cursor.valid() && cursor.key().starts_with(prefix) {
            out.push((cursor.key().to_vec(), cursor.value().to_vec()));
            cursor.next()?;
        }
        cursor.close();
        Ok(out)
    }
}

fn ensure_value(value: &[u8]) -> Result<()> {
    if value.is_empty() {
        return Err(TxnBufError::PreconditionViolation(
            "structured values must be non-empty".to_string(),
        ));
    }
    Ok(())
}

fn parse_i64(raw: &[u8]) -> Result<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            TxnBufError::PreconditionViolation(format!(
                "value {:?} is not an integer",
                String::from_utf8_lossy(raw)
            ))
        })
}
