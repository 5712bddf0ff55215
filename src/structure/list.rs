//! List values: a meta key holding the live index window `[l_index, r_index)`
//! and one key per element, addressed by its absolute index.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TxnBufError};

use super::keys;
use super::{ensure_value, TxStructure};

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
struct ListMeta {
    l_index: i64,
    r_index: i64,
}

impl ListMeta {
    fn len(&self) -> i64 {
        self.r_index - self.l_index
    }

    /// Absolute index for a relative one; negative counts from the tail
    fn absolute(&self, index: i64) -> Option<i64> {
        let abs = if index < 0 {
            self.r_index + index
        } else {
            self.l_index + index
        };
        (abs >= self.l_index && abs < self.r_index).then_some(abs)
    }
}

impl TxStructure<'_> {
    /// Push values onto the head; the last value ends up first
    pub fn lpush<V: AsRef<[u8]>>(&mut self, key: &[u8], values: &[V]) -> Result<()> {
        self.push(key, true, values)
    }

    /// Push values onto the tail
    pub fn rpush<V: AsRef<[u8]>>(&mut self, key: &[u8], values: &[V]) -> Result<()> {
        self.push(key, false, values)
    }

    /// Pop from the head, `None` if empty
    pub fn lpop(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.pop(key, true)
    }

    /// Pop from the tail, `None` if empty
    pub fn rpop(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.pop(key, false)
    }

    pub fn llen(&self, key: &[u8]) -> Result<i64> {
        let meta = self.list_meta(key)?;
        Ok(meta.len())
    }

    /// Element at `index`; negative indexes count from the tail
    pub fn lindex(&self, key: &[u8], index: i64) -> Result<Option<Vec<u8>>> {
        let meta = self.list_meta(key)?;
        match meta.absolute(index) {
            Some(abs) => self.get_raw(&self.prefixed(&keys::encode_list_data_key(key, abs))),
            None => Ok(None),
        }
    }

    /// Overwrite the element at `index`
    pub fn lset(&mut self, key: &[u8], index: i64, value: &[u8]) -> Result<()> {
        ensure_value(value)?;
        let meta = self.list_meta(key)?;
        let abs = meta.absolute(index).ok_or_else(|| {
            TxnBufError::PreconditionViolation(format!(
                "list index {} out of range, length {}",
                index,
                meta.len()
            ))
        })?;
        let ek = self.prefixed(&keys::encode_list_data_key(key, abs));
        self.buffer.set(&ek, value)
    }

    /// All elements, head to tail
    pub fn lrange_all(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        let meta = self.list_meta(key)?;
        (meta.l_index..meta.r_index)
            .map(|abs| {
                let ek = self.prefixed(&keys::encode_list_data_key(key, abs));
                Ok(self.buffer.get(&ek)?.to_vec())
            })
            .collect()
    }

    /// Remove the whole list
    pub fn lclear(&mut self, key: &[u8]) -> Result<()> {
        let meta_key = self.prefixed(&keys::encode_list_meta_key(key));
        let meta: ListMeta = self.load_meta(&meta_key)?;
        debug!(elements = meta.len(), "clearing list");
        for abs in meta.l_index..meta.r_index {
            let ek = self.prefixed(&keys::encode_list_data_key(key, abs));
            self.delete_raw(&ek)?;
        }
        self.delete_raw(&meta_key)
    }

    fn list_meta(&self, key: &[u8]) -> Result<ListMeta> {
        let meta_key = self.prefixed(&keys::encode_list_meta_key(key));
        self.load_meta(&meta_key)
    }

    fn push<V: AsRef<[u8]>>(&mut self, key: &[u8], left: bool, values: &[V]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        for value in values {
            ensure_value(value.as_ref())?;
        }

        let meta_key = self.prefixed(&keys::encode_list_meta_key(key));
        let mut meta: ListMeta = self.load_meta(&meta_key)?;
        for value in values {
            let index = if left {
                meta.l_index -= 1;
                meta.l_index
            } else {
                meta.r_index += 1;
                meta.r_index - 1
            };
            let ek = self.prefixed(&keys::encode_list_data_key(key, index));
            self.buffer.set(&ek, value.as_ref())?;
        }
        self.store_meta(&meta_key, &meta)
    }

    fn pop(&mut self, key: &[u8], left: bool) -> Result<Option<Vec<u8>>> {
        let meta_key = self.prefixed(&keys::encode_list_meta_key(key));
        let mut meta: ListMeta = self.load_meta(&meta_key)?;
        if meta.len() == 0 {
            return Ok(None);
        }

        let index = if left {
            meta.l_index += 1;
            meta.l_index - 1
        } else {
            meta.r_index -= 1;
            meta.r_index
        };

        let ek = self.prefixed(&keys::encode_list_data_key(key, index));
        let value = self.buffer.get(&ek)?.to_vec();
        self.buffer.delete(&ek)?;

        if meta.len() == 0 {
            self.delete_raw(&meta_key)?;
        } else {
            self.store_meta(&meta_key, &meta)?;
        }
        Ok(Some(value))
    }
}
