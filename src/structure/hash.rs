//! Hash values: one meta key holding the field count, one key per field.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::keys;
use super::{ensure_value, TxStructure};

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
struct HashMeta {
    field_count: i64,
}

impl TxStructure<'_> {
    /// Set a field, creating the hash if needed
    pub fn hset(&mut self, key: &[u8], field: &[u8], value: &[u8]) -> Result<()> {
        ensure_value(value)?;
        let meta_key = self.prefixed(&keys::encode_hash_meta_key(key));
        let data_key = self.prefixed(&keys::encode_hash_data_key(key, field));

        let mut meta: HashMeta = self.load_meta(&meta_key)?;
        if self.get_raw(&data_key)?.is_none() {
            meta.field_count += 1;
        }
        self.buffer.set(&data_key, value)?;
        self.store_meta(&meta_key, &meta)
    }

    /// Get a field value, `None` if the field is unset
    pub fn hget(&self, key: &[u8], field: &[u8]) -> Result<Option<Vec<u8>>> {
        let data_key = self.prefixed(&keys::encode_hash_data_key(key, field));
        self.get_raw(&data_key)
    }

    /// Remove a field; returns whether it existed
    pub fn hdel(&mut self, key: &[u8], field: &[u8]) -> Result<bool> {
        let meta_key = self.prefixed(&keys::encode_hash_meta_key(key));
        let data_key = self.prefixed(&keys::encode_hash_data_key(key, field));

        if self.get_raw(&data_key)?.is_none() {
            return Ok(false);
        }
        self.buffer.delete(&data_key)?;

        let mut meta: HashMeta = self.load_meta(&meta_key)?;
        meta.field_count -= 1;
        if meta.field_count <= 0 {
            self.delete_raw(&meta_key)?;
        } else {
            self.store_meta(&meta_key, &meta)?;
        }
        Ok(true)
    }

    /// Number of fields
    pub fn hlen(&self, key: &[u8]) -> Result<i64> {
        let meta_key = self.prefixed(&keys::encode_hash_meta_key(key));
        let meta: HashMeta = self.load_meta(&meta_key)?;
        Ok(meta.field_count)
    }

    /// All field names in order
    pub fn hkeys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        Ok(self.hgetall(key)?.into_iter().map(|(field, _)| field).collect())
    }

    /// All `(field, value)` pairs in field order
    pub fn hgetall(&self, key: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let prefix = self.prefixed(&keys::hash_data_key_prefix(key));
        let skip = self.prefix.len();
        self.scan_prefix(&prefix)?
            .into_iter()
            .map(|(ek, value)| {
                let (_, field) = keys::decode_hash_data_key(&ek[skip..])?;
                Ok((field, value))
            })
            .collect()
    }

    /// Remove the whole hash
    pub fn hclear(&mut self, key: &[u8]) -> Result<()> {
        let prefix = self.prefixed(&keys::hash_data_key_prefix(key));
        let fields = self.scan_prefix(&prefix)?;
        debug!(fields = fields.len(), "clearing hash");
        for (ek, _) in fields {
            self.buffer.delete(&ek)?;
        }
        let meta_key = self.prefixed(&keys::encode_hash_meta_key(key));
        self.delete_raw(&meta_key)
    }
}
