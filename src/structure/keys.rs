//! Structured key layout
//!
//! ```text
//! string data : encode(key) ++ 's'
//! hash meta   : encode(key) ++ 'H'
//! hash field  : encode(key) ++ 'h' ++ encode(field)
//! list meta   : encode(key) ++ 'L'
//! list element: encode(key) ++ 'l' ++ encode_int(index)
//! ```
//! `encode` is the memcomparable byte encoding, so all keys of one logical
//! record are contiguous and ordered under byte comparison.

use crate::codec;
use crate::error::{Result, TxnBufError};

/// Type tag following the encoded logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeFlag {
    StringMeta = b'S',
    StringData = b's',
    HashMeta = b'H',
    HashData = b'h',
    ListMeta = b'L',
    ListData = b'l',
}

impl TypeFlag {
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TypeFlag {
    type Error = TxnBufError;

    fn try_from(b: u8) -> Result<Self> {
        match b {
            b'S' => Ok(TypeFlag::StringMeta),
            b's' => Ok(TypeFlag::StringData),
            b'H' => Ok(TypeFlag::HashMeta),
            b'h' => Ok(TypeFlag::HashData),
            b'L' => Ok(TypeFlag::ListMeta),
            b'l' => Ok(TypeFlag::ListData),
            other => Err(TxnBufError::Encoding(format!("unknown type flag {:#04x}", other))),
        }
    }
}

fn with_flag(key: &[u8], flag: TypeFlag, extra: usize) -> Vec<u8> {
    let mut ek = Vec::with_capacity(key.len() + 10 + extra);
    codec::encode_bytes(&mut ek, key);
    ek.push(flag.as_byte());
    ek
}

pub fn encode_string_data_key(key: &[u8]) -> Vec<u8> {
    with_flag(key, TypeFlag::StringData, 0)
}

pub fn encode_hash_meta_key(key: &[u8]) -> Vec<u8> {
    with_flag(key, TypeFlag::HashMeta, 0)
}

pub fn encode_hash_data_key(key: &[u8], field: &[u8]) -> Vec<u8> {
    let mut ek = with_flag(key, TypeFlag::HashData, field.len() + 9);
    codec::encode_bytes(&mut ek, field);
    ek
}

/// Common prefix of every field key of one hash
pub fn hash_data_key_prefix(key: &[u8]) -> Vec<u8> {
    with_flag(key, TypeFlag::HashData, 0)
}

/// Split a hash field key back into `(key, field)`
pub fn decode_hash_data_key(ek: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let (rest, key) = codec::decode_bytes(ek)?;
    let (flag, rest) = rest
        .split_first()
        .ok_or_else(|| TxnBufError::Encoding("missing type flag".to_string()))?;
    if TypeFlag::try_from(*flag)? != TypeFlag::HashData {
        return Err(TxnBufError::Encoding(format!(
            "invalid encoded hash data key flag {}",
            *flag as char
        )));
    }
    let (_, field) = codec::decode_bytes(rest)?;
    Ok((key, field))
}

pub fn encode_list_meta_key(key: &[u8]) -> Vec<u8> {
    with_flag(key, TypeFlag::ListMeta, 0)
}

pub fn encode_list_data_key(key: &[u8], index: i64) -> Vec<u8> {
    let mut ek = with_flag(key, TypeFlag::ListData, 8);
    codec::encode_int(&mut ek, index);
    ek
}
