//! Memcomparable Codec
//!
//! Order-preserving byte encodings: comparing two encoded keys with plain
//! byte comparison gives the same result as comparing the unencoded values.
//! Structured keys are built from these so that successor seeks land on
//! record boundaries.
//!
//! ## Byte groups
//! ```text
//! [ 8 data bytes ][ marker ] [ 8 data bytes ][ marker ] ...
//! marker = 0xFF - number of zero pad bytes in the group
//! ```
//! The last group is always padded (possibly fully), so every encoding is a
//! multiple of 9 bytes and no encoding is a prefix of another.

use crate::error::{Result, TxnBufError};

const GROUP_SIZE: usize = 8;
const MARKER: u8 = 0xFF;
const PAD: u8 = 0x00;
const SIGN_MASK: u64 = 1 << 63;

/// Append the memcomparable form of `data` to `buf`
pub fn encode_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    buf.reserve((data.len() / GROUP_SIZE + 1) * (GROUP_SIZE + 1));
    let mut idx = 0;
    loop {
        let remain = data.len() - idx;
        if remain >= GROUP_SIZE {
            buf.extend_from_slice(&data[idx..idx + GROUP_SIZE]);
            buf.push(MARKER);
        } else {
            let pad = GROUP_SIZE - remain;
            buf.extend_from_slice(&data[idx..]);
            buf.extend(std::iter::repeat(PAD).take(pad));
            buf.push(MARKER - pad as u8);
            return;
        }
        idx += GROUP_SIZE;
    }
}

/// Decode one memcomparable byte string, returning the unread tail and the data
pub fn decode_bytes(mut input: &[u8]) -> Result<(&[u8], Vec<u8>)> {
    let mut data = Vec::with_capacity(input.len());
    loop {
        if input.len() < GROUP_SIZE + 1 {
            return Err(TxnBufError::Encoding(
                "insufficient bytes to decode byte group".to_string(),
            ));
        }
        let (group, rest) = input.split_at(GROUP_SIZE + 1);
        input = rest;

        let marker = group[GROUP_SIZE];
        let pad = (MARKER - marker) as usize;
        if pad > GROUP_SIZE {
            return Err(TxnBufError::Encoding(format!("invalid group marker {:#04x}", marker)));
        }

        let real = GROUP_SIZE - pad;
        data.extend_from_slice(&group[..real]);
        if pad != 0 {
            if group[real..GROUP_SIZE].iter().any(|&b| b != PAD) {
                return Err(TxnBufError::Encoding("invalid padding bytes".to_string()));
            }
            return Ok((input, data));
        }
    }
}

/// Append `v` as 8 big-endian bytes
pub fn encode_uint(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Decode a big-endian u64, returning the unread tail and the value
pub fn decode_uint(input: &[u8]) -> Result<(&[u8], u64)> {
    let (head, rest) = split_word(input)?;
    Ok((rest, u64::from_be_bytes(head)))
}

/// Append `v` with the sign bit flipped so negatives sort first
pub fn encode_int(buf: &mut Vec<u8>, v: i64) {
    encode_uint(buf, (v as u64) ^ SIGN_MASK);
}

/// Decode an integer written by [`encode_int`]
pub fn decode_int(input: &[u8]) -> Result<(&[u8], i64)> {
    let (rest, u) = decode_uint(input)?;
    Ok((rest, (u ^ SIGN_MASK) as i64))
}

fn split_word(input: &[u8]) -> Result<([u8; 8], &[u8])> {
    if input.len() < 8 {
        return Err(TxnBufError::Encoding(format!(
            "need 8 bytes to decode integer, have {}",
            input.len()
        )));
    }
    let mut word = [0u8; 8];
    word.copy_from_slice(&input[..8]);
    Ok((word, &input[8..]))
}
