//! Buffer Tests
//!
//! Every test runs against both backends through the `MemBuffer` trait.


use txnbuf::{BTreeBuffer, Comparator, MemBuffer, SkipLogBuffer};

/// One ascending buffer per backend
pub fn ascending_buffers() -> Vec<(&'static str, Box<dyn MemBuffer>)> {
    buffers(Comparator::Ascending)
}

pub fn buffers(order: Comparator) -> Vec<(&'static str, Box<dyn MemBuffer>)> {
    vec![
        ("btree", Box::new(BTreeBuffer::new(order)) as Box<dyn MemBuffer>),
        ("skiplog", Box::new(SkipLogBuffer::new(order)) as Box<dyn MemBuffer>),
    ]
}

/// Zero-padded decimal key, matching fixed-width record ids
pub fn encode_int(n: usize) -> Vec<u8> {
    format!("{:010}", n).into_bytes()
}

/// Write `key == value` for each key
pub fn insert_all(buffer: &mut dyn MemBuffer, keys: &[&str]) {
    for key in keys {
        buffer.set(key.as_bytes(), key.as_bytes()).unwrap();
    }
}

/// Keys yielded by a fresh cursor from `seed`
pub fn keys_from(buffer: &dyn MemBuffer, seed: Option<&[u8]>) -> Vec<String> {
    let mut cursor = buffer.cursor(seed);
    let entries = txnbuf::cursor::collect(&mut cursor).unwrap();
    entries
        .into_iter()
        .map(|(k, _)| String::from_utf8(k).unwrap())
        .collect()
}
