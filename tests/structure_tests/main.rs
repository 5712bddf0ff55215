//! Structure Tests
//!
//! Tests verify:
//! - String set / get / inc / clear
//! - Hash field bookkeeping and ordered field scans
//! - List push / pop / index / set from both ends
//! - Prefix isolation and misuse errors

use txnbuf::structure::keys;
use txnbuf::{BTreeBuffer, Comparator, MemBuffer, SkipLogBuffer, TxStructure, TxnBufError};

fn buffers() -> Vec<(&'static str, Box<dyn MemBuffer>)> {
    vec![
        ("btree", Box::new(BTreeBuffer::new(Comparator::Ascending)) as Box<dyn MemBuffer>),
        ("skiplog", Box::new(SkipLogBuffer::new(Comparator::Ascending)) as Box<dyn MemBuffer>),
    ]
}

// =============================================================================
// String Tests
// =============================================================================

#[test]
fn test_string() {
    for (name, mut buffer) in buffers() {
        let mut t = TxStructure::new(&mut *buffer, "m").unwrap();

        assert_eq!(t.get(b"a").unwrap(), None, "{}", name);
        t.set(b"a", b"1").unwrap();
        assert_eq!(t.get(b"a").unwrap(), Some(b"1".to_vec()), "{}", name);

        assert_eq!(t.inc(b"a", 1).unwrap(), 2, "{}", name);
        assert_eq!(t.inc(b"a", -5).unwrap(), -3, "{}", name);
        assert_eq!(t.get_int64(b"a").unwrap(), -3, "{}", name);
        assert_eq!(t.get_int64(b"missing").unwrap(), 0, "{}", name);

        t.clear(b"a").unwrap();
        assert_eq!(t.get(b"a").unwrap(), None, "{}", name);
        // Clearing twice is fine
        t.clear(b"a").unwrap();
    }
}

#[test]
fn test_string_rejects_empty_and_non_integer() {
    let mut buffer = BTreeBuffer::new(Comparator::Ascending);
    let mut t = TxStructure::new(&mut buffer, "m").unwrap();

    assert!(matches!(t.set(b"a", b""), Err(TxnBufError::PreconditionViolation(_))));
    t.set(b"a", b"abc").unwrap();
    assert!(matches!(t.inc(b"a", 1), Err(TxnBufError::PreconditionViolation(_))));
}

#[test]
fn test_string_key_layout() {
    let mut buffer = BTreeBuffer::new(Comparator::Ascending);
    {
        let mut t = TxStructure::new(&mut buffer, "p").unwrap();
        t.set(b"k", b"v").unwrap();
    }
    let mut expected = b"p".to_vec();
    expected.extend_from_slice(&keys::encode_string_data_key(b"k"));
    assert_eq!(buffer.get(&expected).unwrap(), b"v");
}

// =============================================================================
// Hash Tests
// =============================================================================

#[test]
fn test_hash() {
    for (name, mut buffer) in buffers() {
        let mut t = TxStructure::new(&mut *buffer, "m").unwrap();

        t.hset(b"h", b"2", b"two").unwrap();
        t.hset(b"h", b"1", b"one").unwrap();
        t.hset(b"h", b"3", b"three").unwrap();
        assert_eq!(t.hlen(b"h").unwrap(), 3, "{}", name);

        // Overwrite does not change the count
        t.hset(b"h", b"1", b"uno").unwrap();
        assert_eq!(t.hlen(b"h").unwrap(), 3, "{}", name);
        assert_eq!(t.hget(b"h", b"1").unwrap(), Some(b"uno".to_vec()), "{}", name);
        assert_eq!(t.hget(b"h", b"9").unwrap(), None, "{}", name);

        assert_eq!(
            t.hkeys(b"h").unwrap(),
            vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()],
            "{}",
            name
        );

        assert!(t.hdel(b"h", b"2").unwrap(), "{}", name);
        assert!(!t.hdel(b"h", b"2").unwrap(), "{}", name);
        assert_eq!(t.hlen(b"h").unwrap(), 2, "{}", name);
        assert_eq!(
            t.hgetall(b"h").unwrap(),
            vec![
                (b"1".to_vec(), b"uno".to_vec()),
                (b"3".to_vec(), b"three".to_vec())
            ],
            "{}",
            name
        );
    }
}

#[test]
fn test_hash_scan_stops_at_record_boundary() {
    for (name, mut buffer) in buffers() {
        let mut t = TxStructure::new(&mut *buffer, "m").unwrap();

        // "h" and "h\0" and "hh" are distinct records with adjacent raw keys
        t.hset(b"h", b"f", b"1").unwrap();
        t.hset(b"h\0", b"f", b"2").unwrap();
        t.hset(b"hh", b"f", b"3").unwrap();
        t.set(b"h", b"string").unwrap();

        assert_eq!(t.hgetall(b"h").unwrap(), vec![(b"f".to_vec(), b"1".to_vec())], "{}", name);
        assert_eq!(t.hgetall(b"h\0").unwrap(), vec![(b"f".to_vec(), b"2".to_vec())], "{}", name);
        assert!(t.hgetall(b"nope").unwrap().is_empty(), "{}", name);
    }
}

#[test]
fn test_hash_clear() {
    for (name, mut buffer) in buffers() {
        let mut t = TxStructure::new(&mut *buffer, "m").unwrap();
        for field in ["a", "b", "c"] {
            t.hset(b"h", field.as_bytes(), b"v").unwrap();
        }
        t.hset(b"other", b"a", b"v").unwrap();

        t.hclear(b"h").unwrap();
        assert_eq!(t.hlen(b"h").unwrap(), 0, "{}", name);
        assert!(t.hkeys(b"h").unwrap().is_empty(), "{}", name);
        assert_eq!(t.hlen(b"other").unwrap(), 1, "{}", name);

        // Recreate after clear
        t.hset(b"h", b"z", b"v").unwrap();
        assert_eq!(t.hlen(b"h").unwrap(), 1, "{}", name);
    }
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list() {
    for (name, mut buffer) in buffers() {
        let mut t = TxStructure::new(&mut *buffer, "m").unwrap();

        t.rpush(b"l", &[b"2", b"3"]).unwrap();
        t.lpush(b"l", &[b"1", b"0"]).unwrap();
        assert_eq!(t.llen(b"l").unwrap(), 4, "{}", name);

        let all: Vec<Vec<u8>> = ["0", "1", "2", "3"].iter().map(|s| s.as_bytes().to_vec()).collect();
        assert_eq!(t.lrange_all(b"l").unwrap(), all, "{}", name);

        assert_eq!(t.lindex(b"l", 0).unwrap(), Some(b"0".to_vec()), "{}", name);
        assert_eq!(t.lindex(b"l", -1).unwrap(), Some(b"3".to_vec()), "{}", name);
        assert_eq!(t.lindex(b"l", 4).unwrap(), None, "{}", name);
        assert_eq!(t.lindex(b"l", -5).unwrap(), None, "{}", name);

        t.lset(b"l", 1, b"one").unwrap();
        assert_eq!(t.lindex(b"l", 1).unwrap(), Some(b"one".to_vec()), "{}", name);
        assert!(t.lset(b"l", 10, b"x").is_err(), "{}", name);

        assert_eq!(t.lpop(b"l").unwrap(), Some(b"0".to_vec()), "{}", name);
        assert_eq!(t.rpop(b"l").unwrap(), Some(b"3".to_vec()), "{}", name);
        assert_eq!(t.llen(b"l").unwrap(), 2, "{}", name);
        assert_eq!(t.lpop(b"l").unwrap(), Some(b"one".to_vec()), "{}", name);
        assert_eq!(t.lpop(b"l").unwrap(), Some(b"2".to_vec()), "{}", name);
        assert_eq!(t.lpop(b"l").unwrap(), None, "{}", name);
        assert_eq!(t.llen(b"l").unwrap(), 0, "{}", name);

        // Reuse after draining
        t.rpush(b"l", &[b"again"]).unwrap();
        assert_eq!(t.lindex(b"l", 0).unwrap(), Some(b"again".to_vec()), "{}", name);
    }
}

#[test]
fn test_list_clear() {
    for (name, mut buffer) in buffers() {
        let mut t = TxStructure::new(&mut *buffer, "m").unwrap();
        t.rpush(b"l", &[b"a", b"b", b"c"]).unwrap();
        t.lclear(b"l").unwrap();
        assert_eq!(t.llen(b"l").unwrap(), 0, "{}", name);
        assert!(t.lrange_all(b"l").unwrap().is_empty(), "{}", name);
    }
    // Every element and the meta key are gone from the buffer's iteration
    for (name, mut buffer) in buffers() {
        {
            let mut t = TxStructure::new(&mut *buffer, "m").unwrap();
            t.rpush(b"l", &[b"a", b"b"]).unwrap();
            t.lclear(b"l").unwrap();
        }
        assert!(!buffer.cursor(None).valid(), "{}", name);
    }
}

// =============================================================================
// Isolation & Misuse Tests
// =============================================================================

#[test]
fn test_prefix_isolation() {
    let mut buffer = SkipLogBuffer::new(Comparator::Ascending);
    {
        let mut a = TxStructure::new(&mut buffer, "a").unwrap();
        a.set(b"k", b"from-a").unwrap();
        a.hset(b"h", b"f", b"from-a").unwrap();
    }
    {
        let mut b = TxStructure::new(&mut buffer, "b").unwrap();
        assert_eq!(b.get(b"k").unwrap(), None);
        assert!(b.hgetall(b"h").unwrap().is_empty());
        b.set(b"k", b"from-b").unwrap();
    }
    let a = TxStructure::new(&mut buffer, "a").unwrap();
    assert_eq!(a.get(b"k").unwrap(), Some(b"from-a".to_vec()));
    assert_eq!(a.prefix(), b"a");
}

#[test]
fn test_descending_buffer_rejected() {
    let mut buffer = BTreeBuffer::new(Comparator::Descending);
    let result = TxStructure::new(&mut buffer, "m");
    assert!(matches!(result, Err(TxnBufError::PreconditionViolation(_))));
}

#[test]
fn test_structure_survives_release_cycle() {
    let mut buffer = BTreeBuffer::new(Comparator::Ascending);
    {
        let mut t = TxStructure::new(&mut buffer, "m").unwrap();
        t.rpush(b"l", &[b"x"]).unwrap();
        t.hset(b"h", b"f", b"v").unwrap();
    }
    buffer.release();

    let t = TxStructure::new(&mut buffer, "m").unwrap();
    assert_eq!(t.llen(b"l").unwrap(), 0);
    assert_eq!(t.hlen(b"h").unwrap(), 0);
}
