//! Tests for the entry codec
//!
//! These tests verify:
//! - Round-trip encoding for live values and tombstones
//! - Exact consumed-byte reporting
//! - Short-read detection at every truncation point
//! - Rejection of unknown kind tags and non-UTF-8 payloads

use bigsby::storage::{Entry, Value};
use bigsby::BigsbyError;

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_round_trip_data_entry() {
    let entry = Entry::new("hello", Value::Data("world".to_string()));
    let encoded = entry.encode();

    // keyLen (4) + key (5) + kind (1) + valLen (4) + value (5)
    assert_eq!(encoded.len(), 19);

    let (decoded, consumed) = Entry::decode(&encoded).unwrap();
    assert_eq!(decoded, entry);
    assert_eq!(consumed, encoded.len());
}

#[test]
fn test_round_trip_tombstone() {
    let entry = Entry::new("hello", Value::Tombstone);
    let encoded = entry.encode();

    // keyLen (4) + key (5) + kind (1), no value bytes at all
    assert_eq!(encoded.len(), 10);

    let (decoded, consumed) = Entry::decode(&encoded).unwrap();
    assert_eq!(decoded, entry);
    assert_eq!(consumed, encoded.len());
}

#[test]
fn test_round_trip_empty_key_and_value() {
    // The codec permits empty keys and values; any policy against them
    // belongs to a higher layer.
    let entry = Entry::new("", Value::Data(String::new()));
    let encoded = entry.encode();
    assert_eq!(encoded.len(), 9);

    let (decoded, consumed) = Entry::decode(&encoded).unwrap();
    assert_eq!(decoded, entry);
    assert_eq!(consumed, 9);
}

#[test]
fn test_tombstone_cannot_alias_user_value() {
    // A user value spelled like a deletion marker is still just data.
    let entry = Entry::new("key", Value::Data("<tombstone>".to_string()));
    let (decoded, _) = Entry::decode(&entry.encode()).unwrap();
    assert!(!decoded.value.is_tombstone());
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let first = Entry::new("a", Value::Data("1".to_string()));
    let second = Entry::new("b", Value::Tombstone);

    let mut stream = first.encode();
    stream.extend_from_slice(&second.encode());

    let (decoded, consumed) = Entry::decode(&stream).unwrap();
    assert_eq!(decoded, first);

    let (decoded, _) = Entry::decode(&stream[consumed..]).unwrap();
    assert_eq!(decoded, second);
}

// =============================================================================
// Decode Failures
// =============================================================================

#[test]
fn test_decode_empty_buffer() {
    let result = Entry::decode(&[]);
    assert!(matches!(
        result,
        Err(BigsbyError::ShortRead { needed: 4, had: 0 })
    ));
}

#[test]
fn test_decode_truncated_at_every_point() {
    let encoded = Entry::new("hello", Value::Data("world".to_string())).encode();

    // Any strict prefix must fail with a short read.
    for cut in 0..encoded.len() {
        let result = Entry::decode(&encoded[..cut]);
        assert!(
            matches!(result, Err(BigsbyError::ShortRead { .. })),
            "expected short read at cut {cut}"
        );
    }
}

#[test]
fn test_decode_truncated_tombstone() {
    let encoded = Entry::new("key", Value::Tombstone).encode();
    let result = Entry::decode(&encoded[..encoded.len() - 1]);
    assert!(matches!(result, Err(BigsbyError::ShortRead { .. })));
}

#[test]
fn test_decode_unknown_kind() {
    let mut encoded = Entry::new("key", Value::Tombstone).encode();
    let last = encoded.len() - 1;
    encoded[last] = 0x7f;

    let result = Entry::decode(&encoded);
    assert!(matches!(result, Err(BigsbyError::Decode(_))));
}

#[test]
fn test_decode_invalid_utf8_key() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&2u32.to_be_bytes());
    buf.extend_from_slice(&[0xff, 0xfe]);
    buf.push(1); // tombstone kind

    let result = Entry::decode(&buf);
    assert!(matches!(result, Err(BigsbyError::Decode(_))));
}
