//! Property-based tests for `BinaryReader`.

use proptest::prelude::*;
use sqpack_rs::binary_reader::{BinaryReader, DEFAULT_ALIGNMENT};
use sqpack_rs::endianness::Endianness;
use uuid::Uuid;

/// Encodes `n` in 7-bit groups, low group first, high bit marking continuation.
fn encode_var_int(mut n: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let group = (n & 0x7F) as u8;
        n >>= 7;
        if n == 0 {
            out.push(group);
            return out;
        }
        out.push(group | 0x80);
    }
}

fn endianness_strategy() -> impl Strategy<Value = Endianness> {
    prop_oneof![
        Just(Endianness::Little),
        Just(Endianness::Big),
        Just(Endianness::Native),
        Just(Endianness::Network),
    ]
}

proptest! {
    #[test]
    fn var_int_round_trips(n in 0u64..(1u64 << 35)) {
        let encoded = encode_var_int(n);
        let len = encoded.len() as u64;
        let mut reader = BinaryReader::load(encoded, Endianness::Little);
        prop_assert_eq!(reader.read_var_int().unwrap(), n);
        prop_assert_eq!(reader.position().unwrap(), len);
    }

    #[test]
    fn var_int_full_range(n in any::<u64>()) {
        let mut reader = BinaryReader::load(encode_var_int(n), Endianness::Big);
        prop_assert_eq!(reader.read_var_int().unwrap(), n);
    }

    #[test]
    fn u32_follows_byte_order(value in any::<u32>(), endianness in endianness_strategy()) {
        let bytes = if endianness.is_little() {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        let mut reader = BinaryReader::load(bytes.to_vec(), endianness);
        prop_assert_eq!(reader.read_u32().unwrap(), value);
    }

    #[test]
    fn i64_and_f64_follow_byte_order(value in any::<i64>(), float in any::<f64>(), endianness in endianness_strategy()) {
        let mut bytes = Vec::new();
        if endianness.is_little() {
            bytes.extend_from_slice(&value.to_le_bytes());
            bytes.extend_from_slice(&float.to_le_bytes());
        } else {
            bytes.extend_from_slice(&value.to_be_bytes());
            bytes.extend_from_slice(&float.to_be_bytes());
        }
        let mut reader = BinaryReader::load(bytes, endianness);
        prop_assert_eq!(reader.read_i64().unwrap(), value);
        prop_assert_eq!(reader.read_f64().unwrap().to_bits(), float.to_bits());
    }

    #[test]
    fn guid_text_is_stable_and_bytes_round_trip(raw in any::<[u8; 16]>()) {
        let mut data = raw.to_vec();
        data.extend_from_slice(&raw);
        let mut reader = BinaryReader::load(data, Endianness::Big);

        let first = reader.read_guid().unwrap();
        let second = reader.read_guid().unwrap();
        prop_assert_eq!(first.to_string(), second.to_string());
        prop_assert_eq!(first.to_bytes_le(), raw);
        prop_assert_eq!(Uuid::parse_str(&first.to_string()).unwrap(), first);
    }

    #[test]
    fn mark_skip_reset_returns(start in 0u64..64, k in 0i64..512) {
        let mut reader = BinaryReader::load(vec![0u8; 64], Endianness::Little);
        reader.set_position(start).unwrap();
        reader.mark().unwrap();
        reader.skip(k).unwrap();
        reader.reset().unwrap();
        prop_assert_eq!(reader.position().unwrap(), start);
    }

    #[test]
    fn align_is_idempotent(pos in 0u64..256, entry in 0i64..256, base in 0i64..256) {
        let mut reader = BinaryReader::load(vec![0u8; 16], Endianness::Little);
        reader.set_base_offset(base);
        reader.set_entry_offset(Some(entry)).unwrap();
        reader.set_position(pos).unwrap();

        reader.align(DEFAULT_ALIGNMENT).unwrap();
        let aligned = reader.position().unwrap();
        prop_assert!(aligned >= pos && aligned - pos < DEFAULT_ALIGNMENT);
        prop_assert_eq!((aligned as i64 - entry + base).rem_euclid(16), 0);

        reader.align(DEFAULT_ALIGNMENT).unwrap();
        prop_assert_eq!(reader.position().unwrap(), aligned);
    }

    #[test]
    fn find_locates_first_occurrence(
        haystack in proptest::collection::vec(0u8..3, 0..64),
        needle in proptest::collection::vec(0u8..3, 1..4),
    ) {
        let expected = haystack
            .windows(needle.len())
            .position(|w| w == needle.as_slice());
        let mut reader = BinaryReader::load(haystack, Endianness::Little);

        let found = reader.find(&needle, false).unwrap();
        prop_assert_eq!(found, expected.is_some());
        prop_assert_eq!(reader.position().unwrap(), expected.unwrap_or(0) as u64);
    }
}
