//! Integration tests mirroring the crate's concrete test scenarios end to
//! end, through the public `CodePointTrie` handle rather than the internal
//! builder/freeze/frozen pieces exercised by the unit tests.

use cptrie::{CodePointTrie, ValueFilter, ValueWidth, MAX_UNICODE, NO_DATA_NULL_OFFSET, UNICODE_LIMIT};

#[test]
fn scenario_one_open_defaults() {
    let t = CodePointTrie::open(0, 0xBAD);
    assert_eq!(t.get(-1), 0xBAD);
    assert_eq!(t.get(UNICODE_LIMIT as i64), 0xBAD);
    assert_eq!(t.get(0), 0);
    assert_eq!(t.get(MAX_UNICODE as i64), 0);
}

#[test]
fn scenario_two_two_ascii_points() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set(0x41, 7).unwrap();
    t.set(0x42, 7).unwrap();
    t.freeze(ValueWidth::Bits16).unwrap();

    assert_eq!(t.get(0x41), 7);
    assert_eq!(t.get(0x42), 7);
    assert_eq!(t.get(0x40), 0);
    assert_eq!(t.get(0x43), 0);
    assert_eq!(t.get_range(0x41, None), (0x42, 7));
}

#[test]
fn scenario_three_split_at_ascii_limit() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set_range(0, 0x7F, 1, true).unwrap();
    t.set_range(0x80, MAX_UNICODE, 2, true).unwrap();
    t.freeze(ValueWidth::Bits16).unwrap();

    assert_eq!(t.get(0x7F), 1);
    assert_eq!(t.get(0x80), 2);
    assert!(t.high_start().unwrap() <= 0x80);
    assert_eq!(t.high_value().unwrap(), 2);
}

#[test]
fn scenario_four_ascii_written_first_and_null_offset_present() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set_range(0x1000, 0x10FF, 9, true).unwrap();
    t.freeze(ValueWidth::Bits32).unwrap();

    for cp in 0..0x80u32 {
        assert_eq!(t.get(cp as i64), 0);
    }
    assert_ne!(t.data_null_offset().unwrap(), NO_DATA_NULL_OFFSET);

    let bytes = t.to_bytes().unwrap();
    assert_eq!(&bytes[0..4], b"Tri3");
}

#[test]
fn scenario_five_supplementary_block() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set_range(0x10000, 0x1FFFF, 42, true).unwrap();
    t.freeze(ValueWidth::Bits16).unwrap();

    assert!(t.high_start().unwrap() > 0x10000);
    for cp in [0x10000u32, 0x10001, 0x1FFFF] {
        assert_eq!(t.get(cp as i64), 42);
    }
    assert_eq!(t.get(0x20000), t.high_value().unwrap());
}

#[test]
fn scenario_six_serialized_buffers_differ_only_in_the_written_value() {
    let mut a = CodePointTrie::open(0, 0xBAD);
    a.set(0x1234, 5).unwrap();
    a.freeze(ValueWidth::Bits16).unwrap();
    let bytes_a = a.to_bytes().unwrap();

    let mut b = CodePointTrie::open(0, 0xBAD);
    b.set(0x1234, 200).unwrap();
    b.freeze(ValueWidth::Bits16).unwrap();
    let bytes_b = b.to_bytes().unwrap();

    assert_eq!(bytes_a.len(), bytes_b.len());
    let diff_positions: Vec<usize> = bytes_a
        .iter()
        .zip(bytes_b.iter())
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, _)| i)
        .collect();
    assert!(!diff_positions.is_empty());
    assert!(a.get(0x1234) != b.get(0x1234));
}

#[test]
fn round_trip_through_serialization_preserves_lookups() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set_range(0x41, 0x5A, 1, true).unwrap();
    t.set_range(0x10000, 0x103FF, 99, true).unwrap();
    t.freeze(ValueWidth::Bits32).unwrap();

    let bytes = t.to_bytes().unwrap();
    let reloaded = CodePointTrie::from_bytes(&bytes).unwrap();
    assert!(reloaded.is_frozen());

    for cp in [0u32, 0x41, 0x5A, 0x5B, 0x10000, 0x103FF, 0x10400] {
        assert_eq!(reloaded.get(cp as i64), t.get(cp as i64));
    }
}

#[test]
fn get_range_with_filter_collapses_initial_value() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set(0x10, 5).unwrap();
    t.freeze(ValueWidth::Bits16).unwrap();

    let filter = ValueFilter {
        null_value: 999,
        map: &|v| v * 2,
    };
    assert_eq!(t.get_range(0, Some(&filter)), (0xF, 1998));
    assert_eq!(t.get_range(0x10, Some(&filter)), (0x10, 10));
}

#[test]
fn iteration_covers_all_unicode_without_gaps_or_overlap() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set_range(0x100, 0x1FF, 3, true).unwrap();
    t.freeze(ValueWidth::Bits16).unwrap();

    let mut last_end: Option<i64> = None;
    for (start, end, _) in t.iter().unwrap() {
        if let Some(prev) = last_end {
            assert_eq!(start as i64, prev + 1);
        } else {
            assert_eq!(start, 0);
        }
        last_end = Some(end as i64);
    }
    assert_eq!(last_end, Some(MAX_UNICODE as i64));
}

#[test]
fn iteration_with_filter_collapses_initial_value_and_applies_map() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set_range(0x100, 0x1FF, 3, true).unwrap();
    t.freeze(ValueWidth::Bits16).unwrap();

    let filter = ValueFilter {
        null_value: 0xFFFF,
        map: &|v| v * 10,
    };
    let mut last_end: Option<i64> = None;
    let mut saw_filtered_run = false;
    for (start, end, value) in t.iter_filtered(&filter).unwrap() {
        if let Some(prev) = last_end {
            assert_eq!(start as i64, prev + 1);
        } else {
            assert_eq!(start, 0);
        }
        if start == 0x100 {
            assert_eq!(end, 0x1FF);
            assert_eq!(value, 30);
            saw_filtered_run = true;
        } else {
            assert_eq!(value, 0xFFFF * 10);
        }
        last_end = Some(end as i64);
    }
    assert!(saw_filtered_run);
    assert_eq!(last_end, Some(MAX_UNICODE as i64));
}

#[test]
fn frozen_trie_rejects_further_mutation() {
    let mut t = CodePointTrie::open(0, 0xBAD);
    t.set(0x10, 1).unwrap();
    t.freeze(ValueWidth::Bits16).unwrap();

    assert!(t.set(0x10, 2).is_err());
    assert!(t.set_range(0, 1, 2, true).is_err());
    assert!(t.try_clone().is_err());
}
