//! Binary encode/decode for a frozen trie, built on fixed-width field
//! encoding (`integer_encoding::FixedInt`) for checksums, record lengths
//! and internal-key tags elsewhere in this style of codebase.
//!
//! Header layout (little-endian, 24 bytes):
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 4 | signature `b"Tri3"` |
//! | 4 | 4 | options: bits\[31:12\] = `dataNullOffset + dataMove` (20-bit field, all-ones sentinel when absent); bits\[11:0\] = value-width code (0=16, 1=32) |
//! | 8 | 2 | `indexLength` |
//! | 10 | 2 | `shiftedDataLength` = `dataLength >> INDEX_SHIFT` |
//! | 12 | 2 | `index2NullOffset` |
//! | 14 | 2 | `shiftedHighStart` = `highStart >> SHIFT_1` |
//! | 16 | 4 | `highValue` |
//! | 20 | 4 | `errorValue` |
//!
//! `initialValue` has no header field: the source format never carries it
//! directly either. It is instead recovered from `data[dataNullOffset]`,
//! the most-common ALL_SAME block compaction already tracked; when no
//! common null block exists there is nothing left in the serialized data
//! that could disagree with any particular choice, so `0` is used.

use crate::constants::*;
use crate::error::{invalid_format, Result};
use crate::freeze::{CompactedTrie, ValueWidth};
use integer_encoding::FixedInt;

const SIGNATURE: &[u8; 4] = b"Tri3";
const HEADER_LEN: usize = 24;
/// All-ones 20-bit sentinel for the options field's `dataNullOffset`
/// sub-field, distinct from the pipeline-internal, full-width
/// `NO_DATA_NULL_OFFSET`, the pipeline-internal full-width sentinel.
const HEADER_NO_DATA_NULL_OFFSET: u32 = 0xFFFFF;

fn push_fixed<T: FixedInt>(buf: &mut Vec<u8>, v: T) {
    let mut tmp = vec![0u8; T::ENCODED_SIZE];
    v.encode_fixed(&mut tmp);
    buf.extend_from_slice(&tmp);
}

/// Serializes a compacted trie into the wire format below.
pub(crate) fn to_bytes(t: &CompactedTrie) -> Vec<u8> {
    let value_bits_code: u32 = match t.value_bits {
        ValueWidth::Bits16 => 0,
        ValueWidth::Bits32 => 1,
    };
    let null_field = if t.data_null_offset == NO_DATA_NULL_OFFSET {
        HEADER_NO_DATA_NULL_OFFSET
    } else {
        t.data_null_offset & HEADER_NO_DATA_NULL_OFFSET
    };
    let options = (null_field << 12) | value_bits_code;

    let index_length = t.index.len();
    let data_length = match &t.data16 {
        Some(d) => d.len(),
        None => t.data32.as_ref().expect("one of data16/data32 is present").len(),
    };
    let shifted_data_length = (data_length >> INDEX_SHIFT) as u16;

    let mut buf = Vec::with_capacity(
        HEADER_LEN
            + index_length * 2
            + data_length
                * match t.value_bits {
                    ValueWidth::Bits16 => 2,
                    ValueWidth::Bits32 => 4,
                },
    );
    buf.extend_from_slice(SIGNATURE);
    push_fixed(&mut buf, options);
    push_fixed(&mut buf, index_length as u16);
    push_fixed(&mut buf, shifted_data_length);
    push_fixed(&mut buf, t.index2_null_offset as u16);
    push_fixed(&mut buf, (t.high_start >> SHIFT_1) as u16);
    push_fixed(&mut buf, t.high_value);
    push_fixed(&mut buf, t.error_value);

    for &e in &t.index {
        push_fixed(&mut buf, e);
    }
    match (&t.data16, &t.data32) {
        (Some(d), _) => {
            for &v in d {
                push_fixed(&mut buf, v);
            }
        }
        (None, Some(d)) => {
            for &v in d {
                push_fixed(&mut buf, v);
            }
        }
        (None, None) => unreachable!("one of data16/data32 is present"),
    }
    buf
}

fn read_fixed<T: FixedInt>(bytes: &[u8], pos: usize) -> T {
    T::decode_fixed(&bytes[pos..pos + T::ENCODED_SIZE]).expect("slice length matches ENCODED_SIZE")
}

/// Parses the wire format below back into a `CompactedTrie`. `InvalidFormat`
/// on an unrecognized signature, an unrecognized value-width code, or a
/// buffer whose length disagrees with its own header.
pub(crate) fn from_bytes(bytes: &[u8]) -> Result<CompactedTrie> {
    if bytes.len() < HEADER_LEN {
        return invalid_format("buffer shorter than the trie header");
    }
    if &bytes[0..4] != SIGNATURE {
        return invalid_format("signature is not \"Tri3\"");
    }

    let options: u32 = read_fixed(bytes, 4);
    let value_bits = match options & 0xFFF {
        0 => ValueWidth::Bits16,
        1 => ValueWidth::Bits32,
        other => return invalid_format(&format!("unrecognized value-width code {}", other)),
    };
    let null_field = options >> 12;

    let index_length: usize = (read_fixed::<u16>(bytes, 8)) as usize;
    let shifted_data_length: usize = (read_fixed::<u16>(bytes, 10)) as usize;
    let index2_null_offset: u32 = read_fixed::<u16>(bytes, 12) as u32;
    let shifted_high_start: u32 = read_fixed::<u16>(bytes, 14) as u32;
    let high_value: u32 = read_fixed(bytes, 16);
    let error_value: u32 = read_fixed(bytes, 20);

    let data_length = shifted_data_length << INDEX_SHIFT;
    let value_width_bytes = match value_bits {
        ValueWidth::Bits16 => 2,
        ValueWidth::Bits32 => 4,
    };
    let expected_len = HEADER_LEN + index_length * 2 + data_length * value_width_bytes;
    if bytes.len() != expected_len {
        return invalid_format("buffer length does not match the header's declared sizes");
    }

    let mut index = Vec::with_capacity(index_length);
    let mut pos = HEADER_LEN;
    for _ in 0..index_length {
        index.push(read_fixed::<u16>(bytes, pos));
        pos += 2;
    }

    let (data16, data32) = match value_bits {
        ValueWidth::Bits16 => {
            let mut d = Vec::with_capacity(data_length);
            for _ in 0..data_length {
                d.push(read_fixed::<u16>(bytes, pos));
                pos += 2;
            }
            (Some(d), None)
        }
        ValueWidth::Bits32 => {
            let mut d = Vec::with_capacity(data_length);
            for _ in 0..data_length {
                d.push(read_fixed::<u32>(bytes, pos));
                pos += 4;
            }
            (None, Some(d))
        }
    };

    let high_start = shifted_high_start << SHIFT_1;
    let data_move: u32 = match value_bits {
        ValueWidth::Bits16 => index_length as u32,
        ValueWidth::Bits32 => 0,
    };

    let data_null_offset = if null_field == HEADER_NO_DATA_NULL_OFFSET {
        NO_DATA_NULL_OFFSET
    } else {
        null_field
    };

    let initial_value = if data_null_offset != NO_DATA_NULL_OFFSET {
        let real_offset = (data_null_offset - data_move) as usize;
        match &data16 {
            Some(d) => d[real_offset] as u32,
            None => data32.as_ref().expect("one of data16/data32 is present")[real_offset],
        }
    } else {
        0
    };

    Ok(CompactedTrie {
        index,
        data16,
        data32,
        high_start,
        high_value,
        initial_value,
        error_value,
        data_null_offset,
        index2_null_offset,
        value_bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::freeze::freeze;

    #[test]
    fn test_round_trip_16_bit() {
        let mut b = Builder::open(0, 0xBAD);
        b.set(0x41, 7).unwrap();
        b.set_range(0x1000, 0x10FF, 99, true).unwrap();
        let compacted = freeze(b, ValueWidth::Bits16).unwrap();
        let bytes = to_bytes(&compacted);
        assert_eq!(&bytes[0..4], SIGNATURE);
        let parsed = from_bytes(&bytes).unwrap();
        assert_eq!(parsed.index, compacted.index);
        assert_eq!(parsed.data16, compacted.data16);
        assert_eq!(parsed.high_start, compacted.high_start);
        assert_eq!(parsed.high_value, compacted.high_value);
        assert_eq!(parsed.error_value, compacted.error_value);
    }

    #[test]
    fn test_round_trip_32_bit_supplementary() {
        let mut b = Builder::open(0, 0xBAD);
        b.set_range(0x10000, 0x1FFFF, 42, true).unwrap();
        let compacted = freeze(b, ValueWidth::Bits32).unwrap();
        let bytes = to_bytes(&compacted);
        let parsed = from_bytes(&bytes).unwrap();
        assert_eq!(parsed.data32, compacted.data32);
        assert_eq!(parsed.index, compacted.index);
    }

    #[test]
    fn test_bad_signature_is_invalid_format() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(b"NOPE");
        assert!(from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_truncated_buffer_is_invalid_format() {
        let mut b = Builder::open(0, 0xBAD);
        b.set(0x41, 7).unwrap();
        let compacted = freeze(b, ValueWidth::Bits16).unwrap();
        let mut bytes = to_bytes(&compacted);
        bytes.pop();
        assert!(from_bytes(&bytes).is_err());
    }
}
