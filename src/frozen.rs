//! The read-only trie produced by [`crate::freeze::freeze`]. Lookups here
//! are intentionally simple: all the real work already happened during
//! compaction, so this module is a thin reader over the arrays `freeze`
//! already laid out, not another compaction pass.

use crate::builder::ValueFilter;
use crate::constants::*;
use crate::freeze::{CompactedTrie, ValueWidth};

/// An immutable, compacted code point trie, safe to read from any number of
/// threads concurrently.
pub struct FrozenTrie {
    pub(crate) index: Vec<u16>,
    pub(crate) data16: Option<Vec<u16>>,
    pub(crate) data32: Option<Vec<u32>>,
    pub(crate) high_start: u32,
    pub(crate) high_value: u32,
    pub(crate) initial_value: u32,
    pub(crate) error_value: u32,
    pub(crate) data_null_offset: u32,
    pub(crate) index2_null_offset: u32,
    pub(crate) value_bits: ValueWidth,
}

impl FrozenTrie {
    pub(crate) fn from_compacted(t: CompactedTrie) -> FrozenTrie {
        FrozenTrie {
            index: t.index,
            data16: t.data16,
            data32: t.data32,
            high_start: t.high_start,
            high_value: t.high_value,
            initial_value: t.initial_value,
            error_value: t.error_value,
            data_null_offset: t.data_null_offset,
            index2_null_offset: t.index2_null_offset,
            value_bits: t.value_bits,
        }
    }

    pub(crate) fn value_bits(&self) -> ValueWidth {
        self.value_bits
    }

    /// Reconstructs the `CompactedTrie` view this trie was built from, for
    /// `crate::serialize` to consume. A plain field-for-field clone; no
    /// compaction work is redone.
    pub(crate) fn to_compacted(&self) -> CompactedTrie {
        CompactedTrie {
            index: self.index.clone(),
            data16: self.data16.clone(),
            data32: self.data32.clone(),
            high_start: self.high_start,
            high_value: self.high_value,
            initial_value: self.initial_value,
            error_value: self.error_value,
            data_null_offset: self.data_null_offset,
            index2_null_offset: self.index2_null_offset,
            value_bits: self.value_bits,
        }
    }

    fn data_move(&self) -> u32 {
        match self.value_bits {
            ValueWidth::Bits16 => self.index.len() as u32,
            ValueWidth::Bits32 => 0,
        }
    }

    /// Single-indirect BMP lookup: stays one pointer-chase deep for any
    /// BMP code point. Valid for any `cp < BMP_LIMIT`: the compactor
    /// always pads the BMP index-2 region out to `BMP_I_LIMIT`, so there is
    /// never a `high_start` check to make here.
    fn fast_bmp_offset(&self, cp: u32, data_move: u32) -> usize {
        let stored = self.index[(cp >> SHIFT_2) as usize] as u32;
        (stored - data_move) as usize
    }

    /// Two-level supplementary lookup: index-1 selects an index-2 block,
    /// then the block's entry for `cp` gives the data offset.
    ///
    /// A deduped supplementary index-2 block may have been folded into the
    /// BMP portion of the index array during compaction;
    /// entries there are stored unshifted (the same encoding a direct BMP
    /// lookup uses), while entries in the true supplementary portion are
    /// shifted by `INDEX_SHIFT`. Which encoding applies is determined
    /// entirely by position, not by how the lookup arrived there.
    fn supp_offset(&self, cp: u32, data_move: u32) -> usize {
        let i1 = BMP_I_LIMIT + (((cp - BMP_LIMIT) >> SHIFT_1) as usize);
        let block_start = self.index[i1] as usize;
        let i2_pos = block_start + (((cp >> SHIFT_2) as usize) & (INDEX_2_BLOCK_LENGTH - 1));
        let stored = self.index[i2_pos] as u32;
        if i2_pos < BMP_INDEX_LENGTH {
            (stored - data_move) as usize
        } else {
            (((stored as u64) << INDEX_SHIFT) - data_move as u64) as usize
        }
    }

    fn read_data(&self, slot: usize) -> u32 {
        match &self.data16 {
            Some(d) => d[slot] as u32,
            None => self.data32.as_ref().expect("32-bit data present when data16 is None")[slot],
        }
    }

    fn raw_get(&self, cp: u32) -> u32 {
        if cp >= self.high_start {
            return self.high_value;
        }
        let data_move = self.data_move();
        let offset = if cp < BMP_LIMIT {
            self.fast_bmp_offset(cp, data_move)
        } else {
            self.supp_offset(cp, data_move)
        };
        self.read_data(offset + (cp & DATA_BLOCK_MASK) as usize)
    }

    /// Looks up the value for `cp`. Accepts a signed code
    /// point so out-of-range probes don't need a separate bounds check.
    pub fn get(&self, cp: i64) -> u32 {
        if cp < 0 || cp as u32 > MAX_UNICODE {
            return self.error_value;
        }
        self.raw_get(cp as u32)
    }

    fn filtered(&self, raw: u32, filter: Option<&ValueFilter>) -> u32 {
        match filter {
            None => raw,
            Some(f) => {
                let v = if raw == self.initial_value {
                    f.null_value
                } else {
                    raw
                };
                (f.map)(v)
            }
        }
    }

    /// Returns `(end, value)` such that `value` is the (optionally
    /// filtered) value for every code point in `[start, end]`, and `end` is
    /// the largest code point for which that holds.
    /// `end == -1` signals an out-of-range `start`.
    pub fn get_range(&self, start: i64, filter: Option<&ValueFilter>) -> (i64, u32) {
        if start < 0 || start as u32 > MAX_UNICODE {
            return (-1, self.error_value);
        }
        let start = start as u32;
        let value0 = self.filtered(self.raw_get(start), filter);
        let mut cp = start;

        loop {
            if cp >= self.high_start {
                return (MAX_UNICODE as i64, value0);
            }
            let block_end = (cp & !DATA_BLOCK_MASK) + DATA_BLOCK_LENGTH as u32;
            while cp < block_end {
                let v = self.filtered(self.raw_get(cp), filter);
                if v != value0 {
                    return ((cp - 1) as i64, value0);
                }
                cp += 1;
            }
        }
    }

    /// Iterates the trie as `(start, end, value)` runs covering all of
    /// Unicode, using `get_range` under the hood — a direct, idiomatic
    /// consequence of it, since every higher-level scan is really just
    /// repeated `get_range` calls.
    pub fn iter(&self) -> RangeIter<'_> {
        RangeIter {
            trie: self,
            filter: None,
            next_cp: 0,
            done: false,
        }
    }

    /// As `iter`, but applying `filter` to every yielded value.
    pub fn iter_filtered<'a>(&'a self, filter: &'a ValueFilter<'a>) -> RangeIter<'a> {
        RangeIter {
            trie: self,
            filter: Some(filter),
            next_cp: 0,
            done: false,
        }
    }

    pub fn high_start(&self) -> u32 {
        self.high_start
    }

    pub fn high_value(&self) -> u32 {
        self.high_value
    }

    pub fn data_null_offset(&self) -> u32 {
        self.data_null_offset
    }

    pub fn index2_null_offset(&self) -> u32 {
        self.index2_null_offset
    }
}

pub struct RangeIter<'a> {
    trie: &'a FrozenTrie,
    filter: Option<&'a ValueFilter<'a>>,
    next_cp: i64,
    done: bool,
}

impl<'a> Iterator for RangeIter<'a> {
    type Item = (u32, u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let start = self.next_cp;
        let (end, value) = self.trie.get_range(start, self.filter);
        if end < 0 {
            self.done = true;
            return None;
        }
        self.next_cp = end + 1;
        if self.next_cp > MAX_UNICODE as i64 {
            self.done = true;
        }
        Some((start as u32, end as u32, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::freeze::freeze;

    fn frozen(initial: u32, error: u32, setup: impl FnOnce(&mut Builder)) -> FrozenTrie {
        let mut b = Builder::open(initial, error);
        setup(&mut b);
        FrozenTrie::from_compacted(freeze(b, ValueWidth::Bits16).unwrap())
    }

    #[test]
    fn test_get_matches_builder_semantics() {
        let t = frozen(0, 0xBAD, |b| {
            b.set(0x41, 7).unwrap();
            b.set(0x42, 7).unwrap();
        });
        assert_eq!(t.get(-1), 0xBAD);
        assert_eq!(t.get(UNICODE_LIMIT as i64), 0xBAD);
        assert_eq!(t.get(0x41), 7);
        assert_eq!(t.get(0x42), 7);
        assert_eq!(t.get(0x40), 0);
        assert_eq!(t.get_range(0x41, None), (0x42, 7));
    }

    #[test]
    fn test_get_range_filter_collapses_initial_value() {
        let t = frozen(0, 0xBAD, |b| {
            b.set(0x10, 5).unwrap();
        });
        let filter = ValueFilter {
            null_value: 999,
            map: &|v| v * 2,
        };
        assert_eq!(t.get_range(0, Some(&filter)), (0xF, 1998));
        assert_eq!(t.get_range(0x10, Some(&filter)), (0x10, 10));
    }

    #[test]
    fn test_iter_covers_all_unicode_without_overlap() {
        let t = frozen(0, 0xBAD, |b| {
            b.set_range(0x10, 0x1F, 9, true).unwrap();
        });
        let mut last_end: Option<i64> = None;
        let mut saw_9 = false;
        for (start, end, value) in t.iter() {
            if let Some(prev) = last_end {
                assert_eq!(start as i64, prev + 1);
            } else {
                assert_eq!(start, 0);
            }
            if value == 9 {
                saw_9 = true;
                assert_eq!(start, 0x10);
                assert_eq!(end, 0x1F);
            }
            last_end = Some(end as i64);
        }
        assert!(saw_9);
        assert_eq!(last_end, Some(MAX_UNICODE as i64));
    }

    #[test]
    fn test_supplementary_lookup_through_index1() {
        let t = frozen(0, 0xBAD, |b| {
            b.set_range(0x10000, 0x1FFFF, 42, true).unwrap();
        });
        assert_eq!(t.get(0x10000), 42);
        assert_eq!(t.get(0x1FFFF), 42);
        assert_eq!(t.get(0x20000), t.high_value());
    }
}
