//! Builder state and the mutating API over it.
//!
//! `Builder` owns the per-block `flags`/`index` metadata and the growable
//! data array backing a mutable trie. It is the mutable half of
//! [`crate::CodePointTrie`]; [`crate::freeze`] consumes it by value to
//! produce a [`crate::frozen::FrozenTrie`].

use crate::block::{BlockFlag, BlockState};
use crate::constants::*;
use crate::error::{illegal_argument, Result};

/// A value-remapping hook for `getRange`: `initial_value` readings are
/// first replaced with `null_value`, then every value (including the
/// substituted one) is passed through `map`.
pub struct ValueFilter<'a> {
    pub null_value: u32,
    pub map: &'a dyn Fn(u32) -> u32,
}

/// Mutable builder state: one `flags`/`index` entry per `DATA_BLOCK_LENGTH`
/// code points, plus a growable data array.
pub struct Builder {
    pub(crate) flags: Vec<BlockFlag>,
    pub(crate) index: Vec<u32>,
    pub(crate) data: Vec<u32>,
    pub(crate) high_start: u32,
    pub(crate) initial_value: u32,
    pub(crate) error_value: u32,
}

impl Builder {
    pub fn open(initial_value: u32, error_value: u32) -> Builder {
        let mut data = Vec::new();
        // The ladder's first rung is reserved up front.
        let _ = data.try_reserve_exact(INITIAL_DATA_LENGTH);
        Builder {
            flags: vec![BlockFlag::new(BlockState::AllSame); UNICODE_I_LIMIT],
            index: vec![initial_value; UNICODE_I_LIMIT],
            data,
            high_start: 0,
            initial_value,
            error_value,
        }
    }

    pub fn try_clone(&self) -> Builder {
        Builder {
            flags: self.flags.clone(),
            index: self.index.clone(),
            data: self.data.clone(),
            high_start: self.high_start,
            initial_value: self.initial_value,
            error_value: self.error_value,
        }
    }

    /// Grows `data`'s capacity along the three-step ladder so it can hold
    /// at least `needed` entries. Fails with `MemoryAllocation` rather than
    /// aborting the process on overflow.
    fn ensure_data_capacity(&mut self, needed: usize) -> Result<()> {
        if self.data.capacity() >= needed {
            return Ok(());
        }
        let target = if needed <= INITIAL_DATA_LENGTH {
            INITIAL_DATA_LENGTH
        } else if needed <= MEDIUM_DATA_LENGTH {
            MEDIUM_DATA_LENGTH
        } else {
            MAX_DATA_LENGTH
        };
        let additional = target.saturating_sub(self.data.len());
        self.data.try_reserve(additional).map_err(|_| {
            crate::error::TrieError::new(
                crate::error::ErrorKind::MemoryAllocation,
                "failed to grow trie data array",
            )
        })
    }

    /// Extends `high_start` to cover `cp`, rounded up to the next data
    /// block boundary, initializing newly exposed blocks as
    /// `ALL_SAME`/`initial_value`.
    fn ensure_high_start(&mut self, cp: u32) {
        if cp < self.high_start {
            return;
        }
        let new_high_start = (cp + 1 + DATA_BLOCK_MASK) & !DATA_BLOCK_MASK;
        let old_block = (self.high_start >> SHIFT_2) as usize;
        let new_block = (new_high_start >> SHIFT_2) as usize;
        for i in old_block..new_block {
            self.flags[i] = BlockFlag::new(BlockState::AllSame);
            self.index[i] = self.initial_value;
        }
        self.high_start = new_high_start;
    }

    /// Returns the data-array offset of the `DATA_BLOCK_LENGTH`-slot run
    /// backing `cp`'s block, allocating and filling a fresh run (and
    /// flipping the block to `MIXED`) if it is currently `ALL_SAME`.
    fn get_data_block(&mut self, cp: u32) -> Result<usize> {
        let i = (cp >> SHIFT_2) as usize;
        match self.flags[i].state() {
            BlockState::Mixed => Ok(self.index[i] as usize),
            BlockState::AllSame => {
                let value = self.index[i];
                let offset = self.data.len();
                self.ensure_data_capacity(offset + DATA_BLOCK_LENGTH)?;
                self.data.resize(offset + DATA_BLOCK_LENGTH, value);
                self.flags[i].set_state(BlockState::Mixed);
                self.index[i] = offset as u32;
                Ok(offset)
            }
            BlockState::SameAs | BlockState::Moved => {
                unreachable!("builder blocks are never SAME_AS/MOVED before freeze")
            }
        }
    }

    /// Sets the value for a single code point.
    pub fn set(&mut self, cp: u32, v: u32) -> Result<()> {
        if cp > MAX_UNICODE {
            return illegal_argument(&format!("code point {:#x} out of range", cp));
        }
        self.ensure_high_start(cp);
        let offset = self.get_data_block(cp)?;
        self.data[offset + (cp & DATA_BLOCK_MASK) as usize] = v;
        Ok(())
    }

    /// Sets the value for every code point in the inclusive range
    /// `[start, end]`.
    pub fn set_range(&mut self, start: u32, end: u32, v: u32, overwrite: bool) -> Result<()> {
        if start > end {
            return illegal_argument("range start is greater than end");
        }
        if end > MAX_UNICODE {
            return illegal_argument(&format!("range end {:#x} out of range", end));
        }
        if !overwrite && v == self.initial_value {
            return Ok(());
        }

        self.ensure_high_start(end);

        let limit = end + 1;
        let mut cp = start;

        if cp & DATA_BLOCK_MASK != 0 {
            let block_end = std::cmp::min(limit, (cp | DATA_BLOCK_MASK) + 1);
            self.write_partial_block(cp, block_end, v, overwrite)?;
            cp = block_end;
        }

        let whole_limit = limit & !DATA_BLOCK_MASK;
        while cp < whole_limit {
            let i = (cp >> SHIFT_2) as usize;
            match self.flags[i].state() {
                BlockState::AllSame => {
                    if overwrite || self.index[i] == self.initial_value {
                        self.index[i] = v;
                    }
                }
                BlockState::Mixed => {
                    let offset = self.index[i] as usize;
                    for slot in offset..offset + DATA_BLOCK_LENGTH {
                        if overwrite || self.data[slot] == self.initial_value {
                            self.data[slot] = v;
                        }
                    }
                }
                BlockState::SameAs | BlockState::Moved => unreachable!(),
            }
            cp += DATA_BLOCK_LENGTH as u32;
        }

        if cp < limit {
            self.write_partial_block(cp, limit, v, overwrite)?;
        }

        Ok(())
    }

    fn write_partial_block(&mut self, lo: u32, hi: u32, v: u32, overwrite: bool) -> Result<()> {
        let offset = self.get_data_block(lo)?;
        for cp in lo..hi {
            let slot = offset + (cp & DATA_BLOCK_MASK) as usize;
            if overwrite || self.data[slot] == self.initial_value {
                self.data[slot] = v;
            }
        }
        Ok(())
    }

    /// Raw value lookup with no range validation, shared by `get` and
    /// `get_range`. Callers must ensure `cp <= MAX_UNICODE`.
    fn raw_get(&self, cp: u32) -> u32 {
        if cp >= self.high_start {
            // No block has been materialized at or above high_start; the
            // builder's implicit value there is always initial_value. Once
            // frozen, this range collapses into `highValue`, which the
            // freezer computes from this same value.
            return self.initial_value;
        }
        let i = (cp >> SHIFT_2) as usize;
        match self.flags[i].state() {
            BlockState::AllSame => self.index[i],
            BlockState::Mixed => self.data[self.index[i] as usize + (cp & DATA_BLOCK_MASK) as usize],
            BlockState::SameAs | BlockState::Moved => unreachable!(),
        }
    }

    /// Looks up the value for `cp`. Accepts a signed code
    /// point so callers can probe out-of-range inputs without a separate
    /// bounds check.
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
    /// filtered) value for every code point in `[start, end]`, and `end`
    /// is the largest code point for which that holds.
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
            let i = (cp >> SHIFT_2) as usize;
            let block_start = (i as u32) * DATA_BLOCK_LENGTH as u32;
            let block_end = block_start + DATA_BLOCK_LENGTH as u32;
            match self.flags[i].state() {
                BlockState::AllSame => {
                    let v = self.filtered(self.index[i], filter);
                    if v != value0 {
                        return ((cp - 1) as i64, value0);
                    }
                    cp = block_end;
                }
                BlockState::Mixed => {
                    let offset = self.index[i] as usize;
                    while cp < block_end {
                        let v = self.filtered(self.data[offset + (cp & DATA_BLOCK_MASK) as usize], filter);
                        if v != value0 {
                            return ((cp - 1) as i64, value0);
                        }
                        cp += 1;
                    }
                }
                BlockState::SameAs | BlockState::Moved => unreachable!(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_defaults() {
        let b = Builder::open(0, 0xBAD);
        assert_eq!(b.get(-1), 0xBAD);
        assert_eq!(b.get(UNICODE_LIMIT as i64), 0xBAD);
        assert_eq!(b.get(0), 0);
        assert_eq!(b.get(MAX_UNICODE as i64), 0);
    }

    #[test]
    fn test_set_and_get_range() {
        let mut b = Builder::open(0, 0xBAD);
        b.set(0x41, 7).unwrap();
        b.set(0x42, 7).unwrap();
        assert_eq!(b.get(0x41), 7);
        assert_eq!(b.get(0x42), 7);
        assert_eq!(b.get(0x40), 0);
        assert_eq!(b.get(0x43), 0);
        assert_eq!(b.get_range(0x41, None), (0x42, 7));
    }

    #[test]
    fn test_set_range_overwrite_true() {
        let mut b = Builder::open(0, 0xBAD);
        b.set_range(0, 0x7F, 1, true).unwrap();
        b.set_range(0x80, MAX_UNICODE, 2, true).unwrap();
        for cp in 0..=0x7Fu32 {
            assert_eq!(b.get(cp as i64), 1);
        }
        assert_eq!(b.get(0x80), 2);
    }

    #[test]
    fn test_set_range_overwrite_false_only_touches_initial() {
        let mut b = Builder::open(0, 0xBAD);
        b.set(0x10, 99).unwrap();
        b.set_range(0x0, 0x20, 5, false).unwrap();
        // 0x10 was not initial_value, so overwrite=false must leave it.
        assert_eq!(b.get(0x10), 99);
        assert_eq!(b.get(0x11), 5);
        assert_eq!(b.get(0x0), 5);
    }

    #[test]
    fn test_illegal_argument_out_of_range() {
        let mut b = Builder::open(0, 0xBAD);
        assert!(b.set(UNICODE_LIMIT, 1).is_err());
        assert!(b.set_range(5, 2, 1, true).is_err());
        assert!(b.set_range(0, UNICODE_LIMIT, 1, true).is_err());
    }
}
