//! A small, fixed-capacity cache of `ALL_SAME` blocks seen so far during
//! whole-block deduplication.
//!
//! This cache has a hard capacity (`ALL_SAME_BLOCKS_CAPACITY` = 32) and is
//! keyed by value, with a reference count per slot rather than recency —
//! eviction picks the least-referenced slot, not the least-recently-used
//! one, so a flat array scan is simpler and just as fast at this size.

use crate::constants::ALL_SAME_BLOCKS_CAPACITY;

#[derive(Clone, Copy)]
struct Slot {
    value: u32,
    block_index: usize,
    ref_count: u32,
}

/// Fixed-capacity, value-keyed cache of `ALL_SAME` block indexes with
/// reference counts, used to find reuse candidates and to identify the
/// most-referenced value (which becomes `dataNullIndex`).
pub struct AllSameBlocks {
    slots: Vec<Slot>,
}

impl AllSameBlocks {
    pub fn new() -> AllSameBlocks {
        AllSameBlocks {
            slots: Vec::with_capacity(ALL_SAME_BLOCKS_CAPACITY),
        }
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= ALL_SAME_BLOCKS_CAPACITY
    }

    /// Looks for a cached block with this value. On hit, bumps its
    /// reference count and returns the cached block index.
    pub fn find(&mut self, value: u32) -> Option<usize> {
        let slot = self.slots.iter_mut().find(|s| s.value == value)?;
        slot.ref_count += 1;
        Some(slot.block_index)
    }

    /// Inserts a new `(value, block_index)` pair with reference count 1. If
    /// the cache is full, evicts the slot with the lowest reference count
    /// first. The caller is responsible for having already established
    /// (via a full scan, if `is_full()`) that no earlier `ALL_SAME` block
    /// with this value exists before calling `add`.
    pub fn add(&mut self, value: u32, block_index: usize) {
        if self.slots.len() < ALL_SAME_BLOCKS_CAPACITY {
            self.slots.push(Slot {
                value,
                block_index,
                ref_count: 1,
            });
            return;
        }
        let evict = self
            .slots
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.ref_count)
            .map(|(i, _)| i)
            .expect("cache is non-empty when full");
        self.slots[evict] = Slot {
            value,
            block_index,
            ref_count: 1,
        };
    }

    /// The block index of the most-referenced cached value, used as
    /// `dataNullIndex`. `None` if the cache has never held an entry.
    pub fn most_referenced(&self) -> Option<usize> {
        self.slots
            .iter()
            .max_by_key(|s| s.ref_count)
            .map(|s| s.block_index)
    }
}

impl Default for AllSameBlocks {
    fn default() -> AllSameBlocks {
        AllSameBlocks::new()
    }
}
