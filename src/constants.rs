//! Trie geometry. These are baked into the binary format and
//! are fixed at compile time for the production trie: every serialized
//! buffer produced by this crate assumes these exact values on the read
//! side.
//!
//! `SHIFT_1 = 10` is chosen so that one index-2 block (`INDEX_2_BLOCK_LENGTH`
//! entries, each spanning `DATA_BLOCK_LENGTH` code points) covers exactly
//! `0x400` code points — one lead surrogate's worth — so index-2 blocks
//! never straddle a plane boundary.

/// Bits of a data block's index within itself. Kept small enough that
/// `ASCII_LIMIT` is a whole multiple of `DATA_BLOCK_LENGTH`.
pub const SHIFT_2: u32 = 4;
/// Number of code points covered by one data block.
pub const DATA_BLOCK_LENGTH: usize = 1 << SHIFT_2;
/// Mask selecting a code point's offset within its data block.
pub const DATA_BLOCK_MASK: u32 = (DATA_BLOCK_LENGTH - 1) as u32;

/// Bits covered by one index-2 block (== one index-1 entry).
pub const SHIFT_1: u32 = 10;
/// Bits of index-2 offset within one index-2 block.
pub const SHIFT_1_2: u32 = SHIFT_1 - SHIFT_2;
/// Number of index-2 entries in one index-2 block.
pub const INDEX_2_BLOCK_LENGTH: usize = 1 << SHIFT_1_2;
/// Mask selecting an index-2 entry's offset within its index-2 block.
pub const INDEX_2_BLOCK_MASK: u32 = (INDEX_2_BLOCK_LENGTH - 1) as u32;

/// Shift applied to stored supplementary index-2 entries, letting a 16-bit
/// stored offset address up to `DATA_GRANULARITY * 0x10000` data slots.
pub const INDEX_SHIFT: u32 = 2;
/// Alignment modulus for supplementary data block start offsets.
pub const DATA_GRANULARITY: usize = 1 << INDEX_SHIFT;

/// Number of code points covered by one index-1 entry.
pub const CP_PER_INDEX_1_ENTRY: u32 = 1 << SHIFT_1;

/// Length of the BMP-only index-1 table that is never materialized because
/// the BMP index-2 entries are addressed directly.
pub const OMITTED_BMP_INDEX_1_LENGTH: usize = (0x10000usize) >> SHIFT_1;
/// Length, in entries, of the unshifted BMP portion of the index-2 array.
pub const BMP_INDEX_LENGTH: usize = (0x10000usize) >> SHIFT_2;

/// One past the greatest valid Unicode code point.
pub const UNICODE_LIMIT: u32 = 0x11_0000;
/// Greatest valid Unicode code point.
pub const MAX_UNICODE: u32 = 0x10_FFFF;
/// One past the last BMP code point.
pub const BMP_LIMIT: u32 = 0x1_0000;
/// One past the last ASCII code point.
pub const ASCII_LIMIT: u32 = 0x80;

/// Number of per-block metadata entries in the BMP range
/// (`BMP_LIMIT >> SHIFT_2`).
pub const BMP_I_LIMIT: usize = (BMP_LIMIT as usize) >> SHIFT_2;
/// Number of per-block metadata entries across the whole Unicode range
/// (`UNICODE_LIMIT >> SHIFT_2`).
pub const UNICODE_I_LIMIT: usize = (UNICODE_LIMIT as usize) >> SHIFT_2;
/// Number of per-block metadata entries across the ASCII range.
pub const ASCII_I_LIMIT: usize = (ASCII_LIMIT as usize) >> SHIFT_2;

/// Initial capacity of the builder's data array.
pub const INITIAL_DATA_LENGTH: usize = 1 << 14; // 16384
/// Second-stage capacity of the builder's data array.
pub const MEDIUM_DATA_LENGTH: usize = 1 << 17; // 131072
/// Final capacity of the builder's data array: one slot per code point.
pub const MAX_DATA_LENGTH: usize = UNICODE_LIMIT as usize;

/// Sentinel stored in `dataNullOffset`/`index2NullOffset` when there is no
/// common null block to point at.
pub const NO_DATA_NULL_OFFSET: u32 = 0xFFFF_FFFF;
pub const NO_INDEX_2_NULL_OFFSET: u32 = 0xFFFF;

/// Fixed capacity of the `AllSameBlocks` cache.
pub const ALL_SAME_BLOCKS_CAPACITY: usize = 32;

const _: () = assert!(SHIFT_2 <= 7);
const _: () = assert!(SHIFT_1 >= 10 && SHIFT_1 <= 16);
const _: () = assert!(INDEX_SHIFT >= 1);
const _: () = assert!(ASCII_LIMIT as usize % DATA_BLOCK_LENGTH == 0);
