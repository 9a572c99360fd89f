//! A compact, immutable Unicode code-point trie.
//!
//! [`CodePointTrie`] maps every code point in `[0, 0x10FFFF]` to a 16- or
//! 32-bit property value. It starts out mutable — `open`, then any number of
//! `set`/`set_range` calls — and is built incrementally with [`set`] and
//! [`set_range`], then [`freeze`]d once into a densely packed, read-only
//! representation that can be serialized to and from a contiguous byte
//! buffer and looked up in O(1) from any number of threads.
//!
//! The interesting engineering lives in the freeze pipeline
//! ([`freeze`](CodePointTrie::freeze)): whole-block deduplication, byte-level
//! overlap of adjacent data blocks, and a two-level index split between an
//! unshifted Basic Multilingual Plane region and a granularity-aligned,
//! 16-bit-shifted supplementary region. See `DESIGN.md` for how each piece
//! maps onto the module layout below.
//!
//! [`set`]: CodePointTrie::set
//! [`set_range`]: CodePointTrie::set_range

#![allow(dead_code)]

mod block;
mod constants;
mod error;
#[macro_use]
mod logging;
mod builder;
mod freeze;
mod frozen;
mod same_blocks;
mod serialize;
mod trie;

pub use builder::ValueFilter;
pub use constants::{ASCII_LIMIT, BMP_LIMIT, MAX_UNICODE, NO_DATA_NULL_OFFSET, UNICODE_LIMIT};
pub use error::{ErrorKind, Result, TrieError};
pub use freeze::ValueWidth;
pub use frozen::RangeIter;
pub use trie::CodePointTrie;
