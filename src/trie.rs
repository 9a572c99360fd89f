//! The single handle a caller holds across a trie's whole lifecycle:
//! `open` returns it mutable, `freeze` flips it read-only in place, `close`
//! drops it. One owned struct threads through the whole lifecycle rather
//! than returning a different type from `freeze` and asking the caller to
//! manage two handles.

use crate::builder::{Builder, ValueFilter};
use crate::error::{illegal_argument, no_write_permission, Result};
use crate::freeze::{freeze as compact, CompactedTrie, ValueWidth};
use crate::frozen::{FrozenTrie, RangeIter};
use crate::serialize;

enum Inner {
    Building(Builder),
    Frozen(FrozenTrie),
    /// Only ever observed transiently inside `freeze`, while the builder
    /// has been taken out for compaction and the result isn't ready yet.
    Empty,
}

/// A code point trie, mutable until [`CodePointTrie::freeze`] is called and
/// read-only afterward.
pub struct CodePointTrie {
    inner: Inner,
    frozen_width: Option<ValueWidth>,
}

impl CodePointTrie {
    /// Opens a fresh, mutable trie. `initial` is returned for
    /// any code point never explicitly set; `error` is returned for
    /// out-of-range lookups.
    pub fn open(initial: u32, error: u32) -> CodePointTrie {
        CodePointTrie {
            inner: Inner::Building(Builder::open(initial, error)),
            frozen_width: None,
        }
    }

    /// Deep-copies a still-mutable trie. Fails with `IllegalArgument` once
    /// the trie has been frozen.
    pub fn try_clone(&self) -> Result<CodePointTrie> {
        match &self.inner {
            Inner::Building(b) => Ok(CodePointTrie {
                inner: Inner::Building(b.try_clone()),
                frozen_width: None,
            }),
            Inner::Frozen(_) | Inner::Empty => illegal_argument("cannot clone a frozen trie"),
        }
    }

    /// Sets the value for a single code point. Fails with
    /// `NoWritePermission` once the trie is frozen.
    pub fn set(&mut self, cp: u32, v: u32) -> Result<()> {
        match &mut self.inner {
            Inner::Building(b) => b.set(cp, v),
            Inner::Frozen(_) | Inner::Empty => {
                no_write_permission("trie is frozen; set is unavailable")
            }
        }
    }

    /// Sets the value for every code point in `[start, end]`. Fails with
    /// `NoWritePermission` once the trie is frozen.
    pub fn set_range(&mut self, start: u32, end: u32, v: u32, overwrite: bool) -> Result<()> {
        match &mut self.inner {
            Inner::Building(b) => b.set_range(start, end, v, overwrite),
            Inner::Frozen(_) | Inner::Empty => {
                no_write_permission("trie is frozen; set_range is unavailable")
            }
        }
    }

    /// Looks up the value for `cp`, before or after freezing.
    pub fn get(&self, cp: i64) -> u32 {
        match &self.inner {
            Inner::Building(b) => b.get(cp),
            Inner::Frozen(f) => f.get(cp),
            Inner::Empty => unreachable!("Inner::Empty does not outlive freeze()"),
        }
    }

    /// Returns `(end, value)` for the run starting at `start`, before or
    /// after freezing.
    pub fn get_range(&self, start: i64, filter: Option<&ValueFilter>) -> (i64, u32) {
        match &self.inner {
            Inner::Building(b) => b.get_range(start, filter),
            Inner::Frozen(f) => f.get_range(start, filter),
            Inner::Empty => unreachable!("Inner::Empty does not outlive freeze()"),
        }
    }

    /// Runs the compaction pipeline and flips this trie read-only.
    /// One-shot: calling it again is `Ok` only when `value_bits` matches
    /// the first call, and `IllegalArgument` otherwise.
    pub fn freeze(&mut self, value_bits: ValueWidth) -> Result<()> {
        if let Inner::Frozen(_) = &self.inner {
            return match self.frozen_width {
                Some(w) if w == value_bits => Ok(()),
                _ => illegal_argument("freeze called twice with a different valueBits"),
            };
        }

        let builder = match std::mem::replace(&mut self.inner, Inner::Empty) {
            Inner::Building(b) => b,
            Inner::Frozen(_) | Inner::Empty => unreachable!("checked above"),
        };
        let compacted = compact(builder, value_bits)?;
        self.inner = Inner::Frozen(FrozenTrie::from_compacted(compacted));
        self.frozen_width = Some(value_bits);
        Ok(())
    }

    /// True once `freeze` has completed successfully.
    pub fn is_frozen(&self) -> bool {
        matches!(self.inner, Inner::Frozen(_))
    }

    /// The smallest code point above which every value is `high_value`.
    /// `None` if the trie has not been frozen yet.
    pub fn high_start(&self) -> Option<u32> {
        match &self.inner {
            Inner::Frozen(f) => Some(f.high_start()),
            Inner::Building(_) | Inner::Empty => None,
        }
    }

    /// The uniform value for every code point at or above `high_start`.
    /// `None` if the trie has not been frozen yet.
    pub fn high_value(&self) -> Option<u32> {
        match &self.inner {
            Inner::Frozen(f) => Some(f.high_value()),
            Inner::Building(_) | Inner::Empty => None,
        }
    }

    /// The data offset of the most-common `ALL_SAME` block, or
    /// `NO_DATA_NULL_OFFSET` if compaction found no reusable null block.
    /// `None` if the trie has not been frozen yet.
    pub fn data_null_offset(&self) -> Option<u32> {
        match &self.inner {
            Inner::Frozen(f) => Some(f.data_null_offset()),
            Inner::Building(_) | Inner::Empty => None,
        }
    }

    /// Iterates a frozen trie as `(start, end, value)` runs covering all of
    /// Unicode. `None` if the trie has not been frozen yet.
    pub fn iter(&self) -> Option<RangeIter<'_>> {
        match &self.inner {
            Inner::Frozen(f) => Some(f.iter()),
            Inner::Building(_) | Inner::Empty => None,
        }
    }

    /// As `iter`, but applying `filter` to every yielded value. `None` if
    /// the trie has not been frozen yet.
    pub fn iter_filtered<'a>(&'a self, filter: &'a ValueFilter<'a>) -> Option<RangeIter<'a>> {
        match &self.inner {
            Inner::Frozen(f) => Some(f.iter_filtered(filter)),
            Inner::Building(_) | Inner::Empty => None,
        }
    }

    /// Serializes a frozen trie into its binary layout.
    /// `NoWritePermission` if the trie has not been frozen yet — there is
    /// nothing to serialize.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match &self.inner {
            Inner::Frozen(_) => Ok(serialize::to_bytes(&self.as_compacted())),
            Inner::Building(_) | Inner::Empty => {
                no_write_permission("trie is not frozen; nothing to serialize")
            }
        }
    }

    /// Parses a buffer produced by `to_bytes` back into a frozen trie.
    /// `InvalidFormat` on a malformed buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<CodePointTrie> {
        let compacted = serialize::from_bytes(bytes)?;
        let value_bits = compacted.value_bits;
        Ok(CodePointTrie {
            inner: Inner::Frozen(FrozenTrie::from_compacted(compacted)),
            frozen_width: Some(value_bits),
        })
    }

    /// Releases the trie. A plain consuming method: `Drop` already frees
    /// everything, this just gives the caller an explicit name to call at
    /// the point they're done with it.
    pub fn close(self) {}

    fn as_compacted(&self) -> CompactedTrie {
        match &self.inner {
            Inner::Frozen(f) => f.to_compacted(),
            _ => unreachable!("checked by callers"),
        }
    }
}
