//! Per-index-block metadata: one entry per `DATA_BLOCK_LENGTH` code points,
//! `UNICODE_I_LIMIT` entries total while the builder is mutable.
//!
//! Each block is in exactly one of four states (`BlockState`), plus an
//! orthogonal "used by a supplementary block" bit set during compaction.
//! Both are packed into a single `BlockFlag` byte so that `flags`/`index`
//! stay two flat `Vec`s rather than a `Vec` of enum-tagged structs.

/// The four mutually exclusive states a block can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockState {
    /// `index[i]` is the single uniform value for this block.
    AllSame,
    /// `index[i]` is an offset into the (pre-freeze) data array where this
    /// block's `DATA_BLOCK_LENGTH` values live.
    Mixed,
    /// `index[i]` is the index of an earlier block with byte-identical
    /// contents.
    SameAs,
    /// `index[i]` is the block's final offset into the compacted data
    /// array.
    Moved,
}

const STATE_MASK: u8 = 0b011;
const SUPP_DATA_BIT: u8 = 0b100;

/// Packed flag byte: low 2 bits are the `BlockState`, bit 2 is `SUPP_DATA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockFlag(u8);

impl BlockFlag {
    pub fn new(state: BlockState) -> BlockFlag {
        BlockFlag(state_code(state))
    }

    pub fn state(self) -> BlockState {
        match self.0 & STATE_MASK {
            0 => BlockState::AllSame,
            1 => BlockState::Mixed,
            2 => BlockState::SameAs,
            3 => BlockState::Moved,
            _ => unreachable!(),
        }
    }

    pub fn set_state(&mut self, state: BlockState) {
        self.0 = (self.0 & !STATE_MASK) | state_code(state);
    }

    pub fn supp_data(self) -> bool {
        self.0 & SUPP_DATA_BIT != 0
    }

    pub fn set_supp_data(&mut self, v: bool) {
        if v {
            self.0 |= SUPP_DATA_BIT;
        } else {
            self.0 &= !SUPP_DATA_BIT;
        }
    }
}

fn state_code(state: BlockState) -> u8 {
    match state {
        BlockState::AllSame => 0,
        BlockState::Mixed => 1,
        BlockState::SameAs => 2,
        BlockState::Moved => 3,
    }
}

impl Default for BlockFlag {
    fn default() -> BlockFlag {
        BlockFlag::new(BlockState::AllSame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip() {
        for state in [
            BlockState::AllSame,
            BlockState::Mixed,
            BlockState::SameAs,
            BlockState::Moved,
        ] {
            let mut f = BlockFlag::new(state);
            assert_eq!(f.state(), state);
            assert!(!f.supp_data());
            f.set_supp_data(true);
            assert_eq!(f.state(), state);
            assert!(f.supp_data());
            f.set_supp_data(false);
            assert!(!f.supp_data());
        }
    }
}
