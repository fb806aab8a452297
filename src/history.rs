
use bitvec::prelude::*;
use crate::branch::Outcome;

/// A fixed-width shift register tracking the outcomes of recent branches.
///
/// Bit 0 always holds the newest outcome. Shifting in an outcome discards
/// the oldest bit, so the integer image of the register never reaches
/// `2^len`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalHistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* all of the bits and presents them in a format
// where the leftmost bit is the oldest outcome (index len-1) and the
// rightmost bit is the newest (index 0).
impl std::fmt::Display for GlobalHistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl GlobalHistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        assert!(len != 0 && len <= usize::BITS as usize);
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }

    /// Shift in the newest branch outcome, discarding the oldest one.
    pub fn push(&mut self, outcome: Outcome) {
        self.data.shift_right(1);
        self.data.set(0, outcome.into());
    }

    /// Return the contents of the register as an integer.
    pub fn value(&self) -> usize {
        self.data.load::<usize>()
    }
}
