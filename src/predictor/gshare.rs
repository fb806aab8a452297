//! A global-history predictor indexed by folding history into the
//! program counter.

use crate::branch::*;
use crate::history::GlobalHistoryRegister;
use crate::predictor::*;

/// Configuration for a [`GsharePredictor`].
#[derive(Clone, Copy, Debug)]
pub struct GshareConfig {
    /// Number of tracked history bits
    pub history_bits: usize,

    /// log2 of the number of counters in the table
    pub table_bits: usize,
}
impl GshareConfig {
    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        (1 << self.table_bits) * 2 + self.history_bits
    }

    /// Use this configuration to create a new [`GsharePredictor`].
    pub fn build(self) -> GsharePredictor {
        assert!(self.table_bits >= self.history_bits);
        assert!(self.table_bits < usize::BITS as usize);
        GsharePredictor {
            table: vec![SaturatingCounter::default(); 1 << self.table_bits],
            ghr: GlobalHistoryRegister::new(self.history_bits),
            branch: None,
            last: None,
            cfg: self,
        }
    }
}
impl Default for GshareConfig {
    fn default() -> Self {
        Self {
            history_bits: 15,
            table_bits: 15,
        }
    }
}

/// Lookup state for a single [`GsharePredictor`] prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GsharePrediction {
    /// The predicted direction
    pub outcome: Outcome,

    /// The predicted target address
    pub target: usize,

    /// Index of the counter that produced the prediction
    pub index: usize,
}
impl PredictionRecord for GsharePrediction {
    fn outcome(&self) -> Outcome { self.outcome }
    fn target(&self) -> usize { self.target }
}

/// A single flat table of saturating counters shared by all branches.
///
/// The history bits are shifted into the high end of the index before
/// being XORed with the low program-counter bits, so the table mixes
/// per-address behavior with cross-branch correlation.
pub struct GsharePredictor {
    cfg: GshareConfig,

    /// Table of counters
    table: Vec<SaturatingCounter>,

    /// Outcomes of recent branches
    ghr: GlobalHistoryRegister,

    /// The branch passed to the most recent call to `predict`
    branch: Option<BranchRecord>,

    /// The most recent prediction
    last: Option<GsharePrediction>,
}
impl GsharePredictor {
    pub fn cfg(&self) -> &GshareConfig { &self.cfg }

    /// Return the contents of the history register.
    pub fn history(&self) -> usize { self.ghr.value() }

    /// Return a reference to a counter in the table.
    pub fn counter(&self, index: usize) -> &SaturatingCounter {
        &self.table[index]
    }

    /// Return the table index for a branch at `pc` under the current
    /// history.
    pub fn get_index(&self, pc: usize) -> usize {
        let shift = self.cfg.table_bits - self.cfg.history_bits;
        let pc_mask = (1 << self.cfg.table_bits) - 1;
        let index = (self.ghr.value() << shift) ^ (pc & pc_mask);
        debug_assert!(index < self.table.len());
        index
    }
}

impl DirectionPredictor for GsharePredictor {
    type Prediction = GsharePrediction;

    fn name(&self) -> &'static str { "GsharePredictor" }

    fn predict(&mut self, branch: &BranchRecord) -> GsharePrediction {
        let res = if branch.is_conditional() {
            let index = self.get_index(branch.pc);
            GsharePrediction {
                outcome: self.table[index].predict(),
                target: 0,
                index,
            }
        } else {
            // Unconditional branches bypass the table entirely.
            GsharePrediction {
                outcome: Outcome::T,
                target: 0,
                index: 0,
            }
        };
        self.branch = Some(*branch);
        self.last = Some(res);
        res
    }

    fn update(&mut self, prediction: &GsharePrediction, outcome: Outcome,
        _target: usize)
    {
        debug_assert_eq!(self.last, Some(*prediction),
            "update does not match the in-flight prediction");
        let branch = match self.branch {
            Some(b) => b,
            None => return,
        };
        if branch.is_unconditional() {
            return;
        }

        self.table[prediction.index].update(outcome);
        self.ghr.push(outcome);
    }
}
