//! A hybrid predictor pairing a per-address bimodal table with a tagged
//! global-history table.

use itertools::Itertools;

use crate::branch::*;
use crate::history::GlobalHistoryRegister;
use crate::predictor::*;

/// Number of tracked history bits.
const HISTORY_BITS: usize = 15;

/// log2 of the number of counters in the bimodal table.
const BIMODAL_BITS: usize = 12;

/// Number of rows in the tagged global table.
const NUM_ROWS: usize = 512;

/// Number of ways in each row of the tagged global table.
const NUM_WAYS: usize = 4;

/// Number of tag bits held by each way.
const TAG_BITS: usize = 6;

/// Oldest replacement age. A way at this age is an eviction candidate.
const LRU_MAX: u8 = 3;

/// One way in a row of the tagged global table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedWay {
    /// Partial tag identifying the resident branch
    pub tag: usize,

    /// Outcome counter for the resident branch
    pub ctr: SaturatingCounter,

    /// Replacement age, from 0 (just used) up to [`LRU_MAX`]
    pub lru: u8,
}

/// Lookup state for a single [`HybridPredictor`] prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HybridPrediction {
    /// The predicted direction
    pub outcome: Outcome,

    /// The predicted target address
    pub target: usize,

    /// Index into the bimodal table
    pub bimodal_index: usize,

    /// Row selected in the tagged global table
    pub row: usize,

    /// Tag computed for this branch
    pub tag: usize,

    /// The way that hit, or the eviction candidate on a miss
    pub way: usize,

    /// Whether a tag matched in the tagged global table
    pub global_hit: bool,
}
impl PredictionRecord for HybridPrediction {
    fn outcome(&self) -> Outcome { self.outcome }
    fn target(&self) -> usize { self.target }
}

/// A hybrid direction predictor modeled on the Pentium M outcome
/// prediction unit: a direct-mapped bimodal table acts as the default,
/// and a 4-way tagged table addressed by a hash of global history and
/// the program counter overrides it whenever a tag hits.
///
/// Tag matches are only 6 bits wide; collisions alias and are absorbed
/// as prediction noise rather than detected.
pub struct HybridPredictor {
    /// Default per-address counters
    bimodal: Vec<SaturatingCounter>,

    /// Tagged global-history table
    global: Vec<[TaggedWay; NUM_WAYS]>,

    /// Outcomes of recent branches
    ghr: GlobalHistoryRegister,

    /// The branch passed to the most recent call to `predict`
    branch: Option<BranchRecord>,

    /// The most recent prediction
    last: Option<HybridPrediction>,
}

impl HybridPredictor {
    pub fn new() -> Self {
        // Seed each row with the full age spread 3,2,1,0 across the ways,
        // so way 0 is the first eviction candidate and successive fills
        // walk across the row. Unfilled ways read strongly taken.
        let mut row = [TaggedWay {
            tag: 0,
            ctr: SaturatingCounter::new(3),
            lru: 0,
        }; NUM_WAYS];
        for (age, way) in row.iter_mut().enumerate() {
            way.lru = LRU_MAX - age as u8;
        }

        Self {
            bimodal: vec![SaturatingCounter::default(); 1 << BIMODAL_BITS],
            global: vec![row; NUM_ROWS],
            ghr: GlobalHistoryRegister::new(HISTORY_BITS),
            branch: None,
            last: None,
        }
    }

    /// Get the number of storage bits.
    pub fn storage_bits(&self) -> usize {
        let way_bits = TAG_BITS + 2 + 2;
        (1 << BIMODAL_BITS) * 2 + NUM_ROWS * NUM_WAYS * way_bits
            + HISTORY_BITS
    }

    /// Return the contents of the history register.
    pub fn history(&self) -> usize { self.ghr.value() }

    /// Return a reference to a counter in the bimodal table.
    pub fn bimodal_counter(&self, index: usize) -> &SaturatingCounter {
        &self.bimodal[index]
    }

    /// Return a reference to a row in the tagged global table.
    pub fn row(&self, index: usize) -> &[TaggedWay] {
        &self.global[index]
    }

    /// Fold the program counter and global history into a single hash.
    ///
    /// The high 6 bits mix address bits [18:13] with the newest 6 history
    /// outcomes; the low 9 bits mix address bits [12:4] with the older
    /// history outcomes.
    fn fold(&self, pc: usize) -> usize {
        let history = self.ghr.value();
        let hi = ((pc >> 13) & 0x3f) ^ (history & 0x3f);
        let lo = ((pc >> 4) & 0x1ff) ^ ((history >> 6) & 0x1ff);
        (hi << 9) | lo
    }

    /// Split the hash for a branch at `pc` into a row selector and a tag.
    fn row_and_tag(&self, pc: usize) -> (usize, usize) {
        let hash = self.fold(pc);
        (hash >> TAG_BITS, hash & ((1 << TAG_BITS) - 1))
    }
}

impl DirectionPredictor for HybridPredictor {
    type Prediction = HybridPrediction;

    fn name(&self) -> &'static str { "HybridPredictor" }

    fn predict(&mut self, branch: &BranchRecord) -> HybridPrediction {
        let res = if branch.is_conditional() {
            let bimodal_index = branch.pc & ((1 << BIMODAL_BITS) - 1);
            let (row, tag) = self.row_and_tag(branch.pc);
            let ways = &self.global[row];

            let (way, global_hit, outcome) =
                match ways.iter().find_position(|w| w.tag == tag) {
                    // The first way with a matching tag provides the
                    // prediction.
                    Some((way, hit)) => (way, true, hit.ctr.predict()),
                    // No tag matched: fall back to the bimodal table and
                    // remember the *last* way at LRU_MAX as the victim
                    // for the coming allocation. Every row holds at
                    // least one such way (see the seeding in `new`).
                    None => {
                        let way = ways.iter()
                            .positions(|w| w.lru == LRU_MAX)
                            .last()
                            .unwrap_or(0);
                        (way, false, self.bimodal[bimodal_index].predict())
                    },
                };

            HybridPrediction {
                outcome,
                target: 0,
                bimodal_index,
                row,
                tag,
                way,
                global_hit,
            }
        } else {
            HybridPrediction {
                outcome: Outcome::T,
                target: 0,
                bimodal_index: 0,
                row: 0,
                tag: 0,
                way: 0,
                global_hit: false,
            }
        };
        self.branch = Some(*branch);
        self.last = Some(res);
        res
    }

    fn update(&mut self, prediction: &HybridPrediction, outcome: Outcome,
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

        // The bimodal table trains on every conditional branch, even when
        // the tagged table provided the prediction.
        self.bimodal[prediction.bimodal_index].update(outcome);

        let ways = &mut self.global[prediction.row];

        // On a miss, claim the victim way by rewriting its tag. The
        // resident counter carries over to the new branch.
        if !prediction.global_hit {
            ways[prediction.way].tag = prediction.tag;
        }

        // The way used for this access becomes most recently used and
        // every other way in the row ages by one.
        for (i, way) in ways.iter_mut().enumerate() {
            if i == prediction.way {
                way.lru = 0;
            } else if way.lru < LRU_MAX {
                way.lru += 1;
            }
        }

        ways[prediction.way].ctr.update(outcome);
        self.ghr.push(outcome);
    }
}


#[cfg(test)]
mod test {
    use super::*;

    // 0x0510 hashes to row 1 with tag 0x11 under all-zero history, and
    // 0x0520 to the same row with tag 0x12. Not-taken outcomes keep the
    // history register at zero, so rehashing stays on that row.

    #[test]
    fn fresh_predictor_falls_back_to_bimodal() {
        let mut p = HybridPredictor::new();
        let res = p.predict(&BranchRecord::conditional(0x0510));
        assert!(!res.global_hit);
        assert_eq!(res.outcome, Outcome::N);
        assert_eq!(res.bimodal_index, 0x510);
        assert_eq!(res.row, 1);
        assert_eq!(res.tag, 0x11);
        assert_eq!(res.way, 0);
        assert_eq!(res.target, 0);
    }

    #[test]
    fn misses_fill_distinct_ways() {
        let mut p = HybridPredictor::new();
        for pc in [0x0510, 0x0520] {
            let res = p.predict(&BranchRecord::conditional(pc));
            assert!(!res.global_hit);
            p.update(&res, Outcome::N, 0);
        }
        let row = p.row(1);
        assert_eq!(row[0].tag, 0x11);
        assert_eq!(row[1].tag, 0x12);
    }

    #[test]
    fn accessed_way_becomes_most_recent_and_others_age() {
        let mut p = HybridPredictor::new();
        let res = p.predict(&BranchRecord::conditional(0x0510));
        p.update(&res, Outcome::N, 0);
        let ages: Vec<u8> = p.row(1).iter().map(|w| w.lru).collect();
        assert_eq!(ages, vec![0, 3, 2, 1]);
    }

    #[test]
    fn tag_hit_overrides_the_bimodal_table() {
        let mut p = HybridPredictor::new();
        let b = BranchRecord::conditional(0x0510);
        let res = p.predict(&b);
        p.update(&res, Outcome::N, 0);

        // The second access hits the way allocated above, whose counter
        // still reads weakly taken, while the trained bimodal entry
        // disagrees.
        let res = p.predict(&b);
        assert!(res.global_hit);
        assert_eq!(res.way, 0);
        assert_eq!(res.outcome, Outcome::T);
        assert_eq!(p.bimodal_counter(0x510).predict(), Outcome::N);
    }

    #[test]
    fn bimodal_trains_even_on_a_global_hit() {
        let mut p = HybridPredictor::new();
        let b = BranchRecord::conditional(0x0510);
        let res = p.predict(&b);
        p.update(&res, Outcome::N, 0);
        assert_eq!(p.bimodal_counter(0x510).value(), 0);

        let res = p.predict(&b);
        assert!(res.global_hit);
        p.update(&res, Outcome::T, 0);
        assert_eq!(p.bimodal_counter(0x510).value(), 1);
    }

    #[test]
    fn history_advances_once_per_conditional_branch() {
        let mut p = HybridPredictor::new();
        for outcome in [Outcome::T, Outcome::N, Outcome::T] {
            let res = p.predict(&BranchRecord::conditional(0x0800));
            p.update(&res, outcome, 0);
        }
        assert_eq!(p.history(), 0b101);
    }

    #[test]
    fn unconditional_branches_are_inert() {
        let mut p = HybridPredictor::new();
        let res = p.predict(&BranchRecord::unconditional(0x0510));
        assert_eq!(res.outcome, Outcome::T);
        assert_eq!(res.target, 0);
        p.update(&res, Outcome::T, 0x2000);
        assert_eq!(p.history(), 0);
        assert!(p.bimodal.iter().all(|c| c.value() == 0));
        assert!(p.global.iter().flatten().all(|w| w.tag == 0));
    }

    #[test]
    fn replays_are_deterministic() {
        let run = || {
            let mut p = HybridPredictor::new();
            for i in 0..256usize {
                let b = BranchRecord::conditional(0x0400 + (i % 7) * 0x30);
                let res = p.predict(&b);
                p.update(&res, Outcome::from(i % 3 == 0), 0);
            }
            p
        };
        let (a, b) = (run(), run());
        assert_eq!(a.bimodal, b.bimodal);
        assert_eq!(a.global, b.global);
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn storage_accounting() {
        assert_eq!(HybridPredictor::new().storage_bits(), 28687);
    }
}
