//! Implementations of different branch predictors.

pub mod counter;
pub mod simple;
pub mod gshare;
pub mod hybrid;
pub mod full;

pub use counter::*;
pub use simple::*;
pub use gshare::*;
pub use hybrid::*;
pub use full::*;

use crate::branch::*;

/// Interface to a "trivial" predictor that guesses an outcome without
/// accepting feedback from the rest of the machine.
pub trait SimplePredictor {
    fn name(&self) -> &'static str;
    fn predict(&self) -> Outcome;
}

/// Interface to a predictor with some internal state which is only subject
/// to change by the correct branch outcome.
pub trait StatefulPredictor {
    fn name(&self) -> &'static str;

    /// Reset the internal state of the predictor.
    fn reset(&mut self);

    /// Return the current predicted outcome.
    fn predict(&self) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, outcome: Outcome);
}

/// Uniform view of the lookup state a predictor produces for one branch.
pub trait PredictionRecord: Copy + PartialEq + std::fmt::Debug {
    /// The predicted direction.
    fn outcome(&self) -> Outcome;

    /// The predicted target address.
    fn target(&self) -> usize;
}

/// Interface to a predictor driven in lock-step by an external trace
/// harness.
///
/// The harness calls `predict` once per branch in program order, and calls
/// `update` with the resolved outcome before the next call to `predict`.
/// Each instance tracks a single in-flight prediction; interleaving
/// predictions on one instance is a caller error, caught in debug builds.
pub trait DirectionPredictor {
    /// Per-branch lookup state carried from `predict` to `update`.
    type Prediction: PredictionRecord;

    fn name(&self) -> &'static str;

    /// Predict the direction of the given branch.
    fn predict(&mut self, branch: &BranchRecord) -> Self::Prediction;

    /// Resolve the most recent prediction with the observed outcome.
    fn update(&mut self, prediction: &Self::Prediction, outcome: Outcome,
        target: usize);
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn predictors_learn_an_always_taken_branch() {
        let branch = BranchRecord::conditional(0x4000);
        let mut g = GshareConfig::default().build();
        let mut h = HybridPredictor::new();
        for _ in 0..32 {
            let p = g.predict(&branch);
            g.update(&p, Outcome::T, 0);
            let p = h.predict(&branch);
            h.update(&p, Outcome::T, 0);
        }
        assert_eq!(g.predict(&branch).outcome(), Outcome::T);
        assert_eq!(h.predict(&branch).outcome(), Outcome::T);
    }
}
