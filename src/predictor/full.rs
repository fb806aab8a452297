//! Extension point for a predictor covering both direction and target.

use crate::branch::*;
use crate::predictor::*;

/// Lookup state for a single [`FullPredictor`] prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullPrediction {
    /// The predicted direction
    pub outcome: Outcome,

    /// The predicted target address
    pub target: usize,
}
impl PredictionRecord for FullPrediction {
    fn outcome(&self) -> Outcome { self.outcome }
    fn target(&self) -> usize { self.target }
}

/// Placeholder for a predictor that resolves the target address as well
/// as the direction of each branch.
///
/// Always predicts taken with a target of zero, and learns nothing.
///
/// TODO: Real target prediction needs a branch target buffer for
/// indirect jumps and a return-address stack for returns.
pub struct FullPredictor {
    /// The most recent prediction
    last: Option<FullPrediction>,
}
impl FullPredictor {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl DirectionPredictor for FullPredictor {
    type Prediction = FullPrediction;

    fn name(&self) -> &'static str { "FullPredictor" }

    fn predict(&mut self, _branch: &BranchRecord) -> FullPrediction {
        let res = FullPrediction {
            outcome: Outcome::T,
            target: 0,
        };
        self.last = Some(res);
        res
    }

    fn update(&mut self, prediction: &FullPrediction, _outcome: Outcome,
        _target: usize)
    {
        debug_assert_eq!(self.last, Some(*prediction),
            "update does not match the in-flight prediction");
    }
}
