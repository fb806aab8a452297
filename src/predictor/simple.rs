//! Trivial baseline predictors with no learned state.

use crate::Outcome;
use crate::predictor::SimplePredictor;

/// Predict a fixed outcome for every branch.
pub struct StaticPredictor(pub Outcome);
impl SimplePredictor for StaticPredictor {
    fn name(&self) -> &'static str {
        match self.0 {
            Outcome::T => "AlwaysTakenPredictor",
            Outcome::N => "AlwaysNotTakenPredictor",
        }
    }
    fn predict(&self) -> Outcome { self.0 }
}

/// Predict a random outcome for every branch.
pub struct RandomPredictor;
impl SimplePredictor for RandomPredictor {
    fn name(&self) -> &'static str { "RandomPredictor" }
    fn predict(&self) -> Outcome { rand::random::<bool>().into() }
}
