
pub mod branch;
pub mod history;
pub mod predictor;

pub use branch::*;
pub use history::*;
pub use predictor::*;
