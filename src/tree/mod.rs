//! Decision tree subsystem for auradb
//!
//! Loads a pre-trained binary decision tree from a JSON asset, validates
//! it once, and evaluates it deterministically over feature records. The
//! tree is immutable configuration; there is no training here.

mod errors;
mod evaluator;
mod loader;
mod node;

pub use errors::{TreeError, TreeResult};
pub use evaluator::{Evaluation, FeatureSource};
pub use loader::DecisionTree;
pub use node::{DecisionNode, Direction, FeatureObservation};
