//! Decision tree evaluation
//!
//! Deterministic traversal from root to leaf. Each `Split` reads one
//! feature from the record, appends a `FeatureObservation` to the path,
//! and descends left when `value <= threshold`, right otherwise. The leaf
//! yields `pos / (pos + neg)` as the risk score.
//!
//! A record that cannot supply a required feature fails with
//! `MissingFeature` instead of silently taking a branch.

use serde::Serialize;
use serde_json::Value;

use super::errors::{TreeError, TreeResult};
use super::loader::DecisionTree;
use super::node::{DecisionNode, Direction, FeatureObservation};

/// Anything that can supply named numeric features to the evaluator.
pub trait FeatureSource {
    /// The value of the named feature, if this record carries it
    fn feature(&self, name: &str) -> Option<f64>;
}

impl FeatureSource for serde_json::Map<String, Value> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }
}

impl FeatureSource for Value {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Risk probability in [0, 1]
    pub score: f64,
    /// Every split visited, in traversal order
    pub path: Vec<FeatureObservation>,
}

impl DecisionTree {
    /// Evaluates the tree over one record.
    pub fn evaluate<S: FeatureSource + ?Sized>(&self, record: &S) -> TreeResult<Evaluation> {
        evaluate_node(self.root(), record)
    }
}

/// Iterative traversal; tree depth never touches the call stack.
pub(super) fn evaluate_node<S: FeatureSource + ?Sized>(
    root: &DecisionNode,
    record: &S,
) -> TreeResult<Evaluation> {
    let mut node = root;
    let mut path = Vec::new();

    loop {
        match node {
            DecisionNode::Leaf {
                class_distribution: (neg, pos),
            } => {
                let total = neg + pos;
                if total == 0.0 {
                    return Err(TreeError::DegenerateLeaf);
                }
                return Ok(Evaluation {
                    score: pos / total,
                    path,
                });
            }
            DecisionNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = record
                    .feature(feature)
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| TreeError::MissingFeature(feature.clone()))?;

                let direction = if value <= *threshold {
                    Direction::Left
                } else {
                    Direction::Right
                };
                path.push(FeatureObservation {
                    label: feature.clone(),
                    value,
                    threshold: *threshold,
                    direction,
                });
                node = match direction {
                    Direction::Left => left,
                    Direction::Right => right,
                };
            }
        }
    }
}
