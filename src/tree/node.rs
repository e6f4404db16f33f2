//! Decision tree node types
//!
//! The tree is a binary tree of `Split` nodes terminating in `Leaf` nodes.
//! It is loaded once from a JSON asset and never mutated, so evaluations
//! share it freely across tasks without locking.
//!
//! Wire shape (nested JSON):
//!
//! ```text
//! split: { "featureName": "...", "threshold": 7.2, "left": {...}, "right": {...} }
//! leaf:  { "classDistribution": [neg, pos] }
//! ```

use serde::{Deserialize, Serialize};

use super::errors::{TreeError, TreeResult};

/// One node of the decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecisionNode {
    /// Internal decision: `value <= threshold` goes left, else right
    Split {
        /// Feature the split reads from the record
        #[serde(rename = "featureName")]
        feature: String,
        /// Split threshold
        threshold: f64,
        /// Taken when `value <= threshold`
        left: Box<DecisionNode>,
        /// Taken when `value > threshold`
        right: Box<DecisionNode>,
    },
    /// Terminal node carrying the training class counts (negative, positive)
    Leaf {
        #[serde(rename = "classDistribution")]
        class_distribution: (f64, f64),
    },
}

impl DecisionNode {
    /// Number of `Split` nodes in the subtree
    pub fn split_count(&self) -> usize {
        match self {
            DecisionNode::Leaf { .. } => 0,
            DecisionNode::Split { left, right, .. } => {
                1 + left.split_count() + right.split_count()
            }
        }
    }

    /// Longest root-to-leaf path length, counted in splits
    pub fn depth(&self) -> usize {
        match self {
            DecisionNode::Leaf { .. } => 0,
            DecisionNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Structural validation: finite thresholds, non-empty feature names,
    /// finite non-negative class counts, and no (0, 0) leaves.
    pub fn validate(&self) -> TreeResult<()> {
        match self {
            DecisionNode::Leaf {
                class_distribution: (neg, pos),
            } => {
                if !neg.is_finite() || !pos.is_finite() || *neg < 0.0 || *pos < 0.0 {
                    return Err(TreeError::Invalid(format!(
                        "leaf class distribution ({}, {}) is not a pair of non-negative finite counts",
                        neg, pos
                    )));
                }
                if *neg == 0.0 && *pos == 0.0 {
                    return Err(TreeError::Invalid(
                        "leaf with (0, 0) class distribution".into(),
                    ));
                }
                Ok(())
            }
            DecisionNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature.is_empty() {
                    return Err(TreeError::Invalid("split with empty feature name".into()));
                }
                if !threshold.is_finite() {
                    return Err(TreeError::Invalid(format!(
                        "split on '{}' has non-finite threshold",
                        feature
                    )));
                }
                left.validate()?;
                right.validate()
            }
        }
    }
}

/// Which branch an observed value selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `value <= threshold`
    Left,
    /// `value > threshold`
    Right,
}

/// One split visited during an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureObservation {
    /// Feature name
    pub label: String,
    /// Value read from the record
    pub value: f64,
    /// Threshold at the split
    pub threshold: f64,
    /// Branch taken
    pub direction: Direction,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(neg: f64, pos: f64) -> DecisionNode {
        DecisionNode::Leaf {
            class_distribution: (neg, pos),
        }
    }

    fn split(feature: &str, threshold: f64, l: DecisionNode, r: DecisionNode) -> DecisionNode {
        DecisionNode::Split {
            feature: feature.into(),
            threshold,
            left: Box::new(l),
            right: Box::new(r),
        }
    }

    #[test]
    fn test_parse_split_and_leaf() {
        let json = r#"{
            "featureName": "sleep_hours",
            "threshold": 7.0,
            "left": { "classDistribution": [3, 1] },
            "right": { "classDistribution": [1, 3] }
        }"#;
        let node: DecisionNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.split_count(), 1);
        assert_eq!(node.depth(), 1);
        match node {
            DecisionNode::Split { feature, .. } => assert_eq!(feature, "sleep_hours"),
            DecisionNode::Leaf { .. } => panic!("expected split"),
        }
    }

    #[test]
    fn test_counts() {
        let tree = split(
            "a",
            1.0,
            split("b", 2.0, leaf(1.0, 1.0), leaf(2.0, 2.0)),
            leaf(3.0, 3.0),
        );
        assert_eq!(tree.split_count(), 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_validate_rejects_degenerate_leaf() {
        let tree = split("a", 1.0, leaf(0.0, 0.0), leaf(1.0, 1.0));
        assert!(matches!(tree.validate(), Err(TreeError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let tree = split("a", f64::NAN, leaf(1.0, 0.0), leaf(0.0, 1.0));
        assert!(matches!(tree.validate(), Err(TreeError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_negative_counts() {
        assert!(leaf(-1.0, 2.0).validate().is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        let tree = split("a", 1.0, leaf(1.0, 0.0), leaf(0.0, 1.0));
        assert!(tree.validate().is_ok());
    }
}
