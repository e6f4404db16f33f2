//! Decision tree loading
//!
//! Trees arrive as nested JSON documents, are validated once, and are then
//! immutable for the life of the process. A pre-trained tree for the
//! bundled feature set ships with the crate.

use std::fs;
use std::path::Path;

use super::errors::TreeResult;
use super::node::DecisionNode;

const BUNDLED_TREE: &str = include_str!("../../assets/risk_tree.json");

/// A validated, immutable decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    root: DecisionNode,
}

impl DecisionTree {
    /// Builds a tree from an already-parsed root node, validating it.
    pub fn from_root(root: DecisionNode) -> TreeResult<Self> {
        root.validate()?;
        Ok(Self { root })
    }

    /// Parses and validates a tree from a JSON document.
    pub fn from_json(json: &str) -> TreeResult<Self> {
        let root: DecisionNode = serde_json::from_str(json)?;
        Self::from_root(root)
    }

    /// Reads, parses, and validates a tree asset file.
    pub fn from_file(path: impl AsRef<Path>) -> TreeResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The pre-trained tree bundled with the crate.
    pub fn bundled() -> TreeResult<Self> {
        Self::from_json(BUNDLED_TREE)
    }

    /// Root node
    pub fn root(&self) -> &DecisionNode {
        &self.root
    }

    /// Number of split nodes
    pub fn split_count(&self) -> usize {
        self.root.split_count()
    }

    /// Longest root-to-leaf path, in splits
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}
