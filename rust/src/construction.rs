//! Construction and initialization logic for BTree and nodes.
//!
//! This module contains degree validation, arena initialization, and the
//! default implementations for the tree and its nodes.

use crate::compact_arena::CompactArena;
use crate::error::{BTreeError, InitResult};
use crate::types::{BTree, BranchNode, LeafNode, NodeRef, MIN_DEGREE};
use tracing::debug;

/// Default minimum degree for B-tree nodes
pub const DEFAULT_DEGREE: usize = 3;

impl<K> BTree<K> {
    /// Create a B-tree with the given minimum degree `t`.
    ///
    /// Nodes hold at most `2t-1` keys; every node except the root holds at
    /// least `t-1`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(BTree)` for `t >= 2`, `Err(BTreeError::InvalidConfiguration)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let tree = BTree::<i64>::new(2).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BTree::<i64>::new(1).is_err());
    /// ```
    pub fn new(degree: usize) -> InitResult<Self> {
        validation::validate_degree(degree)?;
        Ok(Self::with_valid_degree(degree))
    }

    /// Create a B-tree with [`DEFAULT_DEGREE`].
    pub fn with_default_degree() -> Self {
        Self::with_valid_degree(DEFAULT_DEGREE)
    }

    fn with_valid_degree(degree: usize) -> Self {
        // The empty tree is a single empty leaf root.
        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(degree));
        debug!(degree, "btree.create");

        Self {
            degree,
            root: NodeRef::leaf(root_id),
            leaf_arena,
            branch_arena: CompactArena::new(),
        }
    }
}

impl<K> LeafNode<K> {
    /// Creates an empty leaf sized for a tree of minimum degree `degree`.
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            keys: Vec::with_capacity(2 * degree - 1),
        }
    }
}

impl<K> BranchNode<K> {
    /// Creates an empty branch sized for a tree of minimum degree `degree`.
    pub fn new(degree: usize) -> Self {
        // Pre-allocate: keys up to 2t-1, children up to 2t
        Self {
            degree,
            keys: Vec::with_capacity(2 * degree - 1),
            children: Vec::with_capacity(2 * degree),
        }
    }
}

impl<K> Default for BTree<K> {
    fn default() -> Self {
        Self::with_default_degree()
    }
}

impl<K> Default for LeafNode<K> {
    fn default() -> Self {
        Self::new(DEFAULT_DEGREE)
    }
}

impl<K> Default for BranchNode<K> {
    fn default() -> Self {
        Self::new(DEFAULT_DEGREE)
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that a minimum degree can build a B-tree.
    pub fn validate_degree(degree: usize) -> InitResult<()> {
        if degree < MIN_DEGREE {
            Err(BTreeError::invalid_degree(degree, MIN_DEGREE))
        } else {
            Ok(())
        }
    }

    /// Suggest a minimum degree for the expected number of keys.
    ///
    /// Small trees stay shallow anyway, so they get small nodes; large
    /// trees trade wider nodes for fewer levels.
    pub fn recommended_degree(expected_keys: usize) -> usize {
        if expected_keys < 100 {
            MIN_DEGREE
        } else if expected_keys < 10_000 {
            DEFAULT_DEGREE * 2
        } else if expected_keys < 1_000_000 {
            16
        } else {
            32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btree_construction() {
        let tree = BTree::<i64>::new(4).unwrap();
        assert_eq!(tree.degree, 4);
        assert!(tree.root.is_leaf());
        assert_eq!(tree.leaf_arena.len(), 1);
        assert!(tree.branch_arena.is_empty());
    }

    #[test]
    fn test_btree_invalid_degree() {
        for degree in [0, 1] {
            let err = BTree::<i64>::new(degree).unwrap_err();
            assert!(err.is_config_error());
        }
    }

    #[test]
    fn test_btree_default() {
        let tree = BTree::<i64>::default();
        assert_eq!(tree.degree, DEFAULT_DEGREE);
    }

    #[test]
    fn test_node_construction() {
        let leaf = LeafNode::<i64>::new(3);
        assert_eq!(leaf.degree, 3);
        assert!(leaf.keys.is_empty());
        assert!(leaf.keys.capacity() >= 5);

        let branch = BranchNode::<i64>::new(3);
        assert!(branch.keys.is_empty());
        assert!(branch.children.capacity() >= 6);
    }

    #[test]
    fn test_validation() {
        assert!(validation::validate_degree(2).is_ok());
        assert!(validation::validate_degree(64).is_ok());
        assert!(validation::validate_degree(1).is_err());
    }

    #[test]
    fn test_recommended_degree() {
        assert_eq!(validation::recommended_degree(50), MIN_DEGREE);
        assert_eq!(validation::recommended_degree(5000), 6);
        assert_eq!(validation::recommended_degree(500_000), 16);
        assert_eq!(validation::recommended_degree(5_000_000), 32);
    }
}
