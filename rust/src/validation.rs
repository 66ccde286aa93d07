//! Validation and debugging utilities for BTree.
//!
//! This module contains invariant checking, arena consistency checks and
//! helpers used by tests to inspect the tree's shape.

use crate::error::{BTreeError, BTreeResult, BTreeResultExt, TreeResult};
use crate::types::{BTree, NodeRef};

/// Facts gathered while walking the tree once.
struct Walk {
    leaf_depth: Option<usize>,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord + Copy> BTree<K> {
    /// Check if the tree maintains B-tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let mut walk = Walk { leaf_depth: None };
        self.check_node_invariants(self.root, None, None, 0, &mut walk)
            .map_err(|e| e.to_string())?;

        self.check_traversal_invariants()?;

        self.check_arena_tree_consistency()
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Recursively check a node against its capacity, ordering and the
    /// inclusive bounds inherited from its ancestors' separators.
    fn check_node_invariants(
        &self,
        node: NodeRef<K>,
        lower: Option<K>,
        upper: Option<K>,
        depth: usize,
        walk: &mut Walk,
    ) -> TreeResult<()> {
        let is_root = depth == 0;
        let id = node.id();
        let (keys, degree) = match node {
            NodeRef::Leaf(id, _) => {
                let leaf = self.leaf_arena.get(id).ok_or_else(|| {
                    BTreeError::arena_error("Leaf lookup", &format!("leaf {} not allocated", id))
                })?;
                (&leaf.keys, leaf.degree)
            }
            NodeRef::Branch(id, _) => {
                let branch = self.branch_arena.get(id).ok_or_else(|| {
                    BTreeError::arena_error("Branch lookup", &format!("branch {} not allocated", id))
                })?;
                (&branch.keys, branch.degree)
            }
        };
        let context = format!("node {} at depth {}", id, depth);

        if degree != self.degree {
            return Err(BTreeError::data_integrity(
                &context,
                &format!("degree {} differs from tree degree {}", degree, self.degree),
            ));
        }
        if keys.len() > self.max_keys() {
            return Err(BTreeError::data_integrity(
                &context,
                &format!("{} keys exceeds maximum {}", keys.len(), self.max_keys()),
            ));
        }
        if !is_root && keys.len() < self.min_keys() {
            return Err(BTreeError::data_integrity(
                &context,
                &format!("{} keys below minimum {}", keys.len(), self.min_keys()),
            ));
        }
        if let Some(index) = keys.windows(2).position(|pair| pair[0] > pair[1]) {
            return Err(BTreeError::data_integrity(
                &context,
                &format!("keys out of order at index {}", index + 1),
            ));
        }
        let below_lower = lower.is_some_and(|min| keys.first().is_some_and(|k| *k < min));
        let above_upper = upper.is_some_and(|max| keys.last().is_some_and(|k| *k > max));
        if below_lower || above_upper {
            return Err(BTreeError::data_integrity(
                &context,
                "keys escape the parent's separator bounds",
            ));
        }

        match node {
            NodeRef::Leaf(_, _) => match walk.leaf_depth {
                None => {
                    walk.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected == depth => Ok(()),
                Some(expected) => Err(BTreeError::corrupted_tree(
                    "Leaf depth",
                    &format!("leaf {} at depth {}, expected {}", id, depth, expected),
                )),
            },
            NodeRef::Branch(id, _) => {
                let branch = &self.branch_arena[id];
                if branch.keys.is_empty() {
                    return Err(BTreeError::data_integrity(&context, "branch without keys"));
                }
                if branch.children.len() != branch.keys.len() + 1 {
                    return Err(BTreeError::data_integrity(
                        &context,
                        &format!(
                            "{} children for {} keys",
                            branch.children.len(),
                            branch.keys.len()
                        ),
                    ));
                }

                for (i, &child) in branch.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(branch.keys[i - 1]) };
                    let child_upper = if i == branch.keys.len() {
                        upper
                    } else {
                        Some(branch.keys[i])
                    };
                    self.check_node_invariants(child, child_lower, child_upper, depth + 1, walk)?;
                }
                Ok(())
            }
        }
    }

    /// Check that traversal yields `len()` keys in non-decreasing order.
    fn check_traversal_invariants(&self) -> Result<(), String> {
        let keys: Vec<K> = self.traverse().collect();

        if let Some(index) = keys.windows(2).position(|pair| pair[0] > pair[1]) {
            return Err(format!("Traversal returned unsorted keys at index {}", index + 1));
        }
        if keys.len() != self.len() {
            return Err(format!(
                "Traversal returned {} keys but tree has {} keys",
                keys.len(),
                self.len()
            ));
        }
        Ok(())
    }

    /// Check that arena allocation matches tree structure
    fn check_arena_tree_consistency(&self) -> TreeResult<()> {
        let (tree_leaf_count, tree_branch_count) = self.count_nodes_in_tree();
        let leaf_stats = self.leaf_arena_stats();
        let branch_stats = self.branch_arena_stats();

        if tree_leaf_count != leaf_stats.allocated_count {
            return Err(BTreeError::arena_error(
                "Leaf consistency check",
                &format!(
                    "{} in tree vs {} in arena",
                    tree_leaf_count, leaf_stats.allocated_count
                ),
            ));
        }

        if tree_branch_count != branch_stats.allocated_count {
            return Err(BTreeError::arena_error(
                "Branch consistency check",
                &format!(
                    "{} in tree vs {} in arena",
                    tree_branch_count, branch_stats.allocated_count
                ),
            ));
        }

        Ok(())
    }

    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Alias for check_invariants_detailed (for test compatibility).
    pub fn validate(&self) -> Result<(), String> {
        self.check_invariants_detailed()
    }

    /// Returns the key count of every leaf, left to right.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        self.collect_leaf_sizes(self.root, &mut sizes);
        sizes
    }

    fn collect_leaf_sizes(&self, node: NodeRef<K>, sizes: &mut Vec<usize>) {
        match node {
            NodeRef::Leaf(id, _) => sizes.push(self.leaf_arena[id].len()),
            NodeRef::Branch(id, _) => {
                for &child in &self.branch_arena[id].children {
                    self.collect_leaf_sizes(child, sizes);
                }
            }
        }
    }

    /// Check if tree is in a valid state for operations
    pub fn validate_for_operation(&self, operation: &str) -> BTreeResult<()> {
        self.check_invariants_detailed()
            .map_err(BTreeError::DataIntegrityError)
            .with_operation(operation)
    }
}
