//! Tree structure management operations for BTree.
//!
//! Size queries, height, node counting and clearing.

use crate::types::{BTree, LeafNode, NodeRef};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K: Ord + Copy> BTree<K> {
    /// Minimum degree `t` the tree was built with.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Maximum number of keys per node, `2t-1`.
    pub fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    /// Minimum number of keys per non-root node, `t-1`.
    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }

    /// Returns the number of stored keys, counting duplicates.
    pub fn len(&self) -> usize {
        self.len_recursive(self.root)
    }

    fn len_recursive(&self, node: NodeRef<K>) -> usize {
        match node {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].len(),
            NodeRef::Branch(id, _) => {
                let branch = &self.branch_arena[id];
                branch.keys.len()
                    + branch
                        .children
                        .iter()
                        .map(|&child| self.len_recursive(child))
                        .sum::<usize>()
            }
        }
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        // An internal root always carries at least one key.
        match self.root {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].is_empty(),
            NodeRef::Branch(_, _) => false,
        }
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of edges from the root to any leaf.
    ///
    /// Follows the leftmost path; every leaf sits at the same depth.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;

        while let NodeRef::Branch(id, _) = current {
            height += 1;
            current = self.branch_arena[id].children[0];
        }
        height
    }

    /// Total number of nodes reachable from the root.
    ///
    /// An empty tree still has its empty leaf root, so this is at least 1.
    pub fn count_nodes(&self) -> usize {
        let (leaves, branches) = self.count_nodes_in_tree();
        leaves + branches
    }

    /// Count the leaf and branch nodes actually in the tree structure.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    fn count_nodes_recursive(&self, node: NodeRef<K>) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_, _) => (1, 0),
            NodeRef::Branch(id, _) => {
                let mut total_leaves = 0;
                let mut total_branches = 1;

                for &child in &self.branch_arena[id].children {
                    let (child_leaves, child_branches) = self.count_nodes_recursive(child);
                    total_leaves += child_leaves;
                    total_branches += child_branches;
                }
                (total_leaves, total_branches)
            }
        }
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Remove every key, leaving a single empty leaf root.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();

        let root_id = self.allocate_leaf(LeafNode::new(self.degree));
        self.root = NodeRef::leaf(root_id);
    }
}

impl<K: Ord + Copy> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
