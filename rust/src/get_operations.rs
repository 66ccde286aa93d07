//! GET operations for BTree.
//!
//! This module contains the read operations for the B-tree: point search,
//! locating the node that holds a key, extreme keys and occurrence counts,
//! plus the arena accessors the other modules share.

use crate::error::{BTreeError, KeyResult};
use crate::types::{BTree, BranchNode, LeafNode, NodeId, NodeRef};

impl<K: Ord + Copy> BTree<K> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Check whether `key` is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.insert(1);
    /// assert!(tree.search(&1));
    /// assert!(!tree.search(&2));
    /// ```
    pub fn search(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Find the node holding `key`.
    ///
    /// Scans each node for the first key `>=` the target, stops on an exact
    /// match and otherwise descends into the child at that position.
    pub fn find_node(&self, key: &K) -> Option<NodeRef<K>> {
        let mut current = self.root;

        loop {
            match current {
                NodeRef::Leaf(id, _) => {
                    let leaf = &self.leaf_arena[id];
                    let index = leaf.lower_bound(key);
                    return (leaf.keys.get(index) == Some(key)).then_some(current);
                }
                NodeRef::Branch(id, _) => {
                    let branch = &self.branch_arena[id];
                    let index = branch.lower_bound(key);
                    if branch.matches_at(index, key) {
                        return Some(current);
                    }
                    current = branch.children[index];
                }
            }
        }
    }

    /// Find the node holding `key`, returning `KeyNotFound` when absent.
    pub fn try_search(&self, key: &K) -> KeyResult<NodeRef<K>> {
        self.find_node(key).ok_or(BTreeError::KeyNotFound)
    }

    /// Number of stored occurrences of `key`.
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.extend([4, 4, 4, 9]);
    /// assert_eq!(tree.count(&4), 3);
    /// assert_eq!(tree.count(&5), 0);
    /// ```
    pub fn count(&self, key: &K) -> usize {
        self.range(*key..=*key).count()
    }

    /// Smallest key in the tree.
    pub fn min_key(&self) -> Option<K> {
        if self.is_empty() {
            return None;
        }
        Some(self.subtree_min(self.root))
    }

    /// Largest key in the tree.
    pub fn max_key(&self) -> Option<K> {
        if self.is_empty() {
            return None;
        }
        Some(self.subtree_max(self.root))
    }

    // ============================================================================
    // ARENA ACCESS
    // ============================================================================

    /// Get a reference to a leaf node from the arena.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K>> {
        self.leaf_arena.get(id)
    }

    /// Get a reference to a branch node from the arena.
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K>> {
        self.branch_arena.get(id)
    }

    /// Keys stored directly in `node`.
    pub fn node_keys(&self, node: NodeRef<K>) -> &[K] {
        match node {
            NodeRef::Leaf(id, _) => &self.leaf_arena[id].keys,
            NodeRef::Branch(id, _) => &self.branch_arena[id].keys,
        }
    }

    // ============================================================================
    // HELPERS
    // ============================================================================

    /// Number of keys stored directly in `node`.
    pub(crate) fn key_count(&self, node: NodeRef<K>) -> usize {
        self.node_keys(node).len()
    }

    /// Largest key below `node`. The subtree must be non-empty.
    pub(crate) fn subtree_max(&self, node: NodeRef<K>) -> K {
        let mut current = node;
        loop {
            match current {
                NodeRef::Leaf(id, _) => {
                    let keys = &self.leaf_arena[id].keys;
                    return keys[keys.len() - 1];
                }
                NodeRef::Branch(id, _) => {
                    let branch = &self.branch_arena[id];
                    current = branch.children[branch.keys.len()];
                }
            }
        }
    }

    /// Smallest key below `node`. The subtree must be non-empty.
    pub(crate) fn subtree_min(&self, node: NodeRef<K>) -> K {
        let mut current = node;
        loop {
            match current {
                NodeRef::Leaf(id, _) => return self.leaf_arena[id].keys[0],
                NodeRef::Branch(id, _) => current = self.branch_arena[id].children[0],
            }
        }
    }
}
