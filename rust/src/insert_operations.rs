//! INSERT operations for BTree.
//!
//! Insertion splits full nodes on the way down, so the node receiving the
//! key always has room. The root is the only node whose split adds a level.

use crate::types::{BTree, BranchNode, NodeId, NodeRef};
use tracing::{debug, trace};

impl<K: Ord + Copy> BTree<K> {
    /// Insert a key into the tree.
    ///
    /// Equal keys are not rejected: each insertion stores another occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// for key in 1..=10 {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.len(), 10);
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn insert(&mut self, key: K) {
        if self.is_node_full(self.root) {
            self.grow_root();
        }
        self.insert_non_full(self.root, key);
    }

    /// Hang the full root under a new empty root and split it.
    fn grow_root(&mut self) {
        let mut new_root = BranchNode::new(self.degree);
        new_root.children.push(self.root);
        let new_root_id = self.allocate_branch(new_root);

        self.split_child(new_root_id, 0);
        self.root = NodeRef::branch(new_root_id);
        debug!(degree = self.degree, height = self.height(), "btree.root.grow");
    }

    /// Descend from `node`, which must not be full, splitting any full child
    /// before entering it.
    fn insert_non_full(&mut self, node: NodeRef<K>, key: K) {
        let mut current = node;

        loop {
            match current {
                NodeRef::Leaf(id, _) => {
                    self.leaf_arena[id].insert(key);
                    return;
                }
                NodeRef::Branch(id, _) => {
                    let mut index = self.branch_arena[id].insert_child_index(&key);
                    let child = self.branch_arena[id].children[index];

                    if self.is_node_full(child) {
                        self.split_child(id, index);
                        // The promoted median now sits at `index`; equal keys go right
                        if self.branch_arena[id].keys[index] <= key {
                            index += 1;
                        }
                    }
                    current = self.branch_arena[id].children[index];
                }
            }
        }
    }

    /// Split the full child at `index` of `parent_id`, promoting its median
    /// into the parent and linking the new right sibling at `index + 1`.
    pub(crate) fn split_child(&mut self, parent_id: NodeId, index: usize) {
        let child = self.branch_arena[parent_id].children[index];

        let (median, sibling) = match child {
            NodeRef::Leaf(id, _) => {
                let (median, right) = self.leaf_arena[id].split();
                (median, NodeRef::leaf(self.allocate_leaf(right)))
            }
            NodeRef::Branch(id, _) => {
                let (median, right) = self.branch_arena[id].split();
                (median, NodeRef::branch(self.allocate_branch(right)))
            }
        };

        self.branch_arena[parent_id].insert_separator(index, median, sibling);
        trace!(
            parent = parent_id,
            index,
            left = child.id(),
            right = sibling.id(),
            "btree.split"
        );
    }

    pub(crate) fn is_node_full(&self, node: NodeRef<K>) -> bool {
        match node {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].is_full(),
            NodeRef::Branch(id, _) => self.branch_arena[id].is_full(),
        }
    }
}
