//! Node implementations for BTree.
//!
//! Per-node primitives only: bounds search, sorted insertion, splitting,
//! merging in a sibling and the single-key moves used by rotations. Anything
//! that touches more than one node lives on the tree.

use crate::types::{BranchNode, LeafNode, NodeRef};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Copy> LeafNode<K> {
    /// Sorted keys stored in this leaf.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Returns the number of keys in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if this leaf holds `2t-1` keys.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= 2 * self.degree - 1
    }

    /// Index of the first key `>= key`.
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Insert `key` after any equal keys already present.
    pub(crate) fn insert(&mut self, key: K) {
        debug_assert!(!self.is_full(), "insert into a full leaf");
        let index = self.keys.partition_point(|k| k <= &key);
        self.keys.insert(index, key);
    }

    /// Remove and return the key at `index`.
    pub(crate) fn remove_at(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    /// Split a full leaf: keeps the lower `t-1` keys, returns the median and
    /// a new leaf holding the upper `t-1` keys.
    pub(crate) fn split(&mut self) -> (K, LeafNode<K>) {
        debug_assert!(self.is_full(), "split of a non-full leaf");
        let right_keys = self.keys.split_off(self.degree);
        let median = self.keys.remove(self.degree - 1);

        let right = LeafNode {
            degree: self.degree,
            keys: right_keys,
        };
        (median, right)
    }

    /// Append `separator` and every key of `right`.
    pub(crate) fn merge_from(&mut self, separator: K, right: LeafNode<K>) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Copy> BranchNode<K> {
    /// Sorted separator keys stored in this branch.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child references, one more than the number of keys.
    pub fn children(&self) -> &[NodeRef<K>] {
        &self.children
    }

    /// Returns the number of separator keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this branch holds no separator keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if this branch holds `2t-1` keys.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= 2 * self.degree - 1
    }

    /// Index of the first key `>= key`; also the child to search next.
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Child index an insertion of `key` descends into. Equal keys go right.
    pub(crate) fn insert_child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Returns true if the key at `index` equals `key`.
    pub(crate) fn matches_at(&self, index: usize, key: &K) -> bool {
        self.keys.get(index) == Some(key)
    }

    /// Place a promoted separator at `index` with its new right child.
    pub(crate) fn insert_separator(&mut self, index: usize, separator: K, right: NodeRef<K>) {
        self.keys.insert(index, separator);
        self.children.insert(index + 1, right);
    }

    /// Remove separator `index` together with the child to its right.
    pub(crate) fn remove_separator(&mut self, index: usize) -> (K, NodeRef<K>) {
        let separator = self.keys.remove(index);
        let right = self.children.remove(index + 1);
        (separator, right)
    }

    /// Split a full branch: keeps the lower `t-1` keys and `t` children,
    /// returns the median and a new branch with the upper halves.
    pub(crate) fn split(&mut self) -> (K, BranchNode<K>) {
        debug_assert!(self.is_full(), "split of a non-full branch");
        let right_keys = self.keys.split_off(self.degree);
        let right_children = self.children.split_off(self.degree);
        let median = self.keys.remove(self.degree - 1);

        let right = BranchNode {
            degree: self.degree,
            keys: right_keys,
            children: right_children,
        };
        (median, right)
    }

    /// Append `separator` and every key and child of `right`.
    pub(crate) fn merge_from(&mut self, separator: K, right: BranchNode<K>) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }

    /// Borrow the last key and child (used when this is the left sibling).
    pub(crate) fn borrow_last(&mut self) -> Option<(K, NodeRef<K>)> {
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    /// Borrow the first key and child (used when this is the right sibling).
    pub(crate) fn borrow_first(&mut self) -> Option<(K, NodeRef<K>)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.children.remove(0)))
    }

    /// Accept a separator and child at the front (from the left sibling).
    pub(crate) fn accept_from_left(&mut self, key: K, child: NodeRef<K>) {
        self.keys.insert(0, key);
        self.children.insert(0, child);
    }

    /// Accept a separator and child at the end (from the right sibling).
    pub(crate) fn accept_from_right(&mut self, key: K, child: NodeRef<K>) {
        self.keys.push(key);
        self.children.push(child);
    }
}
