//! Core types and data structures for BTree.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B-tree implementation.

use crate::compact_arena::CompactArena;
use std::marker::PhantomData;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest minimum degree a tree may be built with.
pub const MIN_DEGREE: usize = 2;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Sentinel for "no node"
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// B-tree of minimum degree `t` over bare integer-like keys.
///
/// Every non-root node holds between `t-1` and `2t-1` keys, internal nodes
/// hold one more child than keys, and all leaves sit at the same depth.
/// The tree grows only by splitting a full root and shrinks only by
/// collapsing an empty internal root, so height stays uniform without any
/// after-the-fact rebalancing.
///
/// Duplicate keys are accepted and stored side by side.
///
/// # Examples
///
/// ```
/// use btree_index::BTree;
///
/// let mut tree = BTree::new(3).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
///
/// assert!(tree.search(&17));
/// assert!(!tree.search(&99));
/// assert_eq!(tree.traverse().collect::<Vec<_>>(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(t · log_t n)
/// - **Search**: O(t · log_t n)
/// - **Deletion**: O(t · log_t n)
/// - **Traversal**: O(n)
#[derive(Debug, Clone)]
pub struct BTree<K> {
    /// Minimum degree `t`, fixed for the lifetime of the tree.
    pub(crate) degree: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef<K>,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: CompactArena<LeafNode<K>>,
    /// Arena storage for internal nodes.
    pub(crate) branch_arena: CompactArena<BranchNode<K>>,
}

/// Leaf node: sorted keys and nothing else.
#[derive(Debug, Clone)]
pub struct LeafNode<K> {
    /// Minimum degree of the owning tree.
    pub(crate) degree: usize,
    /// Sorted list of keys, at most `2t-1` long.
    pub(crate) keys: Vec<K>,
}

/// Internal node containing separator keys and child references.
#[derive(Debug, Clone)]
pub struct BranchNode<K> {
    /// Minimum degree of the owning tree.
    pub(crate) degree: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// Child nodes; always exactly `keys.len() + 1` of them.
    pub(crate) children: Vec<NodeRef<K>>,
}

// ============================================================================
// NODE REFERENCES
// ============================================================================

/// Node reference that can be either a leaf or branch node
#[derive(Debug, PartialEq, Eq)]
pub enum NodeRef<K> {
    Leaf(NodeId, PhantomData<K>),
    Branch(NodeId, PhantomData<K>),
}

impl<K> Clone for NodeRef<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<K> {}

impl<K> NodeRef<K> {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id, _) => id,
            NodeRef::Branch(id, _) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_, _))
    }

    pub(crate) fn leaf(id: NodeId) -> Self {
        NodeRef::Leaf(id, PhantomData)
    }

    pub(crate) fn branch(id: NodeId) -> Self {
        NodeRef::Branch(id, PhantomData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ref_is_copy_and_tagged() {
        let leaf: NodeRef<i64> = NodeRef::leaf(3);
        let branch: NodeRef<i64> = NodeRef::branch(7);
        let copied = leaf;

        assert_eq!(copied, leaf);
        assert!(leaf.is_leaf());
        assert!(!branch.is_leaf());
        assert_eq!(leaf.id(), 3);
        assert_eq!(branch.id(), 7);
        assert_ne!(NodeRef::<i64>::leaf(1), NodeRef::branch(1));
    }
}
