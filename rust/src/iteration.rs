//! Iterator implementations for BTree.
//!
//! Traversal is lazy: the iterator keeps an explicit stack of
//! `(node, position)` frames instead of materializing the key list.

use crate::types::{BTree, NodeRef};
use std::ops::{Bound, RangeBounds};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// In-order iterator over the keys of a tree.
///
/// For a leaf frame the position is the next key to yield. For a branch
/// frame it is the index of the child currently being walked; the key at
/// that index comes out once the child is exhausted.
pub struct KeyIterator<'a, K> {
    tree: &'a BTree<K>,
    stack: Vec<(NodeRef<K>, usize)>,
}

/// In-order iterator over the keys that fall within a range.
pub struct RangeIterator<'a, K> {
    keys: KeyIterator<'a, K>,
    end: Bound<K>,
    finished: bool,
}

// ============================================================================
// BTREE ITERATOR METHODS
// ============================================================================

impl<K: Ord + Copy> BTree<K> {
    /// Returns a lazy iterator over all keys in ascending order.
    ///
    /// The iterator borrows the tree; calling `traverse` again restarts
    /// from the smallest key.
    pub fn traverse(&self) -> KeyIterator<'_, K> {
        KeyIterator::seek(self, Bound::Unbounded)
    }

    /// Returns an iterator over the keys within `range`, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.extend(0..10);
    ///
    /// assert_eq!(tree.range(3..6).collect::<Vec<_>>(), vec![3, 4, 5]);
    /// assert_eq!(tree.range(7..).collect::<Vec<_>>(), vec![7, 8, 9]);
    /// assert_eq!(tree.range(..=1).collect::<Vec<_>>(), vec![0, 1]);
    /// ```
    pub fn range<R>(&self, range: R) -> RangeIterator<'_, K>
    where
        R: RangeBounds<K>,
    {
        RangeIterator {
            keys: KeyIterator::seek(self, range.start_bound().cloned()),
            end: range.end_bound().cloned(),
            finished: false,
        }
    }
}

// ============================================================================
// KEYITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord + Copy> KeyIterator<'a, K> {
    /// Position the iterator on the first key satisfying `start`.
    fn seek(tree: &'a BTree<K>, start: Bound<K>) -> Self {
        let mut stack = Vec::new();
        let mut current = tree.root;

        loop {
            let keys = tree.node_keys(current);
            let position = match start {
                Bound::Included(ref key) => keys.partition_point(|k| k < key),
                Bound::Excluded(ref key) => keys.partition_point(|k| k <= key),
                Bound::Unbounded => 0,
            };
            stack.push((current, position));

            match current {
                NodeRef::Leaf(_, _) => break,
                NodeRef::Branch(id, _) => current = tree.branch_arena[id].children[position],
            }
        }

        Self { tree, stack }
    }

    /// Push frames for the leftmost path below `node`.
    fn descend_leftmost(&mut self, node: NodeRef<K>) {
        let mut current = node;
        loop {
            self.stack.push((current, 0));
            match current {
                NodeRef::Leaf(_, _) => return,
                NodeRef::Branch(id, _) => current = self.tree.branch_arena[id].children[0],
            }
        }
    }
}

impl<'a, K: Ord + Copy> Iterator for KeyIterator<'a, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;

        loop {
            let (node, position) = self.stack.last_mut()?;
            let (key, next_child) = match *node {
                NodeRef::Leaf(id, _) => {
                    let leaf = &tree.leaf_arena[id];
                    match leaf.keys.get(*position) {
                        Some(&key) => {
                            *position += 1;
                            (key, None)
                        }
                        None => {
                            self.stack.pop();
                            continue;
                        }
                    }
                }
                NodeRef::Branch(id, _) => {
                    let branch = &tree.branch_arena[id];
                    match branch.keys.get(*position) {
                        Some(&key) => {
                            *position += 1;
                            (key, Some(branch.children[*position]))
                        }
                        None => {
                            self.stack.pop();
                            continue;
                        }
                    }
                }
            };

            if let Some(child) = next_child {
                self.descend_leftmost(child);
            }
            return Some(key);
        }
    }
}

// ============================================================================
// RANGEITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord + Copy> Iterator for RangeIterator<'a, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let key = self.keys.next()?;
        let within = match self.end {
            Bound::Included(ref end) => key <= *end,
            Bound::Excluded(ref end) => key < *end,
            Bound::Unbounded => true,
        };

        if within {
            Some(key)
        } else {
            self.finished = true;
            None
        }
    }
}

impl<'a, K: Ord + Copy> IntoIterator for &'a BTree<K> {
    type Item = K;
    type IntoIter = KeyIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.traverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traverse_empty() {
        let tree = BTree::<i64>::new(2).unwrap();
        assert_eq!(tree.traverse().next(), None);
        assert_eq!(tree.range(..).count(), 0);
    }

    #[test]
    fn test_traverse_is_restartable() {
        let mut tree = BTree::new(3).unwrap();
        tree.extend([10, 20, 5, 6, 12, 30, 7, 17]);

        let first: Vec<_> = tree.traverse().collect();
        let second: Vec<_> = (&tree).into_iter().collect();
        assert_eq!(first, vec![5, 6, 7, 10, 12, 17, 20, 30]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_traverse_is_lazy() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend(0..1000);

        let mut iter = tree.traverse();
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next(), Some(1));
        // Only one root-to-leaf path is on the stack
        assert_eq!(iter.stack.len(), tree.height() + 1);
    }

    #[test]
    fn test_range_bounds() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend((0..50).map(|k| k * 2));

        assert_eq!(tree.range(10..16).collect::<Vec<_>>(), vec![10, 12, 14]);
        assert_eq!(tree.range(11..=16).collect::<Vec<_>>(), vec![12, 14, 16]);
        assert_eq!(
            tree.range((Bound::Excluded(10), Bound::Excluded(16)))
                .collect::<Vec<_>>(),
            vec![12, 14]
        );
        assert_eq!(tree.range(95..).collect::<Vec<_>>(), vec![96, 98]);
        assert_eq!(tree.range(200..).count(), 0);
        assert_eq!(tree.range(..-1).count(), 0);
        assert_eq!(tree.range(..).count(), 50);
    }

    #[test]
    fn test_range_includes_every_duplicate() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend([3, 3, 1, 3, 5, 3, 3, 2, 3]);

        assert_eq!(tree.range(3..=3).count(), 6);
        assert_eq!(tree.range((Bound::Excluded(3), Bound::Unbounded)).collect::<Vec<_>>(), vec![5]);
        assert_eq!(tree.range(..3).collect::<Vec<_>>(), vec![1, 2]);
    }
}
