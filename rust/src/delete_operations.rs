//! DELETE operations for BTree.
//!
//! Deletion is single-pass: before descending into a child it makes sure
//! the child holds at least `t` keys, borrowing from a sibling or merging
//! with one. The tree only loses height when the root runs out of keys.

use crate::error::{BTreeError, ModifyResult};
use crate::types::{BTree, NodeId, NodeRef};
use std::mem;
use tracing::{debug, trace};

impl<K: Ord + Copy> BTree<K> {
    /// Remove one occurrence of `key`.
    ///
    /// Returns `false` when the key is absent; that is an ordinary outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_index::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.extend(1..=5);
    /// assert!(tree.delete(&3));
    /// assert!(!tree.delete(&3));
    /// assert_eq!(tree.traverse().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        let removed = self.delete_recursive(self.root, key);
        // Fill may have drained the root even when the key was absent.
        self.collapse_root_if_needed();
        removed
    }

    /// Remove one occurrence of `key`, reporting `KeyNotFound` when absent.
    pub fn try_delete(&mut self, key: &K) -> ModifyResult<()> {
        if self.delete(key) {
            Ok(())
        } else {
            Err(BTreeError::KeyNotFound)
        }
    }

    fn delete_recursive(&mut self, node: NodeRef<K>, key: &K) -> bool {
        match node {
            NodeRef::Leaf(id, _) => {
                let leaf = &mut self.leaf_arena[id];
                let index = leaf.lower_bound(key);
                if leaf.keys.get(index) == Some(key) {
                    leaf.remove_at(index);
                    true
                } else {
                    false
                }
            }
            NodeRef::Branch(id, _) => {
                let index = self.branch_arena[id].lower_bound(key);
                if self.branch_arena[id].matches_at(index, key) {
                    return self.remove_from_branch(id, index);
                }

                let child = self.branch_arena[id].children[index];
                let index = if self.key_count(child) < self.degree {
                    self.fill(id, index)
                } else {
                    index
                };
                let child = self.branch_arena[id].children[index];
                self.delete_recursive(child, key)
            }
        }
    }

    /// Remove separator `index` of branch `id`, replacing it with its
    /// predecessor or successor, or merging its two children around it.
    fn remove_from_branch(&mut self, id: NodeId, index: usize) -> bool {
        let branch = &self.branch_arena[id];
        let key = branch.keys[index];
        let left = branch.children[index];
        let right = branch.children[index + 1];

        if self.key_count(left) >= self.degree {
            let predecessor = self.subtree_max(left);
            self.branch_arena[id].keys[index] = predecessor;
            self.delete_recursive(left, &predecessor)
        } else if self.key_count(right) >= self.degree {
            let successor = self.subtree_min(right);
            self.branch_arena[id].keys[index] = successor;
            self.delete_recursive(right, &successor)
        } else {
            self.merge(id, index);
            self.delete_recursive(left, &key)
        }
    }

    /// Bring child `index` of `parent_id` up to at least `t` keys.
    ///
    /// Returns the index of the child that now covers the original one's
    /// key range; it shifts left when the child merged into its left sibling.
    fn fill(&mut self, parent_id: NodeId, index: usize) -> usize {
        let parent = &self.branch_arena[parent_id];
        let last = parent.keys.len();
        let prev = (index > 0).then(|| parent.children[index - 1]);
        let next = (index < last).then(|| parent.children[index + 1]);

        if prev.is_some_and(|sibling| self.key_count(sibling) >= self.degree) {
            self.borrow_from_prev(parent_id, index);
            index
        } else if next.is_some_and(|sibling| self.key_count(sibling) >= self.degree) {
            self.borrow_from_next(parent_id, index);
            index
        } else if index < last {
            self.merge(parent_id, index);
            index
        } else {
            self.merge(parent_id, index - 1);
            index - 1
        }
    }

    /// Rotate the left sibling's last key up through the parent separator
    /// into the front of child `index`.
    fn borrow_from_prev(&mut self, parent_id: NodeId, index: usize) {
        let parent = &self.branch_arena[parent_id];
        let (sibling, child) = (parent.children[index - 1], parent.children[index]);

        match (sibling, child) {
            (NodeRef::Leaf(sibling_id, _), NodeRef::Leaf(child_id, _)) => {
                if let Some(borrowed) = self.leaf_arena[sibling_id].keys.pop() {
                    let separator =
                        mem::replace(&mut self.branch_arena[parent_id].keys[index - 1], borrowed);
                    self.leaf_arena[child_id].keys.insert(0, separator);
                }
            }
            (NodeRef::Branch(sibling_id, _), NodeRef::Branch(child_id, _)) => {
                if let Some((borrowed, moved)) = self.branch_arena[sibling_id].borrow_last() {
                    let separator =
                        mem::replace(&mut self.branch_arena[parent_id].keys[index - 1], borrowed);
                    self.branch_arena[child_id].accept_from_left(separator, moved);
                }
            }
            _ => unreachable!("siblings at different depths"),
        }
        trace!(parent = parent_id, index, "btree.borrow.prev");
    }

    /// Rotate the right sibling's first key up through the parent separator
    /// onto the end of child `index`.
    fn borrow_from_next(&mut self, parent_id: NodeId, index: usize) {
        let parent = &self.branch_arena[parent_id];
        let (child, sibling) = (parent.children[index], parent.children[index + 1]);

        match (child, sibling) {
            (NodeRef::Leaf(child_id, _), NodeRef::Leaf(sibling_id, _)) => {
                let sibling_keys = &mut self.leaf_arena[sibling_id].keys;
                if !sibling_keys.is_empty() {
                    let borrowed = sibling_keys.remove(0);
                    let separator =
                        mem::replace(&mut self.branch_arena[parent_id].keys[index], borrowed);
                    self.leaf_arena[child_id].keys.push(separator);
                }
            }
            (NodeRef::Branch(child_id, _), NodeRef::Branch(sibling_id, _)) => {
                if let Some((borrowed, moved)) = self.branch_arena[sibling_id].borrow_first() {
                    let separator =
                        mem::replace(&mut self.branch_arena[parent_id].keys[index], borrowed);
                    self.branch_arena[child_id].accept_from_right(separator, moved);
                }
            }
            _ => unreachable!("siblings at different depths"),
        }
        trace!(parent = parent_id, index, "btree.borrow.next");
    }

    /// Fold child `index + 1` and separator `index` into child `index`,
    /// releasing the absorbed node.
    fn merge(&mut self, parent_id: NodeId, index: usize) {
        let (separator, right) = self.branch_arena[parent_id].remove_separator(index);
        let left = self.branch_arena[parent_id].children[index];

        match (left, right) {
            (NodeRef::Leaf(left_id, _), NodeRef::Leaf(right_id, _)) => {
                if let Some(absorbed) = self.deallocate_leaf(right_id) {
                    self.leaf_arena[left_id].merge_from(separator, absorbed);
                }
            }
            (NodeRef::Branch(left_id, _), NodeRef::Branch(right_id, _)) => {
                if let Some(absorbed) = self.deallocate_branch(right_id) {
                    self.branch_arena[left_id].merge_from(separator, absorbed);
                }
            }
            _ => unreachable!("siblings at different depths"),
        }
        trace!(
            parent = parent_id,
            index,
            left = left.id(),
            right = right.id(),
            "btree.merge"
        );
    }

    /// Replace an internal root that ran out of keys by its only child.
    fn collapse_root_if_needed(&mut self) {
        if let NodeRef::Branch(root_id, _) = self.root {
            if self.branch_arena[root_id].keys.is_empty() {
                let child = self.branch_arena[root_id].children[0];
                self.deallocate_branch(root_id);
                self.root = child;
                debug!(degree = self.degree, height = self.height(), "btree.root.shrink");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BranchNode, LeafNode};

    fn tree_with(degree: usize, keys: impl IntoIterator<Item = i64>) -> BTree<i64> {
        let mut tree = BTree::new(degree).unwrap();
        tree.extend(keys);
        tree
    }

    fn keys_of(tree: &BTree<i64>) -> Vec<i64> {
        tree.traverse().collect()
    }

    #[test]
    fn test_delete_from_leaf_root() {
        let mut tree = tree_with(3, [3, 1, 2]);
        assert!(tree.delete(&2));
        assert!(!tree.delete(&2));
        assert_eq!(keys_of(&tree), vec![1, 3]);
    }

    #[test]
    fn test_delete_missing_reports_not_found() {
        let mut tree = tree_with(2, 1..=10);
        assert!(!tree.delete(&42));
        assert_eq!(tree.try_delete(&42), Err(BTreeError::KeyNotFound));
        assert_eq!(tree.len(), 10);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_delete_on_empty_tree() {
        let mut tree = BTree::<i64>::new(2).unwrap();
        assert!(!tree.delete(&1));
        assert_eq!(tree.height(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_delete_internal_key_uses_predecessor() {
        // t=2: root [2, 4] over [1], [3], [5, 6]
        let mut tree = tree_with(2, 1..=6);
        tree.insert(0);
        // left leaf is now [0, 1], which can lend its max for separator 2
        assert_eq!(tree.node_keys(tree.root), &[2, 4]);

        assert!(tree.delete(&2));
        assert_eq!(tree.node_keys(tree.root), &[1, 4]);
        assert_eq!(keys_of(&tree), vec![0, 1, 3, 4, 5, 6]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_delete_internal_key_uses_successor() {
        let mut tree = tree_with(2, 1..=6);
        // [1] cannot lend, [3] cannot lend for separator 2 -> merge path;
        // separator 4 has left [3] and right [5, 6] -> successor path
        assert!(tree.delete(&4));
        assert_eq!(tree.node_keys(tree.root), &[2, 5]);
        assert_eq!(keys_of(&tree), vec![1, 2, 3, 5, 6]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_delete_internal_key_merges_children() {
        let mut tree = tree_with(2, 1..=6);
        assert!(tree.delete(&2));
        assert_eq!(tree.node_keys(tree.root), &[4]);
        assert_eq!(tree.leaf_sizes(), vec![2, 2]);
        assert_eq!(keys_of(&tree), vec![1, 3, 4, 5, 6]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_merge_at_root_collapses_height() {
        // t=2: root [2] over [1] and [3]
        let mut tree = tree_with(2, 1..=4);
        assert!(tree.delete(&4));
        assert_eq!(tree.height(), 1);

        assert!(tree.delete(&1));
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.count_nodes(), 1);
        assert_eq!(keys_of(&tree), vec![2, 3]);
        assert_eq!(tree.branch_arena_stats().allocated_count, 0);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_descend_into_last_child_after_left_merge() {
        // t=2: root [2, 4] over [1], [3], [5]
        let mut tree = tree_with(2, 1..=6);
        assert!(tree.delete(&6));
        assert_eq!(tree.leaf_sizes(), vec![1, 1, 1]);

        // 5 lives in the last child; neither sibling can lend, so the last
        // child merges into its left sibling and the descent shifts left
        assert!(tree.delete(&5));
        assert_eq!(tree.node_keys(tree.root), &[2]);
        assert_eq!(tree.leaf_sizes(), vec![1, 2]);
        assert_eq!(keys_of(&tree), vec![1, 2, 3, 4]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_descend_into_interior_child_borrows_from_prev() {
        // t=2: root [2, 4] over [0, 1], [3], [5, 6]
        let mut tree = tree_with(2, 1..=6);
        tree.insert(0);

        assert!(tree.delete(&3));
        assert_eq!(tree.node_keys(tree.root), &[1, 4]);
        assert_eq!(tree.leaf_sizes(), vec![1, 1, 2]);
        assert_eq!(keys_of(&tree), vec![0, 1, 2, 4, 5, 6]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_descend_into_interior_child_borrows_from_next() {
        // t=2: root [2, 4] over [1], [3], [5, 6]
        let mut tree = tree_with(2, 1..=6);

        assert!(tree.delete(&3));
        assert_eq!(tree.node_keys(tree.root), &[2, 5]);
        assert_eq!(tree.leaf_sizes(), vec![1, 1, 1]);
        assert_eq!(keys_of(&tree), vec![1, 2, 4, 5, 6]);
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_branch_rotation_moves_child_pointer() {
        let mut tree = tree_with(2, 1..=30);
        assert!(tree.height() >= 2);

        for key in [1, 2, 3, 4, 5, 6, 7, 8] {
            assert!(tree.delete(&key));
            assert!(tree.check_invariants(), "after deleting {}", key);
        }
        assert_eq!(keys_of(&tree), (9..=30).collect::<Vec<_>>());
    }

    fn leaf_node(tree: &mut BTree<i64>, keys: &[i64]) -> NodeRef<i64> {
        let id = tree.allocate_leaf(LeafNode {
            degree: tree.degree,
            keys: keys.to_vec(),
        });
        NodeRef::leaf(id)
    }

    fn branch_node(tree: &mut BTree<i64>, keys: &[i64], children: Vec<NodeRef<i64>>) -> NodeRef<i64> {
        let id = tree.allocate_branch(BranchNode {
            degree: tree.degree,
            keys: keys.to_vec(),
            children,
        });
        NodeRef::branch(id)
    }

    #[test]
    fn test_branch_borrow_from_prev_moves_key_and_child() {
        // t=2, height 2:
        //   root [20, 40]
        //   A [5, 10, 15] over [1] [6] [11] [16]
        //   B [30, 35]    over [25] [32] [37]
        //   C [50]        over [45] [55]
        let mut tree = BTree::new(2).unwrap();
        let initial_root = tree.root.id();
        tree.deallocate_leaf(initial_root);

        let a_leaves = vec![
            leaf_node(&mut tree, &[1]),
            leaf_node(&mut tree, &[6]),
            leaf_node(&mut tree, &[11]),
            leaf_node(&mut tree, &[16]),
        ];
        let a = branch_node(&mut tree, &[5, 10, 15], a_leaves);
        let moved_leaf = leaf_node(&mut tree, &[37]);
        let b_leaves = vec![leaf_node(&mut tree, &[25]), leaf_node(&mut tree, &[32]), moved_leaf];
        let b = branch_node(&mut tree, &[30, 35], b_leaves);
        let c_leaves = vec![leaf_node(&mut tree, &[45]), leaf_node(&mut tree, &[55])];
        let c = branch_node(&mut tree, &[50], c_leaves);
        let root = branch_node(&mut tree, &[20, 40], vec![a, b, c]);
        tree.root = root;
        assert_eq!(tree.validate(), Ok(()));

        // C is minimal and has no right sibling; B lends its last key and child
        assert!(tree.delete(&55));

        assert_eq!(tree.node_keys(tree.root), &[20, 35]);
        assert_eq!(tree.node_keys(a), &[5, 10, 15]);
        assert_eq!(tree.node_keys(b), &[30]);
        assert_eq!(tree.node_keys(c), &[40]);
        assert_eq!(tree.get_branch(b.id()).unwrap().children().len(), 2);
        assert_eq!(tree.get_branch(c.id()).unwrap().children()[0], moved_leaf);
        assert_eq!(tree.leaf_sizes(), vec![1, 1, 1, 1, 1, 1, 1, 2]);
        assert_eq!(keys_of(&tree), vec![1, 5, 6, 10, 11, 15, 16, 20, 25, 30, 32, 35, 37, 40, 45, 50]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_delete_one_duplicate_at_a_time() {
        let mut tree = tree_with(2, std::iter::repeat(4).take(7).chain([1, 9]));
        for remaining in (0..7).rev() {
            assert!(tree.delete(&4));
            assert_eq!(tree.count(&4), remaining);
            assert!(tree.check_invariants());
        }
        assert!(!tree.delete(&4));
        assert_eq!(keys_of(&tree), vec![1, 9]);
    }

    fn fill_and_drain_interleaved(degree: usize) {
        // Deletes alternate between the low and high end of the key range
        let mut tree = tree_with(degree, (0..300).map(|k| (k * 7919) % 300));
        let mut expected: Vec<i64> = (0..300).collect();

        for step in 0..300 {
            let key = if step % 2 == 0 { expected[0] } else { expected[expected.len() - 1] };
            assert!(tree.delete(&key), "degree {} key {}", degree, key);
            expected.retain(|&k| k != key);

            if step % 25 == 0 {
                assert_eq!(tree.validate(), Ok(()));
                assert_eq!(keys_of(&tree), expected);
            }
        }

        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.branch_arena_stats().allocated_count, 0);
        assert_eq!(tree.leaf_arena_stats().allocated_count, 1);
    }

    degree_tests!(fill_and_drain_interleaved: 2, 3, 4, 5, 8);
}
