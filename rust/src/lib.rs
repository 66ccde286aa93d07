//! In-memory B-tree index of minimum degree `t` in Rust.
//!
//! This crate provides a classic B-tree (keys live in every node, not only
//! the leaves) with search, insertion with proactive splitting, deletion with
//! full rebalancing, and lazy in-order traversal. Equal keys may be stored
//! more than once.
//!
//! ```
//! use btree_index::BTree;
//!
//! let mut tree = BTree::new(3).unwrap();
//! tree.extend([10, 20, 5, 6, 12, 30, 7, 17]);
//!
//! assert!(tree.search(&6));
//! assert!(tree.delete(&6));
//! assert!(!tree.search(&6));
//! assert_eq!(tree.traverse().collect::<Vec<_>>(), vec![5, 7, 10, 12, 17, 20, 30]);
//! ```

#[macro_use]
mod macros;

mod compact_arena;
pub mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::DEFAULT_DEGREE;
pub use error::{
    BTreeError, BTreeResult, BTreeResultExt, InitResult, KeyResult, ModifyResult,
};
pub use iteration::{KeyIterator, RangeIterator};
pub use types::{BTree, BranchNode, LeafNode, NodeId, NodeRef, MIN_DEGREE, NULL_NODE};

use tracing::warn;

impl<K: Ord + Copy> BTree<K> {
    /// Insert with invariant checks before and after the insertion.
    ///
    /// A tree that fails the first check is left untouched. If the second
    /// check fails, the key is removed again before the error is returned.
    pub fn try_insert(&mut self, key: K) -> ModifyResult<()> {
        self.insert_checked(key, Self::check_invariants_detailed)
    }

    /// Insert every key, or none of them.
    ///
    /// On the first failure, keys already inserted by this batch are removed
    /// again and the error is returned.
    pub fn batch_insert(&mut self, keys: Vec<K>) -> ModifyResult<()> {
        self.batch_insert_checked(keys, Self::check_invariants_detailed)
    }

    fn insert_checked<F>(&mut self, key: K, check: F) -> ModifyResult<()>
    where
        F: Fn(&Self) -> Result<(), String>,
    {
        if let Err(e) = check(self) {
            warn!(error = %e, "btree.insert.rejected");
            return Err(BTreeError::DataIntegrityError(e));
        }

        self.insert(key);

        if let Err(e) = check(self) {
            self.delete(&key);
            warn!(error = %e, "btree.insert.undone");
            return Err(BTreeError::DataIntegrityError(e));
        }

        Ok(())
    }

    fn batch_insert_checked<F>(&mut self, keys: Vec<K>, check: F) -> ModifyResult<()>
    where
        F: Fn(&Self) -> Result<(), String>,
    {
        let mut inserted_keys = Vec::with_capacity(keys.len());

        for key in keys {
            match self.insert_checked(key, &check) {
                Ok(()) => inserted_keys.push(key),
                Err(e) => {
                    // The failing key is already gone; undo the rest
                    for rollback_key in inserted_keys {
                        self.delete(&rollback_key);
                    }
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}
