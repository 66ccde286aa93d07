//! Compact arena implementation using Vec<T> with an allocation mask.
//! Freed slots go on a free list and are handed out again by `allocate`.

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

use crate::types::{BTree, BranchNode, LeafNode, NodeId, NULL_NODE};

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
    pub fragmentation: f64,
}

/// Slot arena: direct storage plus a mask of which slots are live.
#[derive(Debug, Clone)]
pub struct CompactArena<T> {
    storage: Vec<T>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    allocated_mask: Vec<bool>,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            // Reuse a free slot
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(item);
            self.allocated_mask.push(true);
            index
        };

        // NULL_NODE is reserved, so the last usable id is one below it.
        assert!(index < NULL_NODE as usize, "arena exhausted the NodeId space");
        index as NodeId
    }

    /// Deallocate an item from the arena and return it.
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.live_index(id)?;

        self.allocated_mask[index] = false;
        self.free_list.push(index);

        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.live_index(id).map(|index| &self.storage[index])
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.live_index(id).map(move |index| &mut self.storage[index])
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.live_index(id).is_some()
    }

    fn live_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }

        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        let total_capacity = self.storage.capacity();
        let allocated_count = self.len();
        let free_count = self.free_list.len();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };
        let fragmentation = if allocated_count > 0 {
            free_count as f64 / (allocated_count + free_count) as f64
        } else {
            0.0
        };

        CompactArenaStats {
            total_capacity,
            allocated_count,
            free_count,
            utilization,
            fragmentation,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated_mask
            .iter()
            .filter(|&&allocated| allocated)
            .count()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated_mask.clear();
        self.free_list.clear();
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Get the number of allocated items
    pub fn allocated_count(&self) -> usize {
        self.len()
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Indexing a freed or foreign id is a broken ownership invariant, not a
// recoverable condition.
impl<T> Index<NodeId> for CompactArena<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, id: NodeId) -> &T {
        match self.live_index(id) {
            Some(index) => &self.storage[index],
            None => panic!("dangling node id {}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for CompactArena<T> {
    #[track_caller]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.live_index(id) {
            Some(index) => &mut self.storage[index],
            None => panic!("dangling node id {}", id),
        }
    }
}

// ============================================================================
// BTREE ARENA ALLOCATION HELPERS
// ============================================================================

impl<K> BTree<K> {
    /// Allocate a new leaf node in the arena and return its ID.
    #[inline]
    pub(crate) fn allocate_leaf(&mut self, leaf: LeafNode<K>) -> NodeId {
        self.leaf_arena.allocate(leaf)
    }

    /// Allocate a new branch node in the arena and return its ID.
    #[inline]
    pub(crate) fn allocate_branch(&mut self, branch: BranchNode<K>) -> NodeId {
        self.branch_arena.allocate(branch)
    }

    /// Deallocate a leaf node from the arena.
    #[inline]
    pub(crate) fn deallocate_leaf(&mut self, id: NodeId) -> Option<LeafNode<K>> {
        self.leaf_arena.deallocate(id)
    }

    /// Deallocate a branch node from the arena.
    #[inline]
    pub(crate) fn deallocate_branch(&mut self, id: NodeId) -> Option<BranchNode<K>> {
        self.branch_arena.deallocate(id)
    }

    /// Get statistics for the leaf node arena.
    pub fn leaf_arena_stats(&self) -> CompactArenaStats {
        self.leaf_arena.stats()
    }

    /// Get statistics for the branch node arena.
    pub fn branch_arena_stats(&self) -> CompactArenaStats {
        self.branch_arena.stats()
    }
}
