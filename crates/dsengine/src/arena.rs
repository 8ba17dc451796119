//! Index-addressed node storage with free-slot reuse.
//!
//! Linked lists, the binary search tree and the Huffman tree keep their
//! nodes here and link them by [`NodeId`] rather than by reference.

use std::ops::{Index, IndexMut};

/// Handle to a node slot in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw slot index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Contiguous node storage. Freed slots are reused by later allocations.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    /// Slot storage; `None` marks a freed slot.
    slots: Vec<Option<T>>,
    /// Freed slot indices, most recently freed last.
    free: Vec<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// An empty arena.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store `node`, returning its handle.
    pub fn alloc(&mut self, node: T) -> NodeId {
        if let Some(i) = self.free.pop() {
            self.slots[i] = Some(node);
            NodeId(i)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Release a slot, returning the node it held.
    pub fn free(&mut self, id: NodeId) -> Option<T> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(node)
    }

    /// Borrow a live node.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Mutably borrow a live node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether no node is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {}", id.0),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node id {}", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_freed_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.free(a), Some('a'));
        assert_eq!(arena.free(a), None);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 1);

        let c = arena.alloc('c');
        assert_eq!(c, a);
        assert_eq!(arena[c], 'c');
        assert_eq!(arena[b], 'b');
    }

    #[test]
    fn clear() {
        let mut arena = Arena::new();
        arena.alloc(1);
        arena.alloc(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.alloc(3).index(), 0);
    }
}
