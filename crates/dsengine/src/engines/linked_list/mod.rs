//! Singly and doubly linked lists stored in a node [`Arena`](crate::arena::Arena).
//!
//! Both variants delete only the first node holding a value, and treat a
//! missing value as a no-op rather than an error.

/// Doubly linked list.
mod doubly;
/// Singly linked list.
mod singly;

use serde::Serialize;

pub use self::{
    doubly::{DoublyLinkedList, DoublyListSnapshot, LinkedNode},
    singly::{SinglyLinkedList, SinglyListSnapshot},
};

/// Result of looking a value up in a list.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FindResult {
    /// Whether the value is present.
    pub found: bool,
    /// Zero-based position of the first match.
    pub index: Option<usize>,
}

impl FindResult {
    /// Build from an optional position.
    fn from_index(index: Option<usize>) -> Self {
        Self {
            found: index.is_some(),
            index,
        }
    }
}
