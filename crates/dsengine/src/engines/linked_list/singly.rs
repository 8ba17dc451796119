use serde::Serialize;

use super::FindResult;
use crate::{
    arena::{Arena, NodeId},
    engine::Engine,
    registry::EngineKind,
    value::Value,
};

/// A node owning a value and a link to its successor.
#[derive(Debug, Clone)]
struct Node {
    /// Payload.
    value: Value,
    /// Successor, if any.
    next: Option<NodeId>,
}

/// A singly linked list.
///
/// A tail handle is kept alongside the head so `append` does not walk the
/// chain.
#[derive(Debug, Clone, Default)]
pub struct SinglyLinkedList {
    /// Node storage.
    nodes: Arena<Node>,
    /// First node.
    head: Option<NodeId>,
    /// Last node.
    tail: Option<NodeId>,
}

/// Query view of a singly linked list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SinglyListSnapshot {
    /// Values, head first.
    pub list: Vec<Value>,
    /// Number of nodes.
    pub size: usize,
}

impl SinglyLinkedList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value after the last node.
    pub fn append(&mut self, value: Value) -> Vec<Value> {
        let id = self.nodes.alloc(Node { value, next: None });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.values()
    }

    /// Add a value before the first node.
    pub fn prepend(&mut self, value: Value) -> Vec<Value> {
        let id = self.nodes.alloc(Node {
            value,
            next: self.head,
        });
        self.head = Some(id);
        if self.tail.is_none() {
            self.tail = Some(id);
        }
        self.values()
    }

    /// Unlink the first node holding `value`. Returns whether one was removed.
    pub fn delete(&mut self, value: &Value) -> bool {
        let mut prev: Option<NodeId> = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let next = self.nodes[id].next;
            if self.nodes[id].value == *value {
                match prev {
                    Some(p) => self.nodes[p].next = next,
                    None => self.head = next,
                }
                if self.tail == Some(id) {
                    self.tail = prev;
                }
                self.nodes.free(id);
                return true;
            }
            prev = cursor;
            cursor = next;
        }
        false
    }

    /// Position of the first node holding `value`.
    pub fn find(&self, value: &Value) -> FindResult {
        FindResult::from_index(self.iter().position(|v| v == value))
    }

    /// Values, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = &self.nodes[cursor?];
            cursor = node.next;
            Some(&node.value)
        })
    }

    /// Values, head first, collected.
    pub fn values(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list has no nodes.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl Engine for SinglyLinkedList {
    const KIND: EngineKind = EngineKind::SinglyList;
    type Snapshot = SinglyListSnapshot;

    fn snapshot(&self) -> SinglyListSnapshot {
        SinglyListSnapshot {
            list: self.values(),
            size: self.len(),
        }
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}
