use serde::Serialize;

use super::FindResult;
use crate::{
    arena::{Arena, NodeId},
    engine::Engine,
    registry::EngineKind,
    value::Value,
};

/// A node owning a value and links in both directions.
#[derive(Debug, Clone)]
struct Node {
    /// Payload.
    value: Value,
    /// Predecessor, if any.
    prev: Option<NodeId>,
    /// Successor, if any.
    next: Option<NodeId>,
}

/// A doubly linked list.
///
/// Invariant: for every node `n` with `n.next == m`, `m.prev == n`, and the
/// head has no predecessor while the tail has no successor.
#[derive(Debug, Clone, Default)]
pub struct DoublyLinkedList {
    /// Node storage.
    nodes: Arena<Node>,
    /// First node.
    head: Option<NodeId>,
    /// Last node.
    tail: Option<NodeId>,
}

/// One node as rendered, with its link flags derived from the chain.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedNode {
    /// Payload.
    pub data: Value,
    /// Whether a successor exists.
    pub has_next: bool,
    /// Whether a predecessor exists.
    pub has_prev: bool,
}

/// Query view of a doubly linked list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoublyListSnapshot {
    /// Nodes, head first.
    pub list: Vec<LinkedNode>,
    /// Number of nodes.
    pub size: usize,
}

impl DoublyLinkedList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value after the tail.
    pub fn append(&mut self, value: Value) -> Vec<LinkedNode> {
        let id = self.nodes.alloc(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.linked_nodes()
    }

    /// Add a value before the head.
    pub fn prepend(&mut self, value: Value) -> Vec<LinkedNode> {
        let id = self.nodes.alloc(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(head) => self.nodes[head].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.linked_nodes()
    }

    /// Unlink the first node holding `value`. Returns whether one was removed.
    pub fn delete(&mut self, value: &Value) -> bool {
        let Some(id) = self.position(value).map(|(id, _)| id) else {
            return false;
        };
        let Node { prev, next, .. } = self.nodes[id];
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes.free(id);
        true
    }

    /// Handle and position of the first node holding `value`.
    fn position(&self, value: &Value) -> Option<(NodeId, usize)> {
        self.ids()
            .enumerate()
            .find(|(_, id)| self.nodes[*id].value == *value)
            .map(|(i, id)| (id, i))
    }

    /// Position of the first node holding `value`.
    pub fn find(&self, value: &Value) -> FindResult {
        FindResult::from_index(self.position(value).map(|(_, i)| i))
    }

    /// Node handles, head first.
    fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = self.nodes[id].next;
            Some(id)
        })
    }

    /// Values, head first.
    pub fn values(&self) -> Vec<Value> {
        self.ids().map(|id| self.nodes[id].value.clone()).collect()
    }

    /// Values, tail first, following `prev` links.
    pub fn values_rev(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.len());
        let mut cursor = self.tail;
        while let Some(id) = cursor {
            out.push(self.nodes[id].value.clone());
            cursor = self.nodes[id].prev;
        }
        out
    }

    /// Nodes, head first, with derived link flags.
    pub fn linked_nodes(&self) -> Vec<LinkedNode> {
        self.ids()
            .map(|id| {
                let node = &self.nodes[id];
                LinkedNode {
                    data: node.value.clone(),
                    has_next: node.next.is_some(),
                    has_prev: node.prev.is_some(),
                }
            })
            .collect()
    }

    /// Verify the back-link invariant across the whole chain.
    pub fn is_consistent(&self) -> bool {
        let mut prev = None;
        let mut count = 0;
        for id in self.ids() {
            if self.nodes[id].prev != prev {
                return false;
            }
            prev = Some(id);
            count += 1;
        }
        prev == self.tail && count == self.nodes.len()
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

impl Engine for DoublyLinkedList {
    const KIND: EngineKind = EngineKind::DoublyList;
    type Snapshot = DoublyListSnapshot;

    fn snapshot(&self) -> DoublyListSnapshot {
        DoublyListSnapshot {
            list: self.linked_nodes(),
            size: self.len(),
        }
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(xs: &[i32]) -> DoublyLinkedList {
        let mut l = DoublyLinkedList::new();
        for &x in xs {
            l.append(Value::from(x));
        }
        l
    }

    fn vals(xs: &[i32]) -> Vec<Value> {
        xs.iter().map(|&x| Value::from(x)).collect()
    }

    #[test]
    fn links_flags() {
        let l = list_of(&[1, 2, 3]);
        let nodes = l.linked_nodes();
        assert!(!nodes[0].has_prev && nodes[0].has_next);
        assert!(nodes[1].has_prev && nodes[1].has_next);
        assert!(nodes[2].has_prev && !nodes[2].has_next);
    }

    #[test]
    fn delete_head_middle_tail() {
        for (target, expect) in [(1, vec![2, 3]), (2, vec![1, 3]), (3, vec![1, 2])] {
            let mut l = list_of(&[1, 2, 3]);
            assert!(l.delete(&Value::from(target)));
            assert!(l.is_consistent());
            assert_eq!(l.values(), vals(&expect));
            let mut rev = vals(&expect);
            rev.reverse();
            assert_eq!(l.values_rev(), rev);
        }
    }

    #[test]
    fn delete_only_node() {
        let mut l = list_of(&[7]);
        assert!(l.delete(&Value::from(7)));
        assert!(l.is_empty());
        assert!(l.is_consistent());
        l.prepend(Value::from(8));
        assert_eq!(l.values_rev(), vals(&[8]));
    }

    #[test]
    fn missing_value_is_noop() {
        let mut l = list_of(&[1, 2]);
        assert!(!l.delete(&Value::from("1")));
        assert_eq!(l.values(), vals(&[1, 2]));
    }

    #[test]
    fn prepend_keeps_prev_links() {
        let mut l = DoublyLinkedList::new();
        l.prepend(Value::from(2));
        l.prepend(Value::from(1));
        l.append(Value::from(3));
        assert!(l.is_consistent());
        assert_eq!(l.values_rev(), vals(&[3, 2, 1]));
        assert_eq!(l.find(&Value::from(3)).index, Some(2));
    }
}
