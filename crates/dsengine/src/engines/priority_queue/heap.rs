use std::cmp::Ordering;

use serde::Serialize;

use super::{CAPACITY, PriorityEntry};
use crate::{
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
    value::Value,
};

/// One heap slot: an entry plus its arrival number.
#[derive(Debug, Clone)]
struct Slot {
    /// The stored entry.
    entry: PriorityEntry,
    /// Monotonic arrival number; earlier arrivals rank higher among equals.
    seq: u64,
}

impl Slot {
    /// Heap order: higher priority first, then earlier arrival.
    fn rank(&self, other: &Self) -> Ordering {
        self.entry
            .priority
            .cmp(&other.entry.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A priority queue over an array-backed binary max-heap.
///
/// Invariant: every slot ranks no higher than its parent at `(i - 1) / 2`.
#[derive(Debug, Clone, Default)]
pub struct HeapPriorityQueue {
    /// Heap storage.
    heap: Vec<Slot>,
    /// Arrival number handed to the next entry.
    next_seq: u64,
}

/// An entry together with its current heap array position.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeapEntry {
    /// Payload.
    pub data: Value,
    /// Priority.
    pub priority: i64,
    /// Position in the heap array.
    pub index: usize,
}

/// Query view of a heap priority queue.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeapSnapshot {
    /// Entries in heap array order.
    pub queue: Vec<HeapEntry>,
    /// Number of entries.
    pub size: usize,
    /// Whether the queue is empty.
    pub is_empty: bool,
}

/// Parent position of a non-root slot.
const fn parent(i: usize) -> usize {
    (i - 1) / 2
}

impl HeapPriorityQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            heap: Vec::with_capacity(CAPACITY),
            next_seq: 0,
        }
    }

    /// Insert and sift up. *O*(log n).
    pub fn enqueue(&mut self, data: Value, priority: i64) -> Result<Vec<HeapEntry>> {
        if self.heap.len() >= CAPACITY {
            return Err(Error::CapacityExceeded {
                structure: "Heap priority queue",
                capacity: CAPACITY,
            });
        }
        self.heap.push(Slot {
            entry: PriorityEntry::new(data, priority),
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.sift_up(self.heap.len() - 1);
        Ok(self.entries())
    }

    /// Remove the root, move the last slot up, and sift it down. *O*(log n).
    pub fn dequeue(&mut self) -> Result<PriorityEntry> {
        if self.heap.is_empty() {
            return Err(Error::EmptyStructure("Heap priority queue"));
        }
        let root = self.heap.swap_remove(0);
        self.sift_down(0);
        Ok(root.entry)
    }

    /// The root entry.
    pub fn peek(&self) -> Result<&PriorityEntry> {
        self.heap
            .first()
            .map(|s| &s.entry)
            .ok_or(Error::EmptyStructure("Heap priority queue"))
    }

    /// Move the slot at `i` towards the root while it outranks its parent.
    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = parent(i);
            if self.heap[i].rank(&self.heap[p]) != Ordering::Greater {
                break;
            }
            self.heap.swap(i, p);
            i = p;
        }
    }

    /// Move the slot at `i` towards the leaves while a child outranks it.
    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let (left, right) = (2 * i + 1, 2 * i + 2);
            let mut best = i;
            if left < n && self.heap[left].rank(&self.heap[best]) == Ordering::Greater {
                best = left;
            }
            if right < n && self.heap[right].rank(&self.heap[best]) == Ordering::Greater {
                best = right;
            }
            if best == i {
                return;
            }
            self.heap.swap(i, best);
            i = best;
        }
    }

    /// Entries in heap array order, with their positions.
    pub fn entries(&self) -> Vec<HeapEntry> {
        self.heap
            .iter()
            .enumerate()
            .map(|(index, s)| HeapEntry {
                data: s.entry.data.clone(),
                priority: s.entry.priority,
                index,
            })
            .collect()
    }

    /// Check the max-heap property across every parent/child pair.
    pub fn is_heap(&self) -> bool {
        (1..self.heap.len())
            .all(|i| self.heap[parent(i)].entry.priority >= self.heap[i].entry.priority)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue holds nothing.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Engine for HeapPriorityQueue {
    const KIND: EngineKind = EngineKind::HeapPriorityQueue;
    type Snapshot = HeapSnapshot;

    fn snapshot(&self) -> HeapSnapshot {
        HeapSnapshot {
            queue: self.entries(),
            size: self.len(),
            is_empty: self.is_empty(),
        }
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}
