use serde::Serialize;

use super::{CAPACITY, PriorityEntry};
use crate::{
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
    value::Value,
};

/// A priority queue kept as an array sorted by priority.
///
/// Entries are stored in ascending priority with the next entry to leave at
/// the end, so insertion is *O*(n) and dequeue is an *O*(1) pop. Among equal
/// priorities the earliest arrival sits closest to the end.
#[derive(Debug, Clone, Default)]
pub struct SortedPriorityQueue {
    /// Entries, lowest priority first.
    entries: Vec<PriorityEntry>,
}

/// Query view of a sorted priority queue.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SortedSnapshot {
    /// Entries in dequeue order.
    pub queue: Vec<PriorityEntry>,
    /// Number of entries.
    pub size: usize,
    /// Whether the queue is empty.
    pub is_empty: bool,
}

impl SortedPriorityQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(CAPACITY),
        }
    }

    /// Insert behind every entry of greater or equal priority.
    pub fn enqueue(&mut self, data: Value, priority: i64) -> Result<Vec<PriorityEntry>> {
        if self.entries.len() >= CAPACITY {
            return Err(Error::CapacityExceeded {
                structure: "Priority queue",
                capacity: CAPACITY,
            });
        }
        let at = self.entries.partition_point(|e| e.priority < priority);
        self.entries.insert(at, PriorityEntry::new(data, priority));
        Ok(self.entries())
    }

    /// Remove and return the highest-priority entry.
    pub fn dequeue(&mut self) -> Result<PriorityEntry> {
        self.entries
            .pop()
            .ok_or(Error::EmptyStructure("Priority queue"))
    }

    /// The highest-priority entry.
    pub fn peek(&self) -> Result<&PriorityEntry> {
        self.entries
            .last()
            .ok_or(Error::EmptyStructure("Priority queue"))
    }

    /// Entries in dequeue order.
    pub fn entries(&self) -> Vec<PriorityEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Engine for SortedPriorityQueue {
    const KIND: EngineKind = EngineKind::PriorityQueue;
    type Snapshot = SortedSnapshot;

    fn snapshot(&self) -> SortedSnapshot {
        SortedSnapshot {
            queue: self.entries(),
            size: self.len(),
            is_empty: self.is_empty(),
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
