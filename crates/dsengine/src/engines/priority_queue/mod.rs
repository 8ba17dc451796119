//! Priority queues: a sorted array and a binary max-heap.
//!
//! Both hold at most [`CAPACITY`] entries, dequeue the highest priority
//! first, and dequeue equal priorities in arrival order.

/// Binary max-heap variant.
mod heap;
/// Sorted-array variant.
mod sorted;

use serde::Serialize;

pub use self::{
    heap::{HeapEntry, HeapPriorityQueue, HeapSnapshot},
    sorted::{SortedPriorityQueue, SortedSnapshot},
};
use crate::value::Value;

/// Maximum number of entries either variant holds.
pub const CAPACITY: usize = 15;

/// A value paired with its priority. Larger priorities leave first.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriorityEntry {
    /// Payload.
    pub data: Value,
    /// Priority.
    pub priority: i64,
}

impl PriorityEntry {
    /// Pair a value with a priority.
    pub fn new(data: Value, priority: i64) -> Self {
        Self { data, priority }
    }
}
