use serde::Serialize;

use crate::{
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
    value::Value,
};

/// Maximum number of items a queue holds.
pub const CAPACITY: usize = 10;

/// A bounded FIFO queue over a fixed ring buffer.
///
/// `head` indexes the front item and `len` counts occupied slots, so both
/// enqueue and dequeue are *O*(1); nothing is ever shifted.
#[derive(Debug, Clone)]
pub struct Queue {
    /// Ring storage. Slots outside `head..head + len` (mod capacity) are `None`.
    slots: [Option<Value>; CAPACITY],
    /// Index of the front item.
    head: usize,
    /// Number of items held.
    len: usize,
}

/// Query view of a queue.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    /// Items, front first.
    pub queue: Vec<Value>,
    /// Number of items.
    pub size: usize,
    /// Whether the queue is empty.
    pub is_empty: bool,
    /// Front item, if any.
    pub front: Option<Value>,
    /// Rear item, if any.
    pub rear: Option<Value>,
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
            head: 0,
            len: 0,
        }
    }

    /// Physical slot of the `offset`-th item from the front.
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % CAPACITY
    }

    /// Add to the rear. Fails without side effects when full.
    pub fn enqueue(&mut self, value: Value) -> Result<Vec<Value>> {
        if self.len >= CAPACITY {
            return Err(Error::CapacityExceeded {
                structure: "Queue",
                capacity: CAPACITY,
            });
        }
        let tail = self.slot(self.len);
        self.slots[tail] = Some(value);
        self.len += 1;
        Ok(self.items())
    }

    /// Remove and return the front item.
    pub fn dequeue(&mut self) -> Result<Value> {
        if self.len == 0 {
            return Err(Error::EmptyStructure("Queue"));
        }
        let value = self.slots[self.head]
            .take()
            .ok_or(Error::EmptyStructure("Queue"))?;
        self.head = self.slot(1);
        self.len -= 1;
        Ok(value)
    }

    /// The front item.
    pub fn front(&self) -> Result<&Value> {
        self.peek_at(0)
    }

    /// The rear item.
    pub fn rear(&self) -> Result<&Value> {
        self.peek_at(self.len.wrapping_sub(1))
    }

    /// Item `offset` places behind the front.
    fn peek_at(&self, offset: usize) -> Result<&Value> {
        if offset >= self.len {
            return Err(Error::EmptyStructure("Queue"));
        }
        self.slots[self.slot(offset)]
            .as_ref()
            .ok_or(Error::EmptyStructure("Queue"))
    }

    /// Whether the queue holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Items, front first.
    pub fn items(&self) -> Vec<Value> {
        (0..self.len)
            .filter_map(|i| self.slots[self.slot(i)].clone())
            .collect()
    }
}

impl Engine for Queue {
    const KIND: EngineKind = EngineKind::Queue;
    type Snapshot = QueueSnapshot;

    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            queue: self.items(),
            size: self.len,
            is_empty: self.is_empty(),
            front: self.front().ok().cloned(),
            rear: self.rear().ok().cloned(),
        }
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() -> Result<()> {
        let mut q = Queue::new();
        for v in ["a", "b", "c"] {
            q.enqueue(Value::from(v))?;
        }
        assert_eq!(q.front()?, &Value::from("a"));
        assert_eq!(q.rear()?, &Value::from("c"));
        assert_eq!(q.dequeue()?, Value::from("a"));
        assert_eq!(q.items(), vec![Value::from("b"), Value::from("c")]);
        Ok(())
    }

    #[test]
    fn wraps_around() -> Result<()> {
        let mut q = Queue::new();
        // Cycle the head through the buffer several times.
        for round in 0..3 {
            for v in 0..CAPACITY as i32 {
                q.enqueue(Value::from(round * 100 + v))?;
            }
            assert!(q.enqueue(Value::from(-1)).is_err());
            for v in 0..7 {
                assert_eq!(q.dequeue()?, Value::from(round * 100 + v));
            }
            for v in 7..CAPACITY as i32 {
                assert_eq!(q.dequeue()?, Value::from(round * 100 + v));
            }
            assert!(q.is_empty());
            q.enqueue(Value::from(0))?;
            q.dequeue()?;
        }
        Ok(())
    }

    #[test]
    fn empty_errors_and_snapshot() -> Result<()> {
        let mut q = Queue::new();
        assert_eq!(q.dequeue(), Err(Error::EmptyStructure("Queue")));
        assert!(q.front().is_err());
        assert!(q.rear().is_err());

        q.enqueue(Value::from(5))?;
        let snap = q.snapshot();
        assert_eq!(snap.front, Some(Value::from(5)));
        assert_eq!(snap.rear, Some(Value::from(5)));
        q.clear();
        assert_eq!(q.snapshot().queue, Vec::<Value>::new());
        Ok(())
    }
}
